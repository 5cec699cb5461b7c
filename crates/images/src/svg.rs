use std::sync::{Arc, LazyLock};

use anyhow::{Result, anyhow};
use image::{DynamicImage, ImageFormat, RgbaImage};
use resvg::{tiny_skia, usvg, usvg::fontdb};

use crate::encode_image;

/// Font database holding only the given font files.
/// `sans_serif` is used for text whose family is not found.
pub fn font_database<'a>(
    fonts: impl IntoIterator<Item = &'a [u8]>,
    sans_serif: &str,
) -> Arc<fontdb::Database> {
    let mut db = fontdb::Database::new();
    for data in fonts {
        db.load_font_data(data.to_vec());
    }
    db.set_sans_serif_family(sans_serif);
    Arc::new(db)
}

/// Fonts installed on the host, loaded once.
pub fn system_fonts() -> Arc<fontdb::Database> {
    static SYSTEM_FONTS: LazyLock<Arc<fontdb::Database>> = LazyLock::new(|| {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!("Loaded {} system font faces", db.len());
        Arc::new(db)
    });
    SYSTEM_FONTS.clone()
}

pub fn render_pixmap(svg: &str, fontdb: Arc<fontdb::Database>) -> Result<tiny_skia::Pixmap> {
    let options = usvg::Options { fontdb, ..Default::default() };
    let tree = usvg::Tree::from_str(svg, &options)?;
    let size = tree.size().to_int_size();
    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow!("Invalid image size {}x{}", size.width(), size.height()))?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
    Ok(pixmap)
}

pub fn render_image(
    svg: &str,
    fontdb: Arc<fontdb::Database>,
    format: ImageFormat,
) -> Result<Vec<u8>> {
    let pixmap = render_pixmap(svg, fontdb)?;
    let mut data = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let c = pixel.demultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    let image = RgbaImage::from_raw(pixmap.width(), pixmap.height(), data)
        .ok_or_else(|| anyhow!("Pixel buffer does not match image size"))?;
    encode_image(&DynamicImage::ImageRgba8(image), format)
}
