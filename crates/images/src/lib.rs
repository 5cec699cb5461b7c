pub mod brands;
pub mod card;
pub mod simple;
pub mod svg;

use std::io::Cursor;

use anyhow::Result;
use base64::{Engine, engine::general_purpose::STANDARD};
use image::{DynamicImage, ImageFormat};

pub const CARD_WIDTH: u32 = 1200;
pub const CARD_HEIGHT: u32 = 630;

pub fn encode_image(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    match format {
        // No alpha channel
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8()).write_to(&mut out, format)?,
        _ => image.write_to(&mut out, format)?,
    }
    Ok(out.into_inner())
}

/// Embed downloaded image bytes as a `data:` URI.
///
/// The type is sniffed from the bytes, falling back to the reported content
/// type for SVG. Returns `None` for anything that isn't a recognizable image.
pub fn data_uri(data: &[u8], content_type: Option<&str>) -> Option<String> {
    let mime = match image::guess_format(data) {
        Ok(format) => format.to_mime_type(),
        Err(_) => {
            let essence = content_type?.split(';').next()?.trim();
            if essence != mime::IMAGE_SVG.essence_str() {
                return None;
            }
            mime::IMAGE_SVG.essence_str()
        }
    };
    Some(format!("data:{};base64,{}", mime, STANDARD.encode(data)))
}

#[cfg(test)]
mod tests {
    use image::RgbaImage;

    use super::*;

    #[test]
    fn test_data_uri() {
        let png = encode_image(&DynamicImage::ImageRgba8(RgbaImage::new(1, 1)), ImageFormat::Png)
            .unwrap();
        let uri = data_uri(&png, Some("application/octet-stream")).unwrap();
        assert!(uri.starts_with("data:image/png;base64,iVBORw0KGgo"));

        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg"/>"#;
        assert_eq!(
            data_uri(svg, Some("image/svg+xml; charset=utf-8")).as_deref(),
            Some("data:image/svg+xml;base64,PHN2ZyB4bWxucz0iaHR0cDovL3d3dy53My5vcmcvMjAwMC9zdmciLz4=")
        );
        assert_eq!(data_uri(svg, None), None);
        assert_eq!(data_uri(b"<html></html>", Some("text/html")), None);
    }

    #[test]
    fn test_encode_jpeg() {
        let image = DynamicImage::ImageRgba8(RgbaImage::new(4, 4));
        let data = encode_image(&image, ImageFormat::Jpeg).unwrap();
        assert_eq!(image::guess_format(&data).unwrap(), ImageFormat::Jpeg);
    }
}
