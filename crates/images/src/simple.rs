use anyhow::Result;
use image::ImageFormat;
use maud::html;

use crate::{
    CARD_HEIGHT, CARD_WIDTH,
    brands::{Brand, BrandConfig},
    svg,
};

pub const DEFAULT_TITLE: &str = "OG Image Service";

/// Brands offered by the title card. Others fall back to the default.
pub fn brand_config(brand: Brand) -> &'static BrandConfig {
    match brand {
        Brand::Yearn | Brand::Bearn => brand.config(),
        Brand::Katana => Brand::default().config(),
    }
}

/// Gradient card with a single centered title.
pub fn render_svg(brand: Brand, title: Option<&str>) -> String {
    let title = title.filter(|t| !t.is_empty()).unwrap_or(DEFAULT_TITLE);
    html! {
        svg
            xmlns="http://www.w3.org/2000/svg"
            width=(CARD_WIDTH)
            height=(CARD_HEIGHT)
            viewBox=(format!("0 0 {CARD_WIDTH} {CARD_HEIGHT}")) {
            defs { (brand_config(brand).gradient.svg_def("bg")) }
            rect width="100%" height="100%" fill="url(#bg)" {}
            text
                x=(CARD_WIDTH / 2)
                y=(CARD_HEIGHT / 2)
                font-family="sans-serif"
                font-size="72"
                font-weight="800"
                fill="#FFFFFF"
                text-anchor="middle"
                dominant-baseline="central" { (title) }
        }
    }
    .into_string()
}

/// Renders with the host's system fonts.
pub fn render_image(brand: Brand, title: Option<&str>) -> Result<Vec<u8>> {
    svg::render_image(&render_svg(brand, title), svg::system_fonts(), ImageFormat::Png)
}
