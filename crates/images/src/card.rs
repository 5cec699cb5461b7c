//! Vault card layout.
//!
//! The card is a fixed 1200x630 canvas, so every element is placed at
//! absolute coordinates. Right-aligned values use `text-anchor="end"`.

use std::sync::Arc;

use anyhow::Result;
use image::ImageFormat;
use maud::{Markup, html};
use resvg::usvg::fontdb;
use yearn_og_core::view::RenderData;

use crate::{CARD_HEIGHT, CARD_WIDTH, brands::BrandConfig, svg};

pub const FONT_FAMILY: &str = "Aeonik";

const PADDING: u32 = 70;
const ICON_SIZE: u32 = 48;
const METRICS_RIGHT: u32 = PADDING + 500;
const ROW_GAP: u32 = 62;

/// Images embedded into the card as `data:` URIs.
#[derive(Debug, Clone, Default)]
pub struct CardAssets {
    pub icon: Option<String>,
    pub background: Option<String>,
}

fn background(brand: &BrandConfig, assets: &CardAssets) -> Markup {
    match (&brand.background, &assets.background) {
        (Some(_), Some(href)) => html! {
            rect width="100%" height="100%" fill="#FFFFFF" {}
            image
                width=(CARD_WIDTH)
                height=(CARD_HEIGHT)
                preserveAspectRatio="xMidYMid meet"
                href=(href) {}
        },
        _ => html! {
            defs { (brand.gradient.svg_def("bg")) }
            rect width="100%" height="100%" fill="url(#bg)" {}
        },
    }
}

fn header(data: &RenderData, assets: &CardAssets) -> Markup {
    html! {
        @if let Some(href) = &assets.icon {
            image x=(PADDING) y=(PADDING) width=(ICON_SIZE) height=(ICON_SIZE) href=(href) {}
        }
        text x=(PADDING + ICON_SIZE + 20) y="116" font-size="64" font-weight="700" {
            (data.name)
        }
        text x=(PADDING) y="168" font-size="28" font-weight="300" { (data.footer_text()) }
    }
}

fn bolt(x: u32, y: u32) -> Markup {
    html! {
        polygon
            transform=(format!("translate({x} {y})"))
            points="10,0 0,11 7,11 5,20 15,8 8,8"
            fill="#FFD60A" {}
    }
}

fn row(y: u32, label: &str, value: &str) -> Markup {
    html! {
        text x=(PADDING) y=(y) font-size="32" font-weight="300" { (label) }
        text x=(METRICS_RIGHT) y=(y) font-size="32" font-weight="300" text-anchor="end" {
            (value)
        }
    }
}

fn metrics(data: &RenderData) -> Markup {
    let rewards = data.rewards_apr.as_deref().zip(data.min_boost.as_deref());
    let estimated_y = if rewards.is_some() { 252 } else { 262 };
    let rewards_y = estimated_y + 40;
    let historical_y =
        if rewards.is_some() { rewards_y + ROW_GAP } else { estimated_y + ROW_GAP + 8 };
    html! {
        text x=(PADDING) y=(estimated_y - 6) font-size="32" font-weight="300" { "Estimated APY:" }
        text
            x=(METRICS_RIGHT)
            y=(estimated_y)
            font-size="48"
            font-weight="700"
            text-anchor="end" { (data.estimated_apy) }
        @if let Some((rewards_apr, min_boost)) = rewards {
            (bolt(PADDING, rewards_y - 18))
            text x=(PADDING + 22) y=(rewards_y) font-size="24" font-weight="300" {
                "Rewards APR:"
            }
            text
                x=(METRICS_RIGHT)
                y=(rewards_y)
                font-size="24"
                font-weight="600"
                text-anchor="end" { (min_boost) " → " (rewards_apr) }
        }
        (row(historical_y, "Historical APY:", &data.historical_apy))
        (row(historical_y + ROW_GAP, "Vault TVL:", &data.tvl_usd))
    }
}

fn footer(brand: &BrandConfig) -> Markup {
    html! {
        text
            x=(PADDING)
            y="570"
            font-size="64"
            font-weight="700"
            letter-spacing="4"
            fill=(brand.logo_color) { "YEARN" }
        text
            x=(CARD_WIDTH - PADDING)
            y="578"
            font-size="48"
            font-weight="700"
            text-anchor="end" { (brand.cta) }
    }
}

pub fn render_svg(brand: &BrandConfig, data: &RenderData, assets: &CardAssets) -> String {
    html! {
        svg
            xmlns="http://www.w3.org/2000/svg"
            width=(CARD_WIDTH)
            height=(CARD_HEIGHT)
            viewBox=(format!("0 0 {CARD_WIDTH} {CARD_HEIGHT}")) {
            (background(brand, assets))
            g font-family=(FONT_FAMILY) fill="#FFFFFF" {
                (header(data, assets))
                (metrics(data))
                (footer(brand))
            }
        }
    }
    .into_string()
}

pub fn render_image(
    brand: &BrandConfig,
    data: &RenderData,
    assets: &CardAssets,
    fontdb: Arc<fontdb::Database>,
) -> Result<Vec<u8>> {
    svg::render_image(&render_svg(brand, data, assets), fontdb, ImageFormat::Png)
}
