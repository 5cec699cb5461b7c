use bytes::Bytes;
use yearn_og_core::origin::SafeOrigin;

use crate::Upstream;

pub const REGULAR: &str = "Aeonik-Regular.ttf";
pub const BOLD: &str = "Aeonik-Bold.ttf";
pub const MONO: &str = "AeonikMono-Regular.ttf";

#[derive(Debug, Clone)]
pub struct Fonts {
    pub regular: Bytes,
    pub bold: Bytes,
    pub mono: Bytes,
}

impl Fonts {
    pub fn iter(&self) -> impl Iterator<Item = &Bytes> {
        [&self.regular, &self.bold, &self.mono].into_iter()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Font loading error: {name}")]
pub struct FontLoadError {
    pub name: &'static str,
    #[source]
    pub source: reqwest::Error,
}

async fn fetch_font(
    upstream: &Upstream,
    origin: &SafeOrigin,
    name: &'static str,
) -> Result<Bytes, FontLoadError> {
    upstream
        .fetch_bytes(&origin.url(&format!("/fonts/{name}")))
        .await
        .map_err(|source| FontLoadError { name, source })
}

/// Fetch the card fonts from `/fonts/` on the given origin.
/// Stops at the first font that cannot be loaded.
pub async fn load_fonts(upstream: &Upstream, origin: &SafeOrigin) -> Result<Fonts, FontLoadError> {
    let regular = fetch_font(upstream, origin, REGULAR).await?;
    let bold = fetch_font(upstream, origin, BOLD).await?;
    let mono = fetch_font(upstream, origin, MONO).await?;
    Ok(Fonts { regular, bold, mono })
}
