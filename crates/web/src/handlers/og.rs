use axum::{
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use yearn_og_core::{
    AppError,
    models::{Chain, VaultAddress},
    origin::SafeOrigin,
    view::RenderData,
};
use yearn_og_images::{
    brands::Brand,
    card::{self, CardAssets, FONT_FAMILY},
    data_uri, simple, svg,
};
use yearn_og_upstream::{Upstream, fonts::load_fonts};

use crate::AppState;

#[derive(serde::Deserialize)]
pub struct VaultParams {
    pub chain_id: String,
    pub address: String,
}

#[derive(serde::Deserialize, Default)]
pub struct BrandQuery {
    pub brand: Option<String>,
}

#[derive(serde::Deserialize, Default)]
pub struct SimpleQuery {
    pub brand: Option<String>,
    pub title: Option<String>,
}

fn png_response(data: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, mime::IMAGE_PNG.as_ref()),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        data,
    )
        .into_response()
}

pub async fn get_vault(
    Path(params): Path<VaultParams>,
    Query(query): Query<BrandQuery>,
    State(state): State<AppState>,
    origin: SafeOrigin,
) -> Result<Response, AppError> {
    render_vault(&state, &origin, &params, Brand::from_query(query.brand.as_deref())).await
}

pub async fn get_yearn_vault(
    Path(params): Path<VaultParams>,
    State(state): State<AppState>,
    origin: SafeOrigin,
) -> Result<Response, AppError> {
    render_vault(&state, &origin, &params, Brand::Yearn).await
}

pub async fn get_simple(Query(query): Query<SimpleQuery>) -> Result<Response, AppError> {
    let brand = Brand::from_query(query.brand.as_deref());
    let title = query.title;
    let data =
        tokio::task::spawn_blocking(move || simple::render_image(brand, title.as_deref())).await??;
    Ok(png_response(data))
}

/// Download an image and embed it. Failures leave the image out of the card.
async fn embed_image(upstream: &Upstream, url: Option<&str>) -> Option<String> {
    let url = url?;
    let asset = upstream.fetch_image(url).await?;
    let uri = data_uri(&asset.data, asset.content_type.as_deref());
    if uri.is_none() {
        tracing::warn!("Unsupported image at {}", url);
    }
    uri
}

async fn render_vault(
    state: &AppState,
    origin: &SafeOrigin,
    params: &VaultParams,
    brand: Brand,
) -> Result<Response, AppError> {
    let (Ok(chain), Some(address)) =
        (params.chain_id.parse::<Chain>(), VaultAddress::parse(&params.address))
    else {
        return Err(AppError::Text(
            StatusCode::BAD_REQUEST,
            "Invalid chainID or address".to_string(),
        ));
    };
    tracing::debug!("Rendering {} card for {}/{} via {}", brand, chain.id(), address, origin);

    let upstream = state.upstream.as_ref();
    let data = upstream.fetch_vault_data(chain, &address).await;
    let view = RenderData::new(&state.config.upstream.assets_base_uri, chain, &address, &data);
    let fonts = load_fonts(upstream, origin)
        .await
        .map_err(|e| AppError::Text(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let brand = brand.config();
    let background_url = brand.background.map(|path| origin.url(path));
    let (icon, background) = tokio::join!(
        embed_image(upstream, Some(&view.icon)),
        embed_image(upstream, background_url.as_deref()),
    );
    let assets = CardAssets { icon, background };

    let data = tokio::task::spawn_blocking(move || {
        let fontdb = svg::font_database(fonts.iter().map(|f| &f[..]), FONT_FAMILY);
        card::render_image(brand, &view, &assets, fontdb)
    })
    .await??;
    Ok(png_response(data))
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use axum::{
        Router,
        body::{Body, to_bytes},
        http::Request,
        routing::get,
    };
    use image::ImageFormat;
    use tokio::net::TcpListener;
    use tower::ServiceExt;
    use yearn_og_core::config::Config;

    use super::*;
    use crate::handlers::build_router;

    const ADDRESS: &str = "0x9F4330700a36B29952869fac9b33f45EEdd8A3d8";

    async fn serve(router: Router) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        addr
    }

    /// Site serving the card fonts. Font bytes are not checked until rendering.
    async fn font_server(with_bold: bool) -> SocketAddr {
        let mut router = Router::new()
            .route("/fonts/Aeonik-Regular.ttf", get(|| async { "regular" }))
            .route("/fonts/AeonikMono-Regular.ttf", get(|| async { "mono" }));
        if with_bold {
            router = router.route("/fonts/Aeonik-Bold.ttf", get(|| async { "bold" }));
        }
        serve(router).await
    }

    fn app() -> Router {
        let mut config = Config::default();
        config.upstream.timeout_secs = 2;
        build_router().with_state(AppState::new(config).unwrap())
    }

    /// Every upstream service is configured but refuses connections.
    fn unreachable_state() -> AppState {
        let mut config = Config::default();
        config.upstream.timeout_secs = 2;
        config.upstream.ydaemon_base_uri = Some("https://127.0.0.1:1".to_string());
        config.upstream.katana_apr_service_api = Some("http://127.0.0.1:1/aprs".to_string());
        AppState::new(config).unwrap()
    }

    async fn send(uri: &str, host: &str) -> (StatusCode, Option<String>, Vec<u8>) {
        let request =
            Request::builder().uri(uri).header(header::HOST, host).body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, body.to_vec())
    }

    #[tokio::test]
    async fn test_invalid_params() {
        let cases = [
            format!("/api/og/yearn/vault/999/{ADDRESS}"),
            format!("/api/og/yearn/vault/abc/{ADDRESS}"),
            format!("/api/og/vault/+1/{ADDRESS}"),
            "/api/og/yearn/vault/1/xyz".to_string(),
            "/api/og/vault/1/0x1234".to_string(),
        ];
        for uri in cases {
            let (status, _, body) = send(&uri, "yearn.fi").await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body, b"Invalid chainID or address", "{uri}");
        }
    }

    #[tokio::test]
    async fn test_font_error() {
        let addr = font_server(false).await;
        let host = format!("localhost:{}", addr.port());
        let (status, _, body) = send(&format!("/api/og/yearn/vault/1/{ADDRESS}"), &host).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, b"Font loading error: Aeonik-Bold.ttf");
    }

    #[tokio::test]
    async fn test_fallback_card() {
        let state = unreachable_state();
        let address = VaultAddress::parse(ADDRESS).unwrap();
        for chain in [Chain::Ethereum, Chain::Katana] {
            let data = state.upstream.fetch_vault_data(chain, &address).await;
            assert!(data.vault.is_none(), "{chain}");
            assert!(data.katana_aprs.is_none(), "{chain}");
            assert!(data.ybold_apr.is_none(), "{chain}");
        }

        let addr = font_server(true).await;
        let host = format!("localhost:{}", addr.port());
        for uri in [
            format!("/api/og/yearn/vault/8453/{ADDRESS}"),
            format!("/api/og/vault/747474/{}?brand=katana", &ADDRESS[2..]),
            format!("/api/og/vault/01/{ADDRESS}?brand=unknown"),
        ] {
            let request = Request::builder()
                .uri(&uri)
                .header(header::HOST, &host)
                .body(Body::empty())
                .unwrap();
            let app = build_router().with_state(state.clone());
            let response = app.oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
            assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
            assert_eq!(response.headers()[header::CACHE_CONTROL], "public, max-age=3600");
            let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let image = image::load_from_memory_with_format(&body, ImageFormat::Png).unwrap();
            assert_eq!((image.width(), image.height()), (1200, 630));
        }
    }

    #[tokio::test]
    async fn test_simple() {
        let (status, content_type, body) =
            send("/api/og/simple?brand=bearn&title=Hello", "yearn.fi").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("image/png"));
        assert_eq!(image::guess_format(&body).unwrap(), ImageFormat::Png);
    }

    #[tokio::test]
    async fn test_healthz() {
        let (status, _, body) = send("/healthz", "yearn.fi").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ok");
    }
}
