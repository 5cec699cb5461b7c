use axum::{Router, routing::get};

use crate::AppState;

mod og;

pub fn build_router() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/og/simple", get(og::get_simple))
        .route("/api/og/vault/{chain_id}/{address}", get(og::get_vault))
        .route("/api/og/yearn/vault/{chain_id}/{address}", get(og::get_yearn_vault))
}

async fn healthz() -> &'static str { "ok" }
