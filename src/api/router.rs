//! HTTP API router.
//!
//! Returns a composable `Router` with every route nested under `/api/`.
//!
//! Layers (outermost → innermost):
//! 1. CORS → 2. `Cache-Control: no-store` → 3. Body limit → 4. Audit logger

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Build the API router from a prepared context.
pub fn api_router(ctx: ApiContext) -> Router {
    let body_limit = ctx.config.max_request_body_bytes();

    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/summarize", post(endpoints::summarize::summarize))
        .route("/diagnose", post(endpoints::diagnose::diagnose))
        .route("/extract/pdf", post(endpoints::extract::pdf))
        .route("/extract/image", post(endpoints::extract::image))
        .route("/export", post(endpoints::export::export))
        .with_state(ctx);

    Router::new()
        .nest("/api", routes)
        .fallback(endpoints::not_found)
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(DefaultBodyLimit::max(body_limit))
        // Responses carry patient data.
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(CorsLayer::permissive())
}
