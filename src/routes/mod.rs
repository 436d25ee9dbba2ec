//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! One Axum router serves the background-removal proxy used by the wardrobe
//! upload flow and the try-on session API used by the mannequin canvas.
//! Browsers reach it from a single frontend origin, so CORS is pinned to
//! that origin rather than opened to any.

pub mod removal;
pub mod sessions;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method, StatusCode};
use axum::routing::{delete, get, post, put};
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::{AppConfig, DEFAULT_CORS_ORIGIN};
use crate::state::AppState;

/// Build the full service router.
pub fn app(state: AppState, config: &AppConfig) -> Router {
    Router::new()
        .route("/remove-background", post(removal::remove_background))
        .route("/api/sessions", post(sessions::create_session))
        .route("/api/sessions/{id}", get(sessions::get_session).delete(sessions::delete_session))
        .route("/api/sessions/{id}/canvas", put(sessions::set_canvas))
        .route("/api/sessions/{id}/drop", post(sessions::drop_item))
        .route("/api/sessions/{id}/items", get(sessions::list_items).delete(sessions::clear_items))
        .route("/api/sessions/{id}/items/{item_id}", delete(sessions::remove_item))
        .route("/healthz", get(healthz))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.upload_max_bytes))
        .layer(cors_layer(&config.cors_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let origin = HeaderValue::from_str(origin).unwrap_or_else(|_| {
        warn!(%origin, fallback = DEFAULT_CORS_ORIGIN, "invalid CORS origin");
        HeaderValue::from_static(DEFAULT_CORS_ORIGIN)
    });

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
