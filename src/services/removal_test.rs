use super::*;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::post;

use crate::state::test_helpers::{FailingRemover, FixedRemover};

/// Serve `router` on an ephemeral port and return its base URL.
async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/remove-background")
}

fn config_for(url: String) -> AppConfig {
    AppConfig { removal_api_url: url, ..AppConfig::default() }
}

// =============================================================================
// Fallback
// =============================================================================

#[tokio::test]
async fn fallback_returns_cutout_on_success() {
    let remover = FixedRemover(vec![9, 9, 9]);
    let out = remove_or_fallback(&remover, vec![1, 2, 3], "image/jpeg").await;
    assert_eq!(out.bytes, vec![9, 9, 9]);
    assert_eq!(out.content_type, PROCESSED_CONTENT_TYPE);
    assert!(out.background_removed);
}

#[tokio::test]
async fn fallback_returns_original_on_failure() {
    let out = remove_or_fallback(&FailingRemover, vec![1, 2, 3], "image/jpeg").await;
    assert_eq!(out.bytes, vec![1, 2, 3]);
    assert_eq!(out.content_type, "image/jpeg");
    assert!(!out.background_removed);
}

#[test]
fn error_codes_are_stable() {
    assert_eq!(RemovalError::EmptyResponse.error_code(), "E_REMOVAL_EMPTY");
    assert_eq!(RemovalError::Request("x".into()).error_code(), "E_REMOVAL_REQUEST");
    assert_eq!(RemovalError::Upstream { status: 502, body: String::new() }.error_code(), "E_REMOVAL_UPSTREAM");
}

// =============================================================================
// HTTP client
// =============================================================================

#[tokio::test]
async fn http_remover_posts_raw_bytes() {
    let router = Router::new().route(
        "/remove-background",
        post(|headers: axum::http::HeaderMap, body: axum::body::Bytes| async move {
            let is_octet = headers
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v == "application/octet-stream");
            assert!(is_octet);
            let mut reversed = body.to_vec();
            reversed.reverse();
            reversed
        }),
    );
    let url = spawn_upstream(router).await;
    let remover = HttpBackgroundRemover::new(&config_for(url)).unwrap();

    let out = remover.remove_background(&[1, 2, 3]).await.unwrap();
    assert_eq!(out, vec![3, 2, 1]);
}

#[tokio::test]
async fn http_remover_maps_error_status() {
    let router = Router::new().route(
        "/remove-background",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model crashed") }),
    );
    let url = spawn_upstream(router).await;
    let remover = HttpBackgroundRemover::new(&config_for(url)).unwrap();

    let err = remover.remove_background(&[1]).await.unwrap_err();
    match err {
        RemovalError::Upstream { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "model crashed");
        }
        other => panic!("expected Upstream, got {other:?}"),
    }
}

#[tokio::test]
async fn http_remover_rejects_empty_body() {
    let router = Router::new().route("/remove-background", post(|| async { StatusCode::OK }));
    let url = spawn_upstream(router).await;
    let remover = HttpBackgroundRemover::new(&config_for(url)).unwrap();

    let err = remover.remove_background(&[1]).await.unwrap_err();
    assert!(matches!(err, RemovalError::EmptyResponse));
}

#[tokio::test]
async fn http_remover_unreachable_is_request_error() {
    // Bind then drop to get a port nothing is listening on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let remover = HttpBackgroundRemover::new(&config_for(format!("http://{addr}/remove-background"))).unwrap();
    let err = remover.remove_background(&[1]).await.unwrap_err();
    assert!(matches!(err, RemovalError::Request(_)));
}
