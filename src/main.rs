mod config;
mod routes;
mod services;
mod state;

use std::sync::Arc;
use std::time::Duration;

use services::probe::HttpImageProbe;
use services::removal::HttpBackgroundRemover;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = config::AppConfig::from_env()
        .unwrap_or_else(|e| panic!("invalid configuration [{}]: {e}", e.error_code()));
    let remover = HttpBackgroundRemover::new(&config).expect("removal client init failed");
    let probe = HttpImageProbe::new(&config).expect("image probe init failed");
    let state = state::AppState::new(Arc::new(remover), Arc::new(probe))
        .with_max_sessions(config.sessions.max_sessions);

    // Spawn idle-session eviction.
    let _eviction = services::session::spawn_eviction_task(
        state.clone(),
        Duration::from_secs(config.sessions.idle_ttl_secs),
        Duration::from_secs(config.sessions.sweep_secs.max(1)),
    );

    let app = routes::app(state, &config);
    let port = config.port;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, removal_api = %config.removal_api_url, cors_origin = %config.cors_origin, "fitme listening");
    axum::serve(listener, app).await.expect("server failed");
}
