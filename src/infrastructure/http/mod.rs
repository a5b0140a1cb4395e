use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::infrastructure::config::Config;
use crate::{
    controllers::{
        generation::GenerationController,
        health::{self, HealthState},
        tts::TtsController,
    },
    domain::auth::JwtManager,
    infrastructure::auth::{auth_middleware, request_id_middleware},
};

/// Assemble every route with its middleware
pub fn build_router(
    config: &Config,
    jwt_manager: Arc<JwtManager>,
    health_state: Arc<HealthState>,
    generation_controller: Arc<GenerationController>,
    tts_controller: Arc<TtsController>,
) -> Router {
    // Generation route (needs auth, accepts large uploads)
    let generation_routes = Router::new()
        .route("/api/videos/generate", post(GenerationController::generate))
        .with_state(generation_controller)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(middleware::from_fn_with_state(
            jwt_manager.clone(),
            auth_middleware,
        ));

    // TTS routes (need auth)
    let tts_routes = Router::new()
        .route("/api/tts/synthesize", post(TtsController::synthesize))
        .with_state(tts_controller.clone())
        .layer(middleware::from_fn_with_state(
            jwt_manager.clone(),
            auth_middleware,
        ));

    // Voice catalog (public)
    let voice_routes = Router::new()
        .route("/api/voices", get(TtsController::list_voices))
        .with_state(tts_controller);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(health_state)
        .merge(generation_routes)
        .merge(tts_routes)
        .merge(voice_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server and serve until interrupted
pub async fn start_http_server(
    config: Arc<Config>,
    app: Router,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
