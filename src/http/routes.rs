use super::handlers;
use super::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};
use std::path::PathBuf;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState, media_root: PathBuf) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Session lifecycle
        .route("/sessions", post(handlers::create_session))
        .route(
            "/sessions/:session_id/preview",
            post(handlers::start_preview),
        )
        .route(
            "/sessions/:session_id/preview/cancel",
            post(handlers::cancel_preview),
        )
        .route("/sessions/:session_id/live", post(handlers::go_live))
        .route("/sessions/:session_id/end", post(handlers::end_stream))
        .route("/sessions/:session_id", delete(handlers::close_session))
        // Media ingest
        .route("/sessions/:session_id/chunks", post(handlers::ingest_chunk))
        // Session-local chat
        .route(
            "/sessions/:session_id/chat",
            post(handlers::post_chat).get(handlers::list_chat),
        )
        // Queries
        .route("/sessions/:session_id/status", get(handlers::get_status))
        .route("/recordings", get(handlers::list_recordings))
        // Stored clips
        .nest_service("/media", ServeDir::new(media_root))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
