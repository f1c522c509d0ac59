use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use super::handlers::{get_view, health, set_identity, view_events};
use super::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/identity", post(set_identity))
        .route("/view", get(get_view))
        .route("/view/events", get(view_events))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
