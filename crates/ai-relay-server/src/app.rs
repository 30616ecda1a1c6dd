//! Router assembly and shared state.

use std::sync::Arc;

use ai_relay_core::Relay;
use ai_relay_transport::create_relay_router;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::routes;
use crate::storage::PostStorage;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Relay service backing the websocket endpoints.
    pub relay: Arc<Relay>,
    /// Store backing the insert endpoint.
    pub storage: Arc<dyn PostStorage>,
}

/// Build the full application router: greeting endpoints, the insert
/// endpoint, and the websocket relay, behind permissive CORS.
#[must_use]
pub fn build_app(state: AppState) -> Router {
    let relay = Arc::clone(&state.relay);
    Router::new()
        .route("/", get(routes::root))
        .route("/hello/{name}", get(routes::say_hello))
        .route("/insert", post(routes::insert))
        .with_state(state)
        .merge(create_relay_router(relay))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
