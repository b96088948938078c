//! Route table.

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::ApiState;

/// Build the REST router.
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/list", get(handlers::list_stacks))
        .route("/api/start/:id", get(handlers::start_stack))
        .route("/api/stop/:id", get(handlers::stop_stack))
        .route("/api/create", post(handlers::create_stack))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
