// Topic suggestion route definitions

use axum::{
    middleware::from_fn,
    routing::get,
    Router,
};

use crate::api::middleware::viewer::viewer_context_middleware;
use crate::config::state::AppState;
use super::handler;

/// Creates router with the topic suggestion endpoints
pub fn topic_routes() -> Router<AppState> {
    Router::new()
        .route("/topics/{tid}/suggested", get(handler::suggested_topics_handler))
        .route_layer(from_fn(viewer_context_middleware))
}
