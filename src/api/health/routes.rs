// Liveness route

use axum::{routing::get, Router};

use crate::config::state::AppState;
use super::handler::health_handler;

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_handler))
}
