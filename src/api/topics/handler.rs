// Topic suggestion handlers

use serde::Deserialize;
use serde_json::json;
use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
};

use crate::api::middleware::viewer::ViewerContext;
use crate::config::state::AppState;
use crate::topics::{PageWindow, Tid};
use crate::utils::response_handler::HandlerResponse;
use tracing::{error, info, instrument};

/// Query string of `GET /topics/{tid}/suggested`
#[derive(Debug, Default, Deserialize)]
pub struct SuggestedTopicsParams {
    pub start: Option<i64>,
    /// Inclusive; `-1` returns every suggestion
    pub stop: Option<i64>,
    /// Recency window in cutoff units; `0` disables it
    pub cutoff: Option<u64>,
}

/// Returns topics related to `tid` that the viewer may read, newest first
#[instrument(name = "suggested_topics_handler", skip(state))]
pub async fn suggested_topics_handler(
    State(state): State<AppState>,
    Extension(viewer): Extension<ViewerContext>,
    Path(tid): Path<Tid>,
    Query(params): Query<SuggestedTopicsParams>,
) -> HandlerResponse {
    let start: i64 = params.start.unwrap_or(0);
    let stop: i64 = params.stop.unwrap_or(state.environment.suggested_default_stop);
    let cutoff: u64 = params.cutoff.unwrap_or(0);

    let Some(window) = PageWindow::from_wire(start, stop) else {
        return HandlerResponse::new(StatusCode::BAD_REQUEST)
            .data(json!({ "error": "invalid_window", "start": start, "stop": stop }))
            .message("start must be >= 0 and stop must be >= -1");
    };

    match state
        .suggested
        .get_suggested_topics(tid, viewer.uid, window, cutoff)
        .await
    {
        Ok(topics) => {
            info!("Suggested {} topics for topic {}", topics.len(), tid);
            HandlerResponse::new(StatusCode::OK)
                .data(json!({ "tid": tid, "topics": topics }))
                .message("Suggested topics retrieved successfully")
        }
        Err(e) => {
            error!("Failed to build suggestions for topic {}: {:#}", tid, e);

            HandlerResponse::new(StatusCode::INTERNAL_SERVER_ERROR)
                .data(json!({
                    "error": "suggested_topics_failed",
                    "details": e.to_string()
                }))
                .message("Failed to retrieve suggested topics")
        }
    }
}
