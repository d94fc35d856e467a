// Viewer resolution from the user id header

use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use serde_json::json;

use crate::topics::{Uid, GUEST_UID};
use crate::utils::response_handler::HandlerResponse;

/// Header carrying the uid of the reader, set by the forum's auth proxy
pub const USER_ID_HEADER: &str = "x-user-id";

/// Viewer identity stored in request extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewerContext {
    pub uid: Uid,
}

/// Reads the viewer uid from the request headers.
/// A missing header means a guest.
pub fn viewer_from_headers(headers: &HeaderMap) -> Result<ViewerContext, HandlerResponse> {
    let Some(value) = headers.get(USER_ID_HEADER) else {
        return Ok(ViewerContext { uid: GUEST_UID });
    };

    value
        .to_str()
        .ok()
        .and_then(|raw| raw.trim().parse::<Uid>().ok())
        .map(|uid| ViewerContext { uid })
        .ok_or_else(|| {
            HandlerResponse::new(StatusCode::BAD_REQUEST)
                .message("Invalid user id header")
                .data(json!({ "error": "invalid_user_id" }))
        })
}

/// Middleware that resolves the viewer and stores it for handlers
pub async fn viewer_context_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, HandlerResponse> {
    let viewer: ViewerContext = viewer_from_headers(&headers)?;
    tracing::debug!(uid = viewer.uid, "Resolved viewer");

    request.extensions_mut().insert(viewer);
    Ok(next.run(request).await)
}
