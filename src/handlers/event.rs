use crate::{AppState, EventHandler};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Payload sent by the page tracker for every page view.
#[derive(Debug, Serialize, Deserialize)]
pub struct PageView {
    pub path: String,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub session_id: Option<String>,
    pub device_type: Option<String>,
}

pub async fn track_page_view(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<PageView>, JsonRejection>,
) -> Result<StatusCode, StatusCode> {
    let Json(page_view) = payload.map_err(|e| {
        debug!("Rejecting malformed page view: {}", e);
        StatusCode::BAD_REQUEST
    })?;

    let handler = EventHandler::new(state);
    handler.handle_event(headers, page_view).await
}
