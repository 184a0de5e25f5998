use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Local;
use serde::Deserialize;
use tracing::{debug, error};

use crate::aggregators::{aggregate, AggregateResult, AnalyticsWindow};
use crate::config::MAX_WINDOW_DAYS;
use crate::event_source::fetch_window;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct StatisticsParams {
    pub days: Option<u32>,
}

pub async fn get_statistics(
    State(state): State<AppState>,
    Query(params): Query<StatisticsParams>,
) -> Result<Json<AggregateResult>, StatusCode> {
    let days = params.days.unwrap_or(state.config.window_days);
    if !(1..=MAX_WINDOW_DAYS).contains(&days) {
        debug!("Rejecting statistics request for {} days", days);
        return Err(StatusCode::BAD_REQUEST);
    }

    // Day buckets follow the server's local calendar.
    let window = AnalyticsWindow::new(Local::now(), days);

    let events = fetch_window(&state.db, &window).await.map_err(|e| {
        error!("Failed to fetch analytics window: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(aggregate(&events, window.end(), window.days())))
}
