use chrono::{DateTime, TimeZone, Utc};
use rusqlite::params;
use tokio_rusqlite::Connection;
use tracing::{debug, warn};

use crate::aggregators::{AnalyticsWindow, RawEvent};
use crate::error::AppError;

fn event_from_row(row: &rusqlite::Row) -> Result<Option<RawEvent>, rusqlite::Error> {
    let created_at: i64 = row.get(0)?;
    let Some(timestamp) = DateTime::<Utc>::from_timestamp(created_at, 0) else {
        warn!("Skipping page view with out-of-range created_at {}", created_at);
        return Ok(None);
    };

    Ok(Some(RawEvent {
        timestamp,
        path: row.get(1)?,
        user_agent: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        device_type: row.get(3)?,
        session_id: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
    }))
}

/// Loads every page view recorded between the start of the window and its end.
pub async fn fetch_window<Tz: TimeZone>(
    db: &Connection,
    window: &AnalyticsWindow<Tz>,
) -> Result<Vec<RawEvent>, AppError> {
    let start_ts = window.start().timestamp();
    let end_ts = window.end().timestamp();

    let events = db
        .call(move |conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT created_at, path, user_agent, device_type, session_id
                 FROM analytics
                 WHERE created_at >= ?1 AND created_at <= ?2
                 ORDER BY id",
            )?;

            let events = stmt
                .query_map(params![start_ts, end_ts], event_from_row)?
                .filter_map(|r| r.transpose())
                .collect::<Result<Vec<_>, rusqlite::Error>>()?;
            Ok(events)
        })
        .await?;

    debug!(
        "Fetched {} page views between {} and {}",
        events.len(),
        start_ts,
        end_ts
    );
    Ok(events)
}
