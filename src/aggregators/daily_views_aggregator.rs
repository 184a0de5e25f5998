use chrono::TimeZone;
use tracing::debug;

use super::{AnalyticsWindow, DailyViews, RawEvent};

/// Zero-filled views per local day, oldest to newest.
pub fn daily_views<Tz: TimeZone>(
    events: &[RawEvent],
    window: &AnalyticsWindow<Tz>,
) -> Vec<DailyViews> {
    let mut series: Vec<DailyViews> = window
        .day_labels()
        .into_iter()
        .map(|date| DailyViews { date, views: 0 })
        .collect();

    let mut outside = 0usize;
    for event in events {
        let bucket = window
            .day_index(window.day_of(&event.timestamp))
            .and_then(|index| series.get_mut(index));
        match bucket {
            Some(bucket) => bucket.views += 1,
            None => outside += 1,
        }
    }

    if outside > 0 {
        debug!("Skipped {} events outside the daily buckets", outside);
    }

    series
}
