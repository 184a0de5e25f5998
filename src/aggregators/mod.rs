use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

pub mod daily_views_aggregator;
pub mod device_metrics_aggregator;
pub mod page_metrics_aggregator;
pub mod summary_metrics_aggregator;
pub mod window;

pub use window::AnalyticsWindow;

pub const DEFAULT_WINDOW_DAYS: u32 = 30;
pub const TOP_PAGES_LIMIT: usize = 5;

/// A single recorded page view, as read back from the event store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    pub timestamp: DateTime<Utc>,
    pub path: String,
    #[serde(default)]
    pub user_agent: String,
    #[serde(default)]
    pub device_type: Option<String>,
    #[serde(default)]
    pub session_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyViews {
    pub date: NaiveDate,
    pub views: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageMetrics {
    pub path: String,
    pub views: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceMetrics {
    pub device: String,
    pub views: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryMetrics {
    pub total_views: u64,
    pub unique_visitors: u64,
    pub avg_views_per_visitor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    pub daily_views: Vec<DailyViews>,
    pub top_pages: Vec<PageMetrics>,
    pub devices: Vec<DeviceMetrics>,
    pub summary: SummaryMetrics,
}

/// Aggregates a window of page views into the dashboard's chart series and
/// summary cards.
///
/// Day buckets follow the calendar of `window_end`'s time zone. The caller is
/// expected to have fetched only events inside the window; anything that
/// lands outside the generated buckets is left out of the daily series but
/// still counted everywhere else.
pub fn aggregate<Tz: TimeZone>(
    events: &[RawEvent],
    window_end: &DateTime<Tz>,
    window_days: u32,
) -> AggregateResult {
    let window = AnalyticsWindow::new(window_end.clone(), window_days);

    debug!(
        events = events.len(),
        days = window.days(),
        "Aggregating analytics window"
    );

    AggregateResult {
        daily_views: daily_views_aggregator::daily_views(events, &window),
        top_pages: page_metrics_aggregator::top_pages(events, TOP_PAGES_LIMIT),
        devices: device_metrics_aggregator::device_breakdown(events),
        summary: summary_metrics_aggregator::summary(events),
    }
}

/// Counter that remembers the order in which keys were first seen.
#[derive(Default)]
struct Tally {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl Tally {
    fn add(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&position) => self.entries[position].1 += 1,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), 1));
            }
        }
    }

    fn into_entries(self) -> Vec<(String, u64)> {
        self.entries
    }
}
