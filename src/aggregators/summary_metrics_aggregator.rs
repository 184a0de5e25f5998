use std::collections::HashSet;

use super::{RawEvent, SummaryMetrics};

pub fn summary(events: &[RawEvent]) -> SummaryMetrics {
    let total_views = events.len() as u64;
    // An empty session id is a visitor like any other.
    let unique_visitors = events
        .iter()
        .map(|event| event.session_id.as_str())
        .collect::<HashSet<_>>()
        .len() as u64;

    SummaryMetrics {
        total_views,
        unique_visitors,
        avg_views_per_visitor: avg_views_per_visitor(total_views, unique_visitors),
    }
}

/// Views per visitor rounded to one decimal place, or zero without visitors.
///
/// Rounding works on the exact binary value of the ratio, so 23/20 (stored
/// just below 1.15) becomes 1.1. Exact ties round up.
pub fn avg_views_per_visitor(total_views: u64, unique_visitors: u64) -> f64 {
    if unique_visitors == 0 {
        return 0.0;
    }
    let average = total_views as f64 / unique_visitors as f64;

    // Only odd multiples of 0.25 sit exactly halfway between two tenths.
    let quarters = average * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 == 1.0 {
        return (average * 10.0).ceil() / 10.0;
    }

    format!("{average:.1}").parse().unwrap_or(average)
}
