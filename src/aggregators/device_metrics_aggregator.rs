use regex::Regex;
use std::sync::OnceLock;

use super::{DeviceMetrics, RawEvent, Tally};

pub const DESKTOP: &str = "Desktop";
pub const MOBILE: &str = "Mobile";
pub const TABLET: &str = "Tablet";

struct UserAgentPatterns {
    mobile: Regex,
    tablet: Regex,
}

fn user_agent_patterns() -> &'static UserAgentPatterns {
    static PATTERNS: OnceLock<UserAgentPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| UserAgentPatterns {
        mobile: Regex::new(r"(?i)mobile").unwrap(),
        tablet: Regex::new(r"(?i)tablet").unwrap(),
    })
}

/// Device label for a page view.
///
/// An explicit, non-empty `device_type` wins. Otherwise the user agent is
/// checked for "mobile" and then "tablet", and anything else is a desktop.
pub fn classify_device(event: &RawEvent) -> &str {
    if let Some(device_type) = event.device_type.as_deref() {
        if !device_type.is_empty() {
            return device_type;
        }
    }

    let patterns = user_agent_patterns();
    if patterns.mobile.is_match(&event.user_agent) {
        MOBILE
    } else if patterns.tablet.is_match(&event.user_agent) {
        TABLET
    } else {
        DESKTOP
    }
}

/// Views per device label in first-seen order.
pub fn device_breakdown(events: &[RawEvent]) -> Vec<DeviceMetrics> {
    let mut tally = Tally::default();
    for event in events {
        tally.add(classify_device(event));
    }

    tally
        .into_entries()
        .into_iter()
        .map(|(device, views)| DeviceMetrics { device, views })
        .collect()
}
