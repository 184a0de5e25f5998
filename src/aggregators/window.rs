use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeZone, Utc};

/// Trailing range of whole calendar days ending with the day that contains
/// `end`, in `end`'s time zone.
#[derive(Debug, Clone)]
pub struct AnalyticsWindow<Tz: TimeZone> {
    end: DateTime<Tz>,
    days: u32,
}

impl<Tz: TimeZone> AnalyticsWindow<Tz> {
    /// A zero-day window is widened to a single day.
    pub fn new(end: DateTime<Tz>, days: u32) -> Self {
        Self {
            end,
            days: days.max(1),
        }
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    pub fn end(&self) -> &DateTime<Tz> {
        &self.end
    }

    pub fn last_day(&self) -> NaiveDate {
        self.end.date_naive()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.last_day()
            .checked_sub_days(Days::new(u64::from(self.days - 1)))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Every day of the window, oldest first.
    pub fn day_labels(&self) -> Vec<NaiveDate> {
        self.first_day()
            .iter_days()
            .take(self.days as usize)
            .collect()
    }

    /// Local calendar day on which `instant` falls.
    pub fn day_of(&self, instant: &DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.end.timezone()).date_naive()
    }

    /// Position of `day` in [`Self::day_labels`], if it belongs to the window.
    pub fn day_index(&self, day: NaiveDate) -> Option<usize> {
        let offset = day.signed_duration_since(self.first_day()).num_days();
        if (0..i64::from(self.days)).contains(&offset) {
            Some(offset as usize)
        } else {
            None
        }
    }

    /// Local midnight at the start of the oldest day.
    pub fn start(&self) -> DateTime<Utc> {
        let midnight = self.first_day().and_time(NaiveTime::MIN);
        match self.end.timezone().from_local_datetime(&midnight).earliest() {
            Some(start) => start.with_timezone(&Utc),
            // Midnight skipped by a DST transition; UTC midnight is close enough.
            None => midnight.and_utc(),
        }
    }
}
