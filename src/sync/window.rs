use chrono::{DateTime, Months, NaiveDate, Utc};

/// Date range a sync run asks the remote catalog about.
///
/// `start: None` reaches back to the beginning of time, `end: None` is open
/// ended and includes future releases. An inverted window is kept as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl SyncWindow {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Whether a release dated `date` falls inside the window, both ends inclusive.
    pub fn contains(&self, date: NaiveDate) -> bool {
        let after_start = self.start.is_none_or(|s| date >= s.date_naive());
        let before_end = self.end.is_none_or(|e| date <= e.date_naive());
        after_start && before_end
    }
}

/// Computes the window of a run from the previous run's bookkeeping.
///
/// Without a previous refresh the run is a full update, whatever
/// `force_full_refresh` says. An incremental run starts exactly at
/// `last_refresh`, with no overlap margin.
pub fn compute_window(
    force_full_refresh: bool,
    lookback_months: i32,
    last_refresh: Option<DateTime<Utc>>,
    include_future: bool,
    now: DateTime<Utc>,
) -> SyncWindow {
    let start = match last_refresh {
        Some(last) if !force_full_refresh => Some(last),
        _ => full_update_start(lookback_months, now),
    };
    let end = if include_future { None } else { Some(now) };

    SyncWindow { start, end }
}

/// Start of a full update: `lookback_months` before `now`, unbounded if not positive.
pub fn full_update_start(lookback_months: i32, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    if lookback_months <= 0 {
        return None;
    }
    // out of chrono's range means "since forever"
    now.checked_sub_months(Months::new(lookback_months as u32))
}
