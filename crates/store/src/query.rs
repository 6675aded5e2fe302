use chrono::{DateTime, Days, NaiveDate, Utc};

/// A span of whole calendar days, in UTC.
///
/// Stored as a half-open interval: `start` is midnight of the first day and
/// `end` is midnight of the day after the last one, so the last day is
/// covered up to its final instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DateRange {
    /// Covers `first` through `last`, both inclusive.
    ///
    /// A `last` earlier than `first` produces a range that contains nothing.
    pub fn days(first: NaiveDate, last: NaiveDate) -> Self {
        let start = first.and_time(chrono::NaiveTime::MIN).and_utc();
        let end = last
            .checked_add_days(Days::new(1))
            .map(|next| next.and_time(chrono::NaiveTime::MIN).and_utc())
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self { start, end }
    }

    /// First instant covered.
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// First instant no longer covered.
    pub fn end_exclusive(&self) -> DateTime<Utc> {
        self.end
    }

    /// Returns true if `timestamp` falls inside the range.
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.start && timestamp < self.end
    }
}

/// Sale listing query.
///
/// Results are always ordered most recent first.
#[derive(Debug, Clone, Copy, Default)]
pub struct SaleQuery {
    /// Only sales whose timestamp falls in this range.
    pub range: Option<DateRange>,
}

impl SaleQuery {
    /// Creates a query matching every sale.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a query for sales within a date range.
    pub fn in_range(range: DateRange) -> Self {
        Self { range: Some(range) }
    }
}
