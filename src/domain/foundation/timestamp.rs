//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Duration, FixedOffset, Months, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Checks if this timestamp is after another.
    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }

    /// Returns the duration from another timestamp to this one.
    ///
    /// Returns negative duration if other is after self.
    pub fn duration_since(&self, other: &Timestamp) -> Duration {
        self.0.signed_duration_since(other.0)
    }

    /// Creates a new timestamp by adding calendar months.
    ///
    /// Day-of-month is clamped to the end of shorter months
    /// (Jan 31 + 1 month = Feb 28/29).
    pub fn plus_months(&self, months: u32) -> Self {
        let shifted = self
            .0
            .checked_add_months(Months::new(months))
            .unwrap_or_else(|| self.0 + Duration::days(30 * i64::from(months)));
        Self(shifted)
    }

    /// Creates a new timestamp by adding the specified number of seconds.
    pub fn plus_secs(&self, secs: i64) -> Self {
        Self(self.0 + Duration::seconds(secs))
    }

    /// Creates a new timestamp by subtracting the specified number of seconds.
    pub fn minus_secs(&self, secs: i64) -> Self {
        Self(self.0 - Duration::seconds(secs))
    }

    /// Returns local midnight of this instant's day in the given offset.
    pub fn start_of_day(&self, offset: FixedOffset) -> Self {
        let local = self.0.with_timezone(&offset);
        let midnight = local
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .and_then(|naive| offset.from_local_datetime(&naive).single())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or(self.0);
        Self(midnight)
    }

    /// Creates a timestamp from Unix seconds.
    pub fn from_unix_secs(secs: i64) -> Option<Self> {
        Utc.timestamp_opt(secs, 0).single().map(Self)
    }

    /// Returns the timestamp as Unix seconds.
    pub fn as_unix_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Formats as RFC 3339 for API responses.
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn at(rfc3339: &str) -> Timestamp {
        Timestamp::from_datetime(
            DateTime::parse_from_rfc3339(rfc3339)
                .unwrap()
                .with_timezone(&Utc),
        )
    }

    #[test]
    fn timestamp_now_creates_current_time() {
        let before = Utc::now();
        let ts = Timestamp::now();
        let after = Utc::now();

        assert!(ts.as_datetime() >= &before);
        assert!(ts.as_datetime() <= &after);
    }

    #[test]
    fn timestamp_ordering_works() {
        let ts1 = at("2024-01-15T10:30:00Z");
        let ts2 = ts1.plus_secs(1);

        assert!(ts1.is_before(&ts2));
        assert!(ts2.is_after(&ts1));
        assert!(ts1 < ts2);
    }

    #[test]
    fn plus_months_uses_calendar_months() {
        let ts = at("2024-01-15T10:30:00Z");
        let next = ts.plus_months(1);

        assert_eq!(next.as_datetime().month(), 2);
        assert_eq!(next.as_datetime().day(), 15);
        assert_eq!(next.as_datetime().hour(), 10);
    }

    #[test]
    fn plus_months_clamps_to_month_end() {
        let ts = at("2024-01-31T00:00:00Z");
        let next = ts.plus_months(1);

        assert_eq!(next.as_datetime().month(), 2);
        assert_eq!(next.as_datetime().day(), 29);
    }

    #[test]
    fn duration_since_is_signed() {
        let ts1 = at("2024-01-15T10:30:00Z");
        let ts2 = ts1.plus_secs(90);

        assert_eq!(ts2.duration_since(&ts1).num_seconds(), 90);
        assert_eq!(ts1.duration_since(&ts2).num_seconds(), -90);
    }

    #[test]
    fn start_of_day_in_utc() {
        let ts = at("2024-01-15T10:30:00Z");
        let utc = FixedOffset::east_opt(0).unwrap();

        assert_eq!(ts.start_of_day(utc), at("2024-01-15T00:00:00Z"));
    }

    #[test]
    fn start_of_day_respects_offset() {
        // 20:00 UTC on the 15th is already 05:00 on the 16th in +09:00
        let ts = at("2024-01-15T20:00:00Z");
        let jst = FixedOffset::east_opt(9 * 3600).unwrap();

        assert_eq!(ts.start_of_day(jst), at("2024-01-15T15:00:00Z"));
    }

    #[test]
    fn timestamp_serializes_to_json() {
        let ts = at("2024-01-15T10:30:00Z");
        let json = serde_json::to_string(&ts).unwrap();
        assert!(json.contains("2024-01-15"));
    }

    #[test]
    fn timestamp_from_unix_secs_works() {
        let ts = Timestamp::from_unix_secs(1705276800).unwrap();
        assert_eq!(ts.as_datetime().year(), 2024);
        assert_eq!(ts.as_datetime().month(), 1);
        assert_eq!(ts.as_datetime().day(), 15);
        assert_eq!(ts.as_unix_secs(), 1705276800);
    }
}
