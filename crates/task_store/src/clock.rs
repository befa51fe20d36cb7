//! Time sources and time-derived identifiers.

use chrono::{DateTime, Utc};

/// Source of the current time for timestamps and date-relative views.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Generates ids from the millisecond timestamp.
///
/// Uniqueness against stored data comes only from the `taken` check passed to
/// [`IdGenerator::next_id`]. The `last` watermark lives as long as the
/// generator (one CLI invocation), so it only separates ids issued by the same
/// instance within one millisecond.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    /// Creates a generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next id at `now` that `taken` does not reject.
    pub fn next_id(&mut self, now: DateTime<Utc>, taken: impl Fn(&str) -> bool) -> String {
        let mut candidate = now.timestamp_millis().max(self.last + 1);
        while taken(&candidate.to_string()) {
            candidate += 1;
        }
        self.last = candidate;
        candidate.to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_id_is_millisecond_timestamp() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut ids = IdGenerator::new();

        assert_eq!(ids.next_id(now, |_| false), now.timestamp_millis().to_string());
    }

    #[test]
    fn test_ids_unique_within_same_millisecond() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut ids = IdGenerator::new();

        let a = ids.next_id(now, |_| false);
        let b = ids.next_id(now, |_| false);
        assert_ne!(a, b);
    }

    #[test]
    fn test_taken_ids_skipped() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let base = now.timestamp_millis();
        let existing = [base.to_string(), (base + 1).to_string()];
        let mut ids = IdGenerator::new();

        let id = ids.next_id(now, |candidate| existing.iter().any(|e| e == candidate));
        assert_eq!(id, (base + 2).to_string());
    }

    #[test]
    fn test_fresh_generator_relies_on_taken() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let issued = IdGenerator::new().next_id(now, |_| false);

        assert_eq!(IdGenerator::new().next_id(now, |_| false), issued);
        let id = IdGenerator::new().next_id(now, |candidate| candidate == issued);
        assert_ne!(id, issued);
    }
}
