use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// A simple clock abstraction for deterministic time in services and tests.
#[derive(Debug, Clone, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
    /// A clock shared between the code under test and the test itself.
    Manual(ManualClock),
}

impl Clock {
    /// Returns a clock that uses the current system time.
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    /// Returns a clock fixed at the given timestamp.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    /// Returns a clock driven by the given manual handle.
    #[must_use]
    pub fn manual(handle: ManualClock) -> Self {
        Self::Manual(handle)
    }

    /// Returns the current time according to the clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
            Clock::Manual(handle) => handle.now(),
        }
    }

    /// If this is a fixed or manual clock, advance it by the given duration.
    ///
    /// Has no effect on `Clock::Default`.
    pub fn advance(&mut self, delta: Duration) {
        match self {
            Clock::Default => {}
            Clock::Fixed(t) => *t += delta,
            Clock::Manual(handle) => handle.advance(delta),
        }
    }

    /// Returns true if this clock represents real time.
    #[must_use]
    pub fn is_default(&self) -> bool {
        matches!(self, Clock::Default)
    }
}

/// Cloneable handle onto a manually advanced point in time.
///
/// Every clone observes the same instant, so a test can keep one handle and
/// hand a `Clock::Manual` to the service it drives.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn advance(&self, delta: Duration) {
        let mut guard = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *guard += delta;
    }
}

/// Whole seconds elapsed between two instants, floored and never negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElapsedTime {
    seconds: u64,
}

impl ElapsedTime {
    #[must_use]
    pub fn from_seconds(seconds: u64) -> Self {
        Self { seconds }
    }

    /// Elapsed time from `started_at` to `now`.
    ///
    /// A `now` earlier than `started_at` (clock skew) reads as zero.
    #[must_use]
    pub fn between(started_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let seconds = (now - started_at).num_seconds().max(0);
        Self {
            seconds: u64::try_from(seconds).unwrap_or(0),
        }
    }

    #[must_use]
    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    #[must_use]
    pub fn minutes(&self) -> u64 {
        self.seconds / 60
    }

    /// Seconds past the last full minute.
    #[must_use]
    pub fn remainder_seconds(&self) -> u64 {
        self.seconds % 60
    }

    /// `m:ss` readout, e.g. `2:05`.
    #[must_use]
    pub fn readout(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ElapsedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.minutes(), self.remainder_seconds())
    }
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readout_pads_seconds() {
        assert_eq!(ElapsedTime::from_seconds(0).readout(), "0:00");
        assert_eq!(ElapsedTime::from_seconds(9).readout(), "0:09");
        assert_eq!(ElapsedTime::from_seconds(60).readout(), "1:00");
        assert_eq!(ElapsedTime::from_seconds(125).readout(), "2:05");
        assert_eq!(ElapsedTime::from_seconds(3_599).readout(), "59:59");
        assert_eq!(ElapsedTime::from_seconds(3_600).readout(), "60:00");
    }

    #[test]
    fn between_floors_partial_seconds() {
        let start = fixed_now();
        let now = start + Duration::milliseconds(90_999);
        let elapsed = ElapsedTime::between(start, now);
        assert_eq!(elapsed.seconds(), 90);
        assert_eq!(elapsed.readout(), "1:30");
    }

    #[test]
    fn between_clamps_negative_to_zero() {
        let start = fixed_now();
        let elapsed = ElapsedTime::between(start, start - Duration::seconds(5));
        assert_eq!(elapsed, ElapsedTime::default());
    }

    #[test]
    fn manual_clock_is_shared_between_clones() {
        let handle = ManualClock::new(fixed_now());
        let clock = Clock::manual(handle.clone());

        handle.advance(Duration::seconds(42));

        assert_eq!(clock.now(), fixed_now() + Duration::seconds(42));
    }

    #[test]
    fn fixed_clock_advances_in_place() {
        let mut clock = fixed_clock();
        clock.advance(Duration::seconds(3));
        assert_eq!(clock.now(), fixed_now() + Duration::seconds(3));

        let mut real = Clock::default_clock();
        real.advance(Duration::days(1));
        assert!(real.is_default());
    }
}
