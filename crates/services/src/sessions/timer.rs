use chrono::{DateTime, Utc};
use quiz_core::{Clock, ElapsedTime};

/// One periodic readout of the session timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerTick {
    pub elapsed_seconds: u64,
    pub readout: String,
}

impl TimerTick {
    #[must_use]
    pub fn from_elapsed(elapsed: ElapsedTime) -> Self {
        Self {
            elapsed_seconds: elapsed.seconds(),
            readout: elapsed.readout(),
        }
    }
}

/// Wall-clock stopwatch for one session.
///
/// Elapsed time is always `now - started_at` against the clock, never a count
/// of ticks, so late or dropped ticks do not skew it. Readouts never go
/// backwards even if the clock does.
#[derive(Debug, Clone)]
pub struct SessionTimer {
    started_at: DateTime<Utc>,
    stopped: Option<ElapsedTime>,
    high_water: ElapsedTime,
}

impl SessionTimer {
    /// Capture the start instant.
    #[must_use]
    pub fn start(clock: &Clock) -> Self {
        Self {
            started_at: clock.now(),
            stopped: None,
            high_water: ElapsedTime::default(),
        }
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.stopped.is_none()
    }

    /// Elapsed time now, or the frozen value once stopped.
    #[must_use]
    pub fn elapsed(&self, clock: &Clock) -> ElapsedTime {
        match self.stopped {
            Some(frozen) => frozen,
            None => ElapsedTime::between(self.started_at, clock.now()).max(self.high_water),
        }
    }

    /// Readout for a periodic tick; remembers the value so later ticks are monotone.
    pub fn tick(&mut self, clock: &Clock) -> TimerTick {
        let elapsed = self.elapsed(clock);
        self.high_water = elapsed;
        TimerTick::from_elapsed(elapsed)
    }

    /// Freeze the timer and return the final elapsed time.
    ///
    /// Stopping an already stopped timer returns the same value.
    pub fn stop(&mut self, clock: &Clock) -> ElapsedTime {
        if let Some(frozen) = self.stopped {
            return frozen;
        }
        let elapsed = self.elapsed(clock);
        self.stopped = Some(elapsed);
        elapsed
    }
}
