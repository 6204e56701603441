use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizSettingsError {
    #[error("session size must be greater than zero")]
    InvalidSessionSize,

    #[error("tick period must be greater than zero")]
    InvalidTickPeriod,
}

/// Tunables for a quiz session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSettings {
    session_size: u32,
    feedback_delay_ms: u64,
    tick_period_ms: u64,
}

impl Default for QuizSettings {
    /// Ten questions, a 1.5 second feedback window and a one second readout.
    fn default() -> Self {
        Self {
            session_size: 10,
            feedback_delay_ms: 1_500,
            tick_period_ms: 1_000,
        }
    }
}

impl QuizSettings {
    /// Creates custom settings.
    ///
    /// A zero feedback delay is allowed and advances on the next loop turn.
    ///
    /// # Errors
    ///
    /// Returns an error if `session_size` or `tick_period_ms` is zero.
    pub fn new(
        session_size: u32,
        feedback_delay_ms: u64,
        tick_period_ms: u64,
    ) -> Result<Self, QuizSettingsError> {
        if session_size == 0 {
            return Err(QuizSettingsError::InvalidSessionSize);
        }
        if tick_period_ms == 0 {
            return Err(QuizSettingsError::InvalidTickPeriod);
        }
        Ok(Self {
            session_size,
            feedback_delay_ms,
            tick_period_ms,
        })
    }

    #[must_use]
    pub fn session_size(&self) -> u32 {
        self.session_size
    }

    #[must_use]
    pub fn feedback_delay(&self) -> Duration {
        Duration::from_millis(self.feedback_delay_ms)
    }

    #[must_use]
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }
}
