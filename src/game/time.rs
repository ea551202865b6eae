//! Battle step pacing
//!
//! The battle engine never waits on its own. Callers that want a pause
//! between steps feed elapsed time into a `TurnPacer` and advance the
//! battle whenever it reports ready.

use std::time::Duration;

use crate::data::GameConfig;

/// Reports when the next battle step is due
#[derive(Debug, Clone)]
pub struct TurnPacer {
    /// Total elapsed time
    elapsed: Duration,
    /// Pause between steps
    interval: Duration,
    /// Time since last step
    since_last_step: Duration,
}

impl TurnPacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            interval,
            since_last_step: Duration::ZERO,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(Duration::from_millis(config.turn_delay_ms))
    }

    /// Step as fast as the caller asks
    pub fn immediate() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Update time and return true if a step should occur
    pub fn update(&mut self, delta: Duration) -> bool {
        self.elapsed += delta;
        self.since_last_step += delta;

        if self.since_last_step >= self.interval {
            self.since_last_step -= self.interval;
            true
        } else {
            false
        }
    }

    /// Time left until the next step is due
    pub fn remaining(&self) -> Duration {
        self.interval.saturating_sub(self.since_last_step)
    }

    /// Get total elapsed time
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Reset the timer
    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
        self.since_last_step = Duration::ZERO;
    }
}

impl Default for TurnPacer {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}
