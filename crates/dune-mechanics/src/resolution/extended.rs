//! Extended tests: several rolls pooling successes toward a larger goal,
//! optionally against a limited number of attempts.

use serde::{Deserialize, Serialize};

use super::RollResult;

/// An extended test in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedTest {
    /// Successes needed across all rolls.
    pub target_successes: u32,
    /// Maximum number of rolls allowed, if limited.
    pub time_limit: Option<u32>,
}

/// Accumulated state of an extended test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtendedProgress {
    /// Successes scored so far.
    pub total_successes: u32,
    /// Complications accumulated so far.
    pub complications: u32,
    /// Completion percentage, capped at 100.
    pub percent: f64,
    /// Whether the target has been reached.
    pub complete: bool,
    /// Rolls left before the time limit, if there is one.
    pub time_remaining: Option<u32>,
}

impl ExtendedTest {
    /// Create an unlimited extended test.
    pub fn new(target_successes: u32) -> Self {
        Self {
            target_successes,
            time_limit: None,
        }
    }

    /// Limit the number of rolls.
    pub fn with_time_limit(mut self, rolls: u32) -> Self {
        self.time_limit = Some(rolls);
        self
    }

    /// Summarise progress over the rolls made so far.
    pub fn progress(&self, results: &[RollResult]) -> ExtendedProgress {
        let total_successes: u32 = results.iter().map(|r| r.successes).sum();
        let complications: u32 = results.iter().map(|r| r.complications).sum();
        let percent = if self.target_successes == 0 {
            100.0
        } else {
            (f64::from(total_successes) / f64::from(self.target_successes) * 100.0).min(100.0)
        };
        let time_remaining = self
            .time_limit
            .map(|limit| limit.saturating_sub(results.len() as u32));

        ExtendedProgress {
            total_successes,
            complications,
            percent,
            complete: total_successes >= self.target_successes,
            time_remaining,
        }
    }
}
