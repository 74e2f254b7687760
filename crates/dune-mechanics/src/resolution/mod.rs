//! Resolution of 2d20 tests.
//!
//! A test rolls a pool of d20s against a target number (skill + drive):
//! - each die at or below the target scores one success, a natural 1 scores two
//! - each die at or above the complication threshold generates one complication
//! - successes beyond the difficulty become Momentum, complications become Threat
//!
//! The module also carries the table helpers that feed a test: difficulty
//! modifiers for range and cover, assistance dice, and extended tests. Damage
//! and initiative rolls live here too.

pub mod check;
pub mod damage;
pub mod extended;
pub mod initiative;
pub mod modifiers;

pub use check::{ClassifiedDie, RollRequest, RollResult, resolve, tally};
pub use damage::{DamageRoll, WeaponQuality, roll_damage, score_damage};
pub use extended::{ExtendedProgress, ExtendedTest};
pub use initiative::{Initiative, roll_initiative};
pub use modifiers::{Cover, DifficultyModifier, Range, assistance_dice, difficulty_for};

use serde::{Deserialize, Serialize};

/// The narrative reading of a resolved test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// A success that included at least one natural 1.
    CriticalSuccess,
    /// A success with two or more successes to spare.
    ExcellentSuccess,
    /// A plain success.
    Success,
    /// A failure that fell exactly one success short.
    CloseFailure,
    /// A plain failure.
    Failure,
}

impl Outcome {
    /// Classify a test from its success count and difficulty.
    pub fn classify(successes: u32, difficulty: u32, critical_hits: u32) -> Self {
        if successes >= difficulty {
            if critical_hits > 0 {
                Self::CriticalSuccess
            } else if successes >= difficulty + 2 {
                Self::ExcellentSuccess
            } else {
                Self::Success
            }
        } else if successes + 1 == difficulty {
            Self::CloseFailure
        } else {
            Self::Failure
        }
    }

    /// Whether this outcome counts as passing the test.
    pub fn is_success(self) -> bool {
        matches!(
            self,
            Self::CriticalSuccess | Self::ExcellentSuccess | Self::Success
        )
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CriticalSuccess => write!(f, "Critical Success"),
            Self::ExcellentSuccess => write!(f, "Excellent Success"),
            Self::Success => write!(f, "Success"),
            Self::CloseFailure => write!(f, "Close Failure"),
            Self::Failure => write!(f, "Failure"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_display() {
        assert_eq!(Outcome::CriticalSuccess.to_string(), "Critical Success");
        assert_eq!(Outcome::ExcellentSuccess.to_string(), "Excellent Success");
        assert_eq!(Outcome::Success.to_string(), "Success");
        assert_eq!(Outcome::CloseFailure.to_string(), "Close Failure");
        assert_eq!(Outcome::Failure.to_string(), "Failure");
    }

    #[test]
    fn critical_beats_excellent() {
        assert_eq!(Outcome::classify(4, 1, 1), Outcome::CriticalSuccess);
    }

    #[test]
    fn excellent_needs_two_spare() {
        assert_eq!(Outcome::classify(3, 1, 0), Outcome::ExcellentSuccess);
        assert_eq!(Outcome::classify(2, 1, 0), Outcome::Success);
    }

    #[test]
    fn close_failure_is_one_short() {
        assert_eq!(Outcome::classify(1, 2, 0), Outcome::CloseFailure);
        assert_eq!(Outcome::classify(0, 2, 0), Outcome::Failure);
        assert_eq!(Outcome::classify(0, 1, 0), Outcome::CloseFailure);
    }

    #[test]
    fn is_success() {
        assert!(Outcome::CriticalSuccess.is_success());
        assert!(Outcome::Success.is_success());
        assert!(!Outcome::CloseFailure.is_success());
        assert!(!Outcome::Failure.is_success());
    }
}
