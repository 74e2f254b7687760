//! 2d20 rules engine for Dune: Adventures in the Imperium.
//!
//! Provides the dice resolution engine (target numbers, critical hits,
//! complications, momentum and threat), the point-buy validator used during
//! character creation, the canonical skill and drive data, and a handful of
//! helpers for extended tests, difficulty modifiers, assistance, damage and
//! initiative.

pub mod dice;
pub mod error;
pub mod pointbuy;
pub mod resolution;
pub mod rules;
pub mod sheet;

pub use dice::{BonusSource, DicePool};
pub use error::{MechError, MechResult};
pub use pointbuy::{Assignment, PointBuy, ValidationResult, parse_assignment, validate_assignment};
pub use resolution::{ClassifiedDie, Outcome, RollRequest, RollResult, resolve, tally};
pub use rules::{Drive, Skill};
pub use sheet::Track;
