//! The 2d20 test itself.
//!
//! Roll two d20s plus any bonus dice. Each die at or below the target number
//! scores a success, and a natural 1 scores a second one. Each die at or above
//! the complication threshold (20 unless a trait or circumstance widens the
//! range) generates a complication, whether or not it also succeeded.

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::dice::{BASE_DICE, roll_d20s};
use crate::error::{MechError, MechResult};
use crate::resolution::Outcome;

/// Default complication threshold: only a natural 20 complicates.
pub const DEFAULT_COMPLICATION_THRESHOLD: u32 = 20;

/// Inputs to a single 2d20 test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollRequest {
    /// Roll at or below this value to score a success (skill + drive).
    pub target_number: u32,
    /// Dice added on top of the base two.
    pub bonus_dice: u32,
    /// Successes required to pass.
    pub difficulty: u32,
    /// Roll at or above this value to generate a complication.
    pub complication_threshold: u32,
}

impl RollRequest {
    /// A Difficulty 1 test with no bonus dice and the default complication range.
    pub fn new(target_number: u32) -> Self {
        Self {
            target_number,
            bonus_dice: 0,
            difficulty: 1,
            complication_threshold: DEFAULT_COMPLICATION_THRESHOLD,
        }
    }

    /// Set the number of bonus dice.
    pub fn with_bonus_dice(mut self, bonus_dice: u32) -> Self {
        self.bonus_dice = bonus_dice;
        self
    }

    /// Set the difficulty.
    pub fn with_difficulty(mut self, difficulty: u32) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Set the complication threshold.
    pub fn with_complication_threshold(mut self, threshold: u32) -> Self {
        self.complication_threshold = threshold;
        self
    }

    /// Total dice rolled for this request, or `None` if it does not fit in a `u32`.
    pub fn dice_count(&self) -> Option<u32> {
        BASE_DICE.checked_add(self.bonus_dice)
    }

    /// Reject requests the engine cannot resolve meaningfully.
    pub fn validate(&self) -> MechResult<()> {
        if self.target_number == 0 {
            return Err(MechError::InvalidRequest(
                "target number must be at least 1".to_string(),
            ));
        }
        if self.difficulty == 0 {
            return Err(MechError::InvalidRequest(
                "difficulty must be at least 1".to_string(),
            ));
        }
        if self.complication_threshold == 0 {
            return Err(MechError::InvalidRequest(
                "complication threshold must be at least 1".to_string(),
            ));
        }
        if self.dice_count().is_none() {
            return Err(MechError::InvalidRequest(format!(
                "{} bonus dice is more than can be rolled",
                self.bonus_dice
            )));
        }
        Ok(())
    }
}

/// One rolled die and how it was scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedDie {
    /// The value rolled.
    pub value: u32,
    /// Successes this die contributed (0, 1, or 2).
    pub successes: u32,
    /// Whether this die was a natural 1 at or under the target.
    pub critical: bool,
    /// Whether this die generated a complication.
    pub complication: bool,
}

impl ClassifiedDie {
    /// Neither a success nor a complication.
    pub fn is_plain(&self) -> bool {
        self.successes == 0 && !self.complication
    }
}

/// The scored result of a 2d20 test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    /// Rolled values in roll order; the first two are the base dice.
    pub rolls: Vec<u32>,
    /// Total successes, with natural 1s counted twice.
    pub successes: u32,
    /// Number of natural 1s that scored.
    pub critical_hits: u32,
    /// Number of dice at or above the complication threshold.
    pub complications: u32,
    /// Whether successes met the difficulty.
    pub success: bool,
    /// Excess successes, banked as Momentum.
    pub momentum_generated: u32,
    /// Threat handed to the gamemaster, one per complication.
    pub threat_generated: u32,
    /// Target number the dice were rolled against.
    pub target_number: u32,
    /// Difficulty of the test.
    pub difficulty: u32,
    /// Complication threshold in effect.
    pub complication_threshold: u32,
}

impl RollResult {
    /// Score each die individually, in roll order.
    pub fn classified(&self) -> Vec<ClassifiedDie> {
        self.rolls
            .iter()
            .map(|&value| classify_die(value, self.target_number, self.complication_threshold))
            .collect()
    }

    /// The narrative outcome of this test.
    pub fn outcome(&self) -> Outcome {
        Outcome::classify(self.successes, self.difficulty, self.critical_hits)
    }
}

impl std::fmt::Display for RollResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values: Vec<String> = self.rolls.iter().map(|v| v.to_string()).collect();
        write!(
            f,
            "[{}] → {} success{}, {} complication{}",
            values.join(", "),
            self.successes,
            if self.successes == 1 { "" } else { "es" },
            self.complications,
            if self.complications == 1 { "" } else { "s" },
        )
    }
}

fn classify_die(value: u32, target_number: u32, complication_threshold: u32) -> ClassifiedDie {
    let mut successes = 0;
    let mut critical = false;
    if value <= target_number {
        successes += 1;
        if value == 1 {
            successes += 1;
            critical = true;
        }
    }
    ClassifiedDie {
        value,
        successes,
        critical,
        complication: value >= complication_threshold,
    }
}

/// Score a set of already-rolled values against a request.
///
/// This is the deterministic half of [`resolve`]; it does not validate the
/// request. A target number of 0 simply means no die can succeed.
pub fn tally(request: &RollRequest, values: &[u32]) -> RollResult {
    let mut successes = 0;
    let mut critical_hits = 0;
    let mut complications = 0;

    for &value in values {
        let die = classify_die(value, request.target_number, request.complication_threshold);
        successes += die.successes;
        if die.critical {
            critical_hits += 1;
        }
        if die.complication {
            complications += 1;
        }
    }

    let success = successes >= request.difficulty;
    let momentum_generated = if success {
        successes - request.difficulty
    } else {
        0
    };

    RollResult {
        rolls: values.to_vec(),
        successes,
        critical_hits,
        complications,
        success,
        momentum_generated,
        threat_generated: complications,
        target_number: request.target_number,
        difficulty: request.difficulty,
        complication_threshold: request.complication_threshold,
    }
}

/// Roll and score a 2d20 test.
///
/// Rolls `2 + bonus_dice` d20s. No cap is placed on bonus dice here; limits
/// such as the three-die assistance cap belong to the caller.
pub fn resolve(request: &RollRequest, rng: &mut StdRng) -> MechResult<RollResult> {
    request.validate()?;

    let count = request
        .dice_count()
        .ok_or_else(|| MechError::InvalidRequest("too many dice".to_string()))?;
    let values = roll_d20s(count, rng);
    let result = tally(request, &values);

    tracing::debug!(
        target_number = request.target_number,
        difficulty = request.difficulty,
        rolls = ?result.rolls,
        successes = result.successes,
        complications = result.complications,
        "resolved 2d20 test"
    );

    Ok(result)
}
