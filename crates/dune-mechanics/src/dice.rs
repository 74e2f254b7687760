//! Building and rolling pools of d20s.
//!
//! Every test rolls two base dice. Each bonus source (Momentum or Threat
//! bought as dice, an asset, Determination, an assisting character) adds one
//! more die to the pool.

use std::collections::BTreeMap;
use std::fmt;

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Faces on the only die the system uses.
pub const D20_SIDES: u32 = 20;

/// Faces on the damage and effect dice.
pub const D6_SIDES: u32 = 6;

/// Dice every test starts with.
pub const BASE_DICE: u32 = 2;

/// Where an extra die came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BonusSource {
    /// Bought with Momentum (or Threat, for the gamemaster).
    Momentum,
    /// Granted by an asset.
    Asset,
    /// A point of Determination spent.
    Determination,
    /// An assisting character.
    Assistance,
}

impl BonusSource {
    fn label(self) -> &'static str {
        match self {
            Self::Momentum => "bought",
            Self::Asset => "asset",
            Self::Determination => "Determination",
            Self::Assistance => "assist",
        }
    }
}

/// The dice a test will roll.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DicePool {
    bonus: BTreeMap<BonusSource, u32>,
}

impl DicePool {
    /// Two base dice and nothing else.
    pub fn standard() -> Self {
        Self::default()
    }

    /// Add `count` dice from one source.
    pub fn with_bonus(mut self, source: BonusSource, count: u32) -> Self {
        if count > 0 {
            let dice = self.bonus.entry(source).or_default();
            *dice = dice.saturating_add(count);
        }
        self
    }

    /// Extra dice beyond the base two.
    pub fn bonus_dice(&self) -> u32 {
        self.bonus.values().copied().fold(0, u32::saturating_add)
    }

    /// Extra dice from one source.
    pub fn from_source(&self, source: BonusSource) -> u32 {
        self.bonus.get(&source).copied().unwrap_or(0)
    }

    /// Total dice rolled.
    pub fn size(&self) -> u32 {
        BASE_DICE.saturating_add(self.bonus_dice())
    }

    /// Roll every die in the pool.
    pub fn roll(&self, rng: &mut StdRng) -> Vec<u32> {
        roll_d20s(self.size(), rng)
    }
}

impl fmt::Display for DicePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d20", self.size())?;
        if self.bonus.is_empty() {
            return Ok(());
        }
        let parts: Vec<String> = self
            .bonus
            .iter()
            .map(|(source, n)| format!("+{n} {}", source.label()))
            .collect();
        write!(f, " ({})", parts.join(", "))
    }
}

/// Roll one d20.
pub fn roll_d20(rng: &mut StdRng) -> u32 {
    rng.random_range(1..=D20_SIDES)
}

/// Roll `count` d20s.
pub fn roll_d20s(count: u32, rng: &mut StdRng) -> Vec<u32> {
    (0..count).map(|_| roll_d20(rng)).collect()
}

/// Roll one d6.
pub fn roll_d6(rng: &mut StdRng) -> u32 {
    rng.random_range(1..=D6_SIDES)
}
