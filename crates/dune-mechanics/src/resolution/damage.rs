//! Damage rolls.
//!
//! A hit deals its base damage plus one d6, and its base effects plus a
//! second d6. Weapon qualities can add to either total depending on the dice.

use std::fmt;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::dice::roll_d6;

/// Lowest die value that triggers Vicious or Intense.
pub const QUALITY_TRIGGER: u32 = 5;

/// A weapon quality that changes how damage is scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeaponQuality {
    /// +1 damage on a damage die of 5 or 6.
    Vicious,
    /// +1 effect on an effect die of 5 or 6.
    Intense,
    /// Ignores armor.
    Piercing,
}

impl WeaponQuality {
    /// Parse a quality from a name like "vicious".
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "vicious" => Some(Self::Vicious),
            "intense" => Some(Self::Intense),
            "piercing" => Some(Self::Piercing),
            _ => None,
        }
    }
}

impl fmt::Display for WeaponQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vicious => write!(f, "Vicious"),
            Self::Intense => write!(f, "Intense"),
            Self::Piercing => write!(f, "Piercing"),
        }
    }
}

/// The scored result of a damage roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageRoll {
    /// Value of the damage die.
    pub damage_die: u32,
    /// Value of the effect die.
    pub effects_die: u32,
    /// Total damage dealt.
    pub damage: u32,
    /// Total effects.
    pub effects: u32,
    /// Qualities that applied to this roll, in the order given.
    pub triggered: Vec<WeaponQuality>,
}

impl DamageRoll {
    /// One line per triggered quality.
    pub fn notes(&self) -> Vec<String> {
        self.triggered
            .iter()
            .map(|q| match q {
                WeaponQuality::Vicious => "Vicious effect triggered".to_string(),
                WeaponQuality::Intense => "Intense effect triggered".to_string(),
                WeaponQuality::Piercing => "Piercing - ignores armor".to_string(),
            })
            .collect()
    }
}

impl fmt::Display for DamageRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}] → {} damage, {} effect{}",
            self.damage_die,
            self.effects_die,
            self.damage,
            self.effects,
            if self.effects == 1 { "" } else { "s" },
        )
    }
}

/// Score a damage roll from dice already rolled.
pub fn score_damage(
    base_damage: u32,
    base_effects: u32,
    qualities: &[WeaponQuality],
    damage_die: u32,
    effects_die: u32,
) -> DamageRoll {
    let mut damage = base_damage.saturating_add(damage_die);
    let mut effects = base_effects.saturating_add(effects_die);
    let mut triggered = Vec::new();

    for &quality in qualities {
        match quality {
            WeaponQuality::Vicious if damage_die >= QUALITY_TRIGGER => {
                damage = damage.saturating_add(1);
                triggered.push(quality);
            }
            WeaponQuality::Intense if effects_die >= QUALITY_TRIGGER => {
                effects = effects.saturating_add(1);
                triggered.push(quality);
            }
            WeaponQuality::Piercing => triggered.push(quality),
            _ => {}
        }
    }

    DamageRoll {
        damage_die,
        effects_die,
        damage,
        effects,
        triggered,
    }
}

/// Roll damage and effects for a hit.
pub fn roll_damage(
    base_damage: u32,
    base_effects: u32,
    qualities: &[WeaponQuality],
    rng: &mut StdRng,
) -> DamageRoll {
    let damage_die = roll_d6(rng);
    let effects_die = roll_d6(rng);
    let result = score_damage(base_damage, base_effects, qualities, damage_die, effects_die);
    tracing::debug!(
        base_damage,
        damage_die,
        effects_die,
        damage = result.damage,
        effects = result.effects,
        "rolled damage"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn dice_add_to_base() {
        let roll = score_damage(3, 1, &[], 4, 2);
        assert_eq!(roll.damage, 7);
        assert_eq!(roll.effects, 3);
        assert!(roll.triggered.is_empty());
    }

    #[test]
    fn vicious_needs_a_high_damage_die() {
        let roll = score_damage(2, 0, &[WeaponQuality::Vicious], 5, 1);
        assert_eq!(roll.damage, 8);
        assert_eq!(roll.triggered, vec![WeaponQuality::Vicious]);

        let roll = score_damage(2, 0, &[WeaponQuality::Vicious], 4, 6);
        assert_eq!(roll.damage, 6);
        assert!(roll.triggered.is_empty());
    }

    #[test]
    fn intense_reads_the_effect_die() {
        let roll = score_damage(2, 1, &[WeaponQuality::Intense], 1, 6);
        assert_eq!(roll.effects, 8);
        assert_eq!(roll.damage, 3);
        assert_eq!(roll.notes(), vec!["Intense effect triggered".to_string()]);
    }

    #[test]
    fn piercing_always_applies() {
        let qualities = [WeaponQuality::Piercing, WeaponQuality::Vicious];
        let roll = score_damage(1, 0, &qualities, 1, 1);
        assert_eq!(roll.damage, 2);
        assert_eq!(roll.notes(), vec!["Piercing - ignores armor".to_string()]);
    }

    #[test]
    fn quality_names() {
        assert_eq!(WeaponQuality::from_name(" VICIOUS"), Some(WeaponQuality::Vicious));
        assert_eq!(WeaponQuality::from_name("blunt"), None);
    }

    #[test]
    fn display() {
        let roll = score_damage(3, 0, &[], 6, 1);
        insta::assert_snapshot!(roll.to_string(), @"[6, 1] → 9 damage, 1 effect");
    }

    #[test]
    fn rolled_dice_are_d6() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let roll = roll_damage(2, 1, &[], &mut rng);
            assert!((1..=6).contains(&roll.damage_die));
            assert!((1..=6).contains(&roll.effects_die));
            assert_eq!(roll.damage, 2 + roll.damage_die);
            assert_eq!(roll.effects, 1 + roll.effects_die);
        }
    }
}
