//! Initiative: one d20 plus a combat-ready skill.

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::dice::roll_d20;
use crate::error::{MechError, MechResult};
use crate::rules::Skill;

/// Skills a character may roll initiative with.
pub const INITIATIVE_SKILLS: [Skill; 3] = [Skill::Battle, Skill::Discipline, Skill::Move];

/// Skill used when none is named.
pub const DEFAULT_INITIATIVE_SKILL: Skill = Skill::Discipline;

/// A rolled initiative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Initiative {
    /// Skill the roll used.
    pub skill: Skill,
    /// The d20.
    pub roll: u32,
    /// Rating added to the die.
    pub rating: u32,
}

impl Initiative {
    /// Die plus rating. Higher acts first.
    pub fn total(&self) -> u32 {
        self.roll.saturating_add(self.rating)
    }
}

/// Roll initiative with a skill rating. Only battle, discipline and move qualify.
pub fn roll_initiative(skill: Skill, rating: u32, rng: &mut StdRng) -> MechResult<Initiative> {
    if !INITIATIVE_SKILLS.contains(&skill) {
        return Err(MechError::InvalidRequest(format!(
            "{skill} cannot be used for initiative"
        )));
    }
    Ok(Initiative {
        skill,
        roll: roll_d20(rng),
        rating,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn total_is_die_plus_rating() {
        let mut rng = StdRng::seed_from_u64(3);
        let init = roll_initiative(Skill::Move, 5, &mut rng).unwrap();
        assert!((1..=20).contains(&init.roll));
        assert_eq!(init.total(), init.roll + 5);
        assert_eq!(init.skill, Skill::Move);
    }

    #[test]
    fn only_combat_skills() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(roll_initiative(Skill::Battle, 9, &mut rng).is_ok());
        let err = roll_initiative(Skill::Communicate, 7, &mut rng).unwrap_err();
        assert!(matches!(err, MechError::InvalidRequest(_)));
    }

    #[test]
    fn same_seed_same_initiative() {
        let mut a = StdRng::seed_from_u64(21);
        let mut b = StdRng::seed_from_u64(21);
        assert_eq!(
            roll_initiative(DEFAULT_INITIATIVE_SKILL, 6, &mut a).unwrap(),
            roll_initiative(DEFAULT_INITIATIVE_SKILL, 6, &mut b).unwrap()
        );
    }
}
