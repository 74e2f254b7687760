//! The five skills of Dune: Adventures in the Imperium.

use serde::{Deserialize, Serialize};

use crate::error::{MechError, MechResult};

/// A skill, forming half of every target number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Skill {
    /// Combat, tactics, and warfare.
    Battle,
    /// Persuasion, deception, and every other kind of exchange.
    Communicate,
    /// Self-control under pressure, pain, or influence.
    Discipline,
    /// Athletics, piloting, and getting across terrain.
    Move,
    /// Knowledge, perception, and analysis.
    Understand,
}

impl Skill {
    /// All skills in sheet order.
    pub const ALL: [Skill; 5] = [
        Self::Battle,
        Self::Communicate,
        Self::Discipline,
        Self::Move,
        Self::Understand,
    ];

    /// Lowercase identifier used as a point-buy key.
    pub fn id(self) -> &'static str {
        match self {
            Self::Battle => "battle",
            Self::Communicate => "communicate",
            Self::Discipline => "discipline",
            Self::Move => "move",
            Self::Understand => "understand",
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Battle => "Battle",
            Self::Communicate => "Communicate",
            Self::Discipline => "Discipline",
            Self::Move => "Move",
            Self::Understand => "Understand",
        }
    }

    /// Rules text shown when choosing a skill.
    pub fn description(self) -> &'static str {
        match self {
            Self::Battle => {
                "Combat, tactics, and warfare. Used for all forms of armed and unarmed combat, as well as military strategy."
            }
            Self::Communicate => {
                "Social interaction, persuasion, and deception. Used for all forms of verbal and non-verbal communication."
            }
            Self::Discipline => {
                "Mental and physical self-control. Used to resist mental influence, endure hardship, and maintain focus."
            }
            Self::Move => {
                "Physical movement and coordination. Used for athletics, piloting vehicles, and navigating terrain."
            }
            Self::Understand => {
                "Knowledge, perception, and analysis. Used for investigation, research, and understanding complex systems."
            }
        }
    }

    /// Parse a skill from its id or display name, case-insensitively.
    pub fn from_name(s: &str) -> MechResult<Self> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|skill| skill.id() == lower)
            .ok_or_else(|| MechError::UnknownSkill(s.to_string()))
    }

    /// Identifiers of all skills, in sheet order.
    pub fn ids() -> Vec<&'static str> {
        Self::ALL.iter().map(|s| s.id()).collect()
    }
}

impl std::fmt::Display for Skill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_case_insensitive() {
        assert_eq!(Skill::from_name("Battle").unwrap(), Skill::Battle);
        assert_eq!(Skill::from_name(" understand ").unwrap(), Skill::Understand);
        assert!(matches!(
            Skill::from_name("piloting"),
            Err(MechError::UnknownSkill(_))
        ));
    }

    #[test]
    fn ids_in_sheet_order() {
        assert_eq!(
            Skill::ids(),
            vec!["battle", "communicate", "discipline", "move", "understand"]
        );
    }

    #[test]
    fn display_uses_name() {
        assert_eq!(Skill::Move.to_string(), "Move");
        assert!(!Skill::Battle.description().is_empty());
    }
}
