//! The five drives: the convictions a character's actions spring from.

use serde::{Deserialize, Serialize};

use crate::error::{MechError, MechResult};

/// A drive, forming the other half of every target number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Drive {
    /// Loyalty to House or cause above all else.
    Duty,
    /// Trust in religion, tradition, or a higher power.
    Faith,
    /// Belief in fairness, law, and moral order.
    Justice,
    /// Ambition, influence, and the will to rule or control.
    Power,
    /// Pursuit of knowledge, honesty, and understanding.
    Truth,
}

impl Drive {
    /// All drives in sheet order.
    pub const ALL: [Drive; 5] = [
        Self::Duty,
        Self::Faith,
        Self::Justice,
        Self::Power,
        Self::Truth,
    ];

    /// Lowercase identifier used as a point-buy key.
    pub fn id(self) -> &'static str {
        match self {
            Self::Duty => "duty",
            Self::Faith => "faith",
            Self::Justice => "justice",
            Self::Power => "power",
            Self::Truth => "truth",
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Duty => "Duty",
            Self::Faith => "Faith",
            Self::Justice => "Justice",
            Self::Power => "Power",
            Self::Truth => "Truth",
        }
    }

    /// Short description shown when assigning drives.
    pub fn description(self) -> &'static str {
        match self {
            Self::Duty => "Loyalty to House or cause above all else",
            Self::Faith => "Trust in religion, tradition, or a higher power",
            Self::Justice => "Belief in fairness, law, and moral order",
            Self::Power => "Ambition, influence, and the will to rule or control",
            Self::Truth => "Pursuit of knowledge, honesty, and understanding",
        }
    }

    /// Parse a drive from its id or display name, case-insensitively.
    pub fn from_name(s: &str) -> MechResult<Self> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|drive| drive.id() == lower)
            .ok_or_else(|| MechError::UnknownDrive(s.to_string()))
    }

    /// Identifiers of all drives, in sheet order.
    pub fn ids() -> Vec<&'static str> {
        Self::ALL.iter().map(|d| d.id()).collect()
    }
}

impl std::fmt::Display for Drive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_case_insensitive() {
        assert_eq!(Drive::from_name("Justice").unwrap(), Drive::Justice);
        assert!(matches!(
            Drive::from_name("greed"),
            Err(MechError::UnknownDrive(_))
        ));
    }

    #[test]
    fn ids_in_sheet_order() {
        assert_eq!(
            Drive::ids(),
            vec!["duty", "faith", "justice", "power", "truth"]
        );
    }
}
