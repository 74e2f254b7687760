//! Difficulty modifiers and assistance.

use serde::{Deserialize, Serialize};

/// Most bonus dice a test can gain from assisting characters.
pub const MAX_ASSISTANCE_DICE: u32 = 3;

/// Distance to the target of a ranged action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Range {
    /// No penalty.
    #[default]
    Close,
    /// +1 difficulty.
    Medium,
    /// +2 difficulty.
    Long,
    /// +3 difficulty.
    Extreme,
}

/// Cover protecting the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cover {
    /// No penalty.
    #[default]
    None,
    /// +1 difficulty.
    Light,
    /// +2 difficulty.
    Heavy,
    /// +3 difficulty.
    Total,
}

impl Range {
    fn penalty(self) -> u32 {
        match self {
            Self::Close => 0,
            Self::Medium => 1,
            Self::Long => 2,
            Self::Extreme => 3,
        }
    }

    /// Parse a range from a name like "medium".
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "close" => Some(Self::Close),
            "medium" => Some(Self::Medium),
            "long" => Some(Self::Long),
            "extreme" => Some(Self::Extreme),
            _ => None,
        }
    }
}

impl Cover {
    fn penalty(self) -> u32 {
        match self {
            Self::None => 0,
            Self::Light => 1,
            Self::Heavy => 2,
            Self::Total => 3,
        }
    }

    /// Parse cover from a name like "heavy".
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" => Some(Self::None),
            "light" => Some(Self::Light),
            "heavy" => Some(Self::Heavy),
            "total" => Some(Self::Total),
            _ => None,
        }
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Close => write!(f, "Close range"),
            Self::Medium => write!(f, "Medium range"),
            Self::Long => write!(f, "Long range"),
            Self::Extreme => write!(f, "Extreme range"),
        }
    }
}

impl std::fmt::Display for Cover {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "no cover"),
            Self::Light => write!(f, "light cover"),
            Self::Heavy => write!(f, "heavy cover"),
            Self::Total => write!(f, "total cover"),
        }
    }
}

/// A computed difficulty with a human-readable breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyModifier {
    /// The resulting difficulty (base 1).
    pub difficulty: u32,
    /// Description of the penalties applied.
    pub description: String,
}

/// Difficulty of a ranged action at the given range against the given cover.
pub fn difficulty_for(range: Range, cover: Cover) -> DifficultyModifier {
    let difficulty = 1 + range.penalty() + cover.penalty();

    let mut description = range.to_string();
    if range.penalty() > 0 {
        description.push_str(&format!(" (+{} difficulty)", range.penalty()));
    }
    if cover.penalty() > 0 {
        description.push_str(&format!(", {cover} (+{} difficulty)", cover.penalty()));
    }

    DifficultyModifier {
        difficulty,
        description,
    }
}

/// Bonus dice from assisting characters who have the relevant skill.
///
/// Each such assistant adds one die, up to [`MAX_ASSISTANCE_DICE`].
pub fn assistance_dice(assistants_with_skill: u32) -> u32 {
    assistants_with_skill.min(MAX_ASSISTANCE_DICE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_without_cover_is_base() {
        let m = difficulty_for(Range::Close, Cover::None);
        assert_eq!(m.difficulty, 1);
        assert_eq!(m.description, "Close range");
    }

    #[test]
    fn penalties_stack() {
        let m = difficulty_for(Range::Long, Cover::Heavy);
        assert_eq!(m.difficulty, 5);
        assert_eq!(
            m.description,
            "Long range (+2 difficulty), heavy cover (+2 difficulty)"
        );
    }

    #[test]
    fn extreme_total() {
        assert_eq!(difficulty_for(Range::Extreme, Cover::Total).difficulty, 7);
    }

    #[test]
    fn parse_names() {
        assert_eq!(Range::from_name("Medium"), Some(Range::Medium));
        assert_eq!(Range::from_name("far"), None);
        assert_eq!(Cover::from_name(" light "), Some(Cover::Light));
        assert_eq!(Cover::from_name("partial"), None);
    }

    #[test]
    fn assistance_is_capped() {
        assert_eq!(assistance_dice(0), 0);
        assert_eq!(assistance_dice(2), 2);
        assert_eq!(assistance_dice(5), 3);
    }
}
