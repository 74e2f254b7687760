//! Character resource tracks (Determination and similar).
//!
//! A track is a non-negative value with a ceiling. Adjustments clamp
//! instead of failing, matching how spends and refreshes work at the table.

use serde::{Deserialize, Serialize};

/// Starting and maximum Determination for a new character.
pub const STARTING_DETERMINATION: u32 = 3;

/// A named resource clamped between 0 and `max`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Display name of the track.
    pub name: String,
    /// Current value.
    pub current: u32,
    /// Maximum value.
    pub max: u32,
}

impl Track {
    /// Create a new track starting full.
    pub fn new(name: impl Into<String>, max: u32) -> Self {
        Self {
            name: name.into(),
            current: max,
            max,
        }
    }

    /// A full Determination track.
    pub fn determination() -> Self {
        Self::new("Determination", STARTING_DETERMINATION)
    }

    /// Adjust the track by a delta, clamping to bounds. Returns the new value.
    pub fn adjust(&mut self, delta: i32) -> u32 {
        self.current = self.current.saturating_add_signed(delta).min(self.max);
        self.current
    }

    /// Returns true if the track is at zero.
    pub fn is_empty(&self) -> bool {
        self.current == 0
    }

    /// Returns true if the track is at its maximum value.
    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }
}

impl std::fmt::Display for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}/{}", self.name, self.current, self.max)
    }
}
