//! Canonical ruleset data: the five skills, the five drives, and the
//! point-buy values each is assigned from during character creation.

pub mod drives;
pub mod skills;

pub use drives::Drive;
pub use skills::Skill;

/// Values distributed one-to-one across the five skills.
pub const SKILL_POINT_VALUES: [i32; 5] = [9, 7, 6, 5, 4];

/// Values distributed one-to-one across the five drives (30 points total).
pub const DRIVE_POINT_VALUES: [i32; 5] = [8, 7, 6, 5, 4];

/// Highest target number a skill and drive can combine into at creation.
pub const MAX_STARTING_TARGET: u32 = 17;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drive_values_total_thirty() {
        assert_eq!(DRIVE_POINT_VALUES.iter().sum::<i32>(), 30);
    }

    #[test]
    fn best_starting_target() {
        let best = SKILL_POINT_VALUES[0] + DRIVE_POINT_VALUES[0];
        assert_eq!(best as u32, MAX_STARTING_TARGET);
    }
}
