//! Point-buy validation for character creation.
//!
//! Skills and drives are assigned by distributing a fixed set of values one
//! to one across five named categories. A submission is checked in full so
//! the player sees every problem at once rather than one per attempt.

use std::collections::BTreeMap;

use crate::error::{MechError, MechResult};
use crate::rules::{DRIVE_POINT_VALUES, Drive, SKILL_POINT_VALUES, Skill};

/// Category name to assigned value, as submitted by a player.
pub type Assignment = BTreeMap<String, i32>;

/// The outcome of validating an assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    /// Human-readable problems, in check order. Empty when valid.
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// True when no problems were found.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// All errors joined by newlines, ready to show the player.
    pub fn message(&self) -> String {
        self.errors.join("\n")
    }
}

impl std::fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "valid")
        } else {
            write!(f, "{}", self.message())
        }
    }
}

/// Check an assignment against the required keys and the allowed values.
///
/// Checks run in order and all of them always run:
/// 1. every required key is present (one error per missing key)
/// 2. no other key is present (one error per unexpected key)
/// 3. the values are exactly the allowed multiset (one aggregate error)
pub fn validate_assignment(
    assignment: &Assignment,
    allowed_values: &[i32],
    required_keys: &[&str],
) -> ValidationResult {
    let mut errors = Vec::new();

    for key in required_keys {
        if !assignment.contains_key(*key) {
            errors.push(format!("missing value for '{key}'"));
        }
    }

    for key in assignment.keys() {
        if !required_keys.contains(&key.as_str()) {
            errors.push(format!("unexpected entry '{key}'"));
        }
    }

    let expected = sorted_descending(allowed_values.iter().copied());
    let actual = sorted_descending(assignment.values().copied());
    if expected != actual {
        errors.push(format!(
            "values must be exactly {}, got {}",
            format_values(&expected),
            format_values(&actual)
        ));
    }

    ValidationResult { errors }
}

fn sorted_descending(values: impl Iterator<Item = i32>) -> Vec<i32> {
    let mut v: Vec<i32> = values.collect();
    v.sort_unstable_by(|a, b| b.cmp(a));
    v
}

fn format_values(values: &[i32]) -> String {
    let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", parts.join(", "))
}

/// A point-buy scheme: which keys must be assigned and from which values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointBuy {
    /// Required category keys, in display order.
    pub keys: Vec<&'static str>,
    /// The multiset of values to distribute.
    pub values: Vec<i32>,
}

impl PointBuy {
    /// Skills: 9, 7, 6, 5, 4 across the five skills.
    pub fn skills() -> Self {
        Self {
            keys: Skill::ids(),
            values: SKILL_POINT_VALUES.to_vec(),
        }
    }

    /// Drives: 8, 7, 6, 5, 4 across the five drives.
    pub fn drives() -> Self {
        Self {
            keys: Drive::ids(),
            values: DRIVE_POINT_VALUES.to_vec(),
        }
    }

    /// Validate an assignment against this scheme.
    pub fn validate(&self, assignment: &Assignment) -> ValidationResult {
        validate_assignment(assignment, &self.values, &self.keys)
    }
}

/// Parse a `key=value` list separated by commas or whitespace.
///
/// Keys are trimmed and lowercased. Repeated keys are rejected.
pub fn parse_assignment(input: &str) -> MechResult<Assignment> {
    let mut assignment = Assignment::new();
    for pair in input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty())
    {
        let (key, value) = pair.split_once('=').ok_or_else(|| {
            MechError::MalformedAssignment(format!("expected key=value, got '{pair}'"))
        })?;
        let key = key.trim().to_lowercase();
        if key.is_empty() {
            return Err(MechError::MalformedAssignment(format!(
                "missing key in '{pair}'"
            )));
        }
        let value: i32 = value.trim().parse().map_err(|_| {
            MechError::MalformedAssignment(format!("'{}' is not a whole number", value.trim()))
        })?;
        if assignment.insert(key.clone(), value).is_some() {
            return Err(MechError::MalformedAssignment(format!(
                "'{key}' assigned more than once"
            )));
        }
    }
    Ok(assignment)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(pairs: &[(&str, i32)]) -> Assignment {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    const SKILL_KEYS: [&str; 5] = ["battle", "communicate", "discipline", "move", "understand"];

    #[test]
    fn valid_skill_assignment() {
        let a = assignment(&[
            ("battle", 9),
            ("communicate", 7),
            ("discipline", 6),
            ("move", 5),
            ("understand", 4),
        ]);
        let result = validate_assignment(&a, &[9, 7, 6, 5, 4], &SKILL_KEYS);
        assert!(result.is_valid());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn duplicate_value_reports_mismatch() {
        let a = assignment(&[
            ("battle", 9),
            ("communicate", 9),
            ("discipline", 6),
            ("move", 5),
            ("understand", 4),
        ]);
        let result = validate_assignment(&a, &[9, 7, 6, 5, 4], &SKILL_KEYS);
        assert!(!result.is_valid());
        assert_eq!(
            result.errors,
            vec!["values must be exactly [9, 7, 6, 5, 4], got [9, 9, 6, 5, 4]".to_string()]
        );
    }

    #[test]
    fn missing_key_is_named() {
        let a = assignment(&[
            ("battle", 9),
            ("communicate", 7),
            ("discipline", 6),
            ("move", 5),
        ]);
        let result = validate_assignment(&a, &[9, 7, 6, 5, 4], &SKILL_KEYS);
        assert!(!result.is_valid());
        assert_eq!(result.errors[0], "missing value for 'understand'");
        // the missing 4 also breaks the multiset
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn unexpected_key_is_reported() {
        let a = assignment(&[
            ("battle", 9),
            ("communicate", 7),
            ("discipline", 6),
            ("move", 5),
            ("understand", 4),
            ("piloting", 3),
        ]);
        let result = validate_assignment(&a, &[9, 7, 6, 5, 4], &SKILL_KEYS);
        assert!(result.errors.contains(&"unexpected entry 'piloting'".to_string()));
    }

    #[test]
    fn errors_accumulate_in_order() {
        let a = assignment(&[("battle", 12), ("sneak", 7)]);
        let result = validate_assignment(&a, &[9, 7, 6, 5, 4], &SKILL_KEYS);
        assert_eq!(
            result.errors,
            vec![
                "missing value for 'communicate'".to_string(),
                "missing value for 'discipline'".to_string(),
                "missing value for 'move'".to_string(),
                "missing value for 'understand'".to_string(),
                "unexpected entry 'sneak'".to_string(),
                "values must be exactly [9, 7, 6, 5, 4], got [12, 7]".to_string(),
            ]
        );
    }

    #[test]
    fn empty_assignment() {
        let result = PointBuy::skills().validate(&Assignment::new());
        assert_eq!(result.errors.len(), 6);
        assert!(result.message().contains("got []"));
    }

    #[test]
    fn drive_preset_uses_canonical_values() {
        let a = assignment(&[
            ("duty", 8),
            ("faith", 4),
            ("justice", 7),
            ("power", 5),
            ("truth", 6),
        ]);
        assert!(PointBuy::drives().validate(&a).is_valid());

        let skills_values = assignment(&[
            ("duty", 9),
            ("faith", 4),
            ("justice", 7),
            ("power", 5),
            ("truth", 6),
        ]);
        assert!(!PointBuy::drives().validate(&skills_values).is_valid());
    }

    #[test]
    fn message_joins_with_newlines() {
        let result = ValidationResult {
            errors: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(result.message(), "a\nb");
        assert_eq!(result.to_string(), "a\nb");
        assert_eq!(ValidationResult::default().to_string(), "valid");
    }

    #[test]
    fn parse_pairs() {
        let a =
            parse_assignment("Battle=9, communicate=7 discipline=6,move=5,understand=4").unwrap();
        assert_eq!(a.len(), 5);
        assert_eq!(a["battle"], 9);
        assert!(PointBuy::skills().validate(&a).is_valid());
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!(parse_assignment("battle:9").is_err());
        assert!(parse_assignment("battle=nine").is_err());
        assert!(parse_assignment("=9").is_err());
        assert!(parse_assignment("battle=9,Battle=7").is_err());
    }

    #[test]
    fn parse_keeps_negative_values_for_validation() {
        let a = parse_assignment("battle=-1").unwrap();
        assert_eq!(a["battle"], -1);
    }
}
