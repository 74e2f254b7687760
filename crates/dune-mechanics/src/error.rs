//! Error types for the rules engine.

/// Errors that can occur during rules operations.
#[derive(Debug, thiserror::Error)]
pub enum MechError {
    /// A roll request was rejected before any dice were rolled.
    #[error("invalid roll request: {0}")]
    InvalidRequest(String),

    /// A skill name did not match any skill in the ruleset.
    #[error("unknown skill: {0}")]
    UnknownSkill(String),

    /// A drive name did not match any drive in the ruleset.
    #[error("unknown drive: {0}")]
    UnknownDrive(String),

    /// A point-buy submission could not be parsed.
    #[error("malformed assignment: {0}")]
    MalformedAssignment(String),
}

/// Convenience result type for rules operations.
pub type MechResult<T> = Result<T, MechError>;
