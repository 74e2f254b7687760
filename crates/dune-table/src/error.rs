//! Error types for table state.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for table operations.
pub type TableResult<T> = Result<T, TableError>;

/// Errors that can occur while reading or changing table state.
#[derive(Debug, Error)]
pub enum TableError {
    /// A data file could not be read or written.
    #[error("failed to access {}: {source}", path.display())]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A data file did not contain the expected JSON.
    #[error("failed to parse {}: {source}", path.display())]
    Json {
        /// The file involved.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// One record in the character file could not be read.
    #[error("character record {index} ({id}) is malformed: {source}")]
    MalformedRecord {
        /// Position of the record in the file.
        index: usize,
        /// The record's id, or `?` if it has none.
        id: String,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// A stored record carries a schema version this build does not know.
    #[error("unsupported character schema version {0}")]
    UnsupportedSchema(u32),

    /// A spend asked for more Momentum than the pool holds.
    #[error("not enough momentum: {available} available, {requested} requested")]
    InsufficientMomentum {
        /// Momentum in the pool.
        available: u32,
        /// Momentum the player tried to spend.
        requested: u32,
    },

    /// No live creation session exists for the user in that guild.
    #[error("no character creation in progress")]
    NoCreationInProgress,

    /// A creation session was completed before every required part was filled in.
    #[error("character creation incomplete: missing {0}")]
    IncompleteDraft(String),

    /// The user already has the maximum number of characters in the guild.
    #[error("you already have {0} characters (maximum allowed)")]
    CharacterLimit(usize),

    /// Another character in the guild already has that name.
    #[error("a character named {0} already exists here")]
    DuplicateName(String),

    /// No character with that id or name.
    #[error("character not found: {0}")]
    CharacterNotFound(String),

    /// Only a character's owner may delete it.
    #[error("you can only delete your own characters")]
    NotOwner,

    /// No NPC with that id or name.
    #[error("NPC not found: {0}")]
    NpcNotFound(String),

    /// An NPC update named a field that cannot be edited.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// A field was given a value it cannot hold.
    #[error("invalid value for {field}: {value}")]
    InvalidValue {
        /// The field being set.
        field: String,
        /// The rejected value.
        value: String,
    },

    /// Rules engine error.
    #[error("{0}")]
    Mech(#[from] dune_mechanics::MechError),
}
