//! Table state for Dune 2d20 play.
//!
//! Holds everything that outlives a single roll: the per-channel Momentum
//! and Threat pools, in-progress character creation sessions, the character
//! roster (with load-time migration of older record shapes), the NPC roster,
//! and the configuration that locates all of it on disk.

pub mod config;
pub mod creation;
pub mod error;
pub mod momentum;
pub mod roster;
mod store;

pub use config::TableConfig;
pub use creation::{CharacterDraft, CreationKind, CreationSession, CreationSessions, SessionKey};
pub use error::{TableError, TableResult};
pub use momentum::{
    JsonPoolStore, MemoryPoolStore, MomentumPool, MomentumTracker, PoolMap, PoolStore,
};
pub use roster::npcs::{NewNpc, NpcRecord, NpcRoster, NpcTier};
pub use roster::{CharacterRecord, CharacterRoster, DriveEntry, LoadReport};
