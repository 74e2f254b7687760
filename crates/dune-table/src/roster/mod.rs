//! Player characters, persisted per data directory.

pub mod migrate;
pub mod npcs;

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dune_mechanics::{Assignment, Drive, Skill, Track};

use crate::creation::CreationSession;
use crate::error::{TableError, TableResult};
use crate::store;
use migrate::StoredCharacter;

/// Schema version written with every character record.
pub const SCHEMA_VERSION: u32 = 2;

/// A drive rating and the statement that justifies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveEntry {
    /// Rating.
    pub value: u32,
    /// Drive statement, if one has been written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statement: Option<String>,
}

/// A player character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRecord {
    /// Record schema version.
    pub schema_version: u32,
    /// Unique id.
    pub id: String,
    /// Owner.
    pub user_id: String,
    /// Guild the character belongs to.
    pub guild_id: String,
    /// Character name.
    pub name: String,
    /// Concepts.
    pub concepts: Vec<String>,
    /// Archetypes the character was built from.
    #[serde(default)]
    pub archetypes: Vec<String>,
    /// House.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house: Option<String>,
    /// Homeworld.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homeworld: Option<String>,
    /// Skill ratings.
    pub skills: BTreeMap<Skill, u32>,
    /// Focuses per skill.
    #[serde(default)]
    pub focuses: BTreeMap<Skill, Vec<String>>,
    /// Drive ratings and statements.
    pub drives: BTreeMap<Drive, DriveEntry>,
    /// Talents.
    #[serde(default)]
    pub talents: Vec<String>,
    /// Assets.
    #[serde(default)]
    pub assets: Vec<String>,
    /// Traits.
    #[serde(default)]
    pub traits: Vec<String>,
    /// Determination track.
    pub determination: Track,
    /// Whether this is the owner's active character in the guild.
    pub active: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last change.
    pub last_updated: DateTime<Utc>,
}

impl CharacterRecord {
    /// Build a new character from a finished creation session.
    pub fn from_session(session: CreationSession, now: DateTime<Utc>) -> TableResult<Self> {
        let missing = session.draft.missing();
        if !missing.is_empty() {
            return Err(TableError::IncompleteDraft(missing.join(", ")));
        }
        let draft = session.draft;
        let skill_values = draft.skills.unwrap_or_default();
        let drive_values = draft.drives.unwrap_or_default();
        let mut statements = draft.statements;

        let mut skills = BTreeMap::new();
        for (id, value) in rating_pairs(&skill_values)? {
            skills.insert(Skill::from_name(id)?, value);
        }
        let mut drives = BTreeMap::new();
        for (id, value) in rating_pairs(&drive_values)? {
            let drive = Drive::from_name(id)?;
            let statement = statements.remove(&drive);
            drives.insert(drive, DriveEntry { value, statement });
        }

        Ok(Self {
            schema_version: SCHEMA_VERSION,
            id: uuid::Uuid::new_v4().to_string(),
            user_id: session.key.user_id,
            guild_id: session.key.guild_id,
            name: draft.name.unwrap_or_default().trim().to_string(),
            concepts: draft.concepts,
            archetypes: draft.archetypes,
            house: draft.house,
            homeworld: draft.homeworld,
            skills,
            focuses: draft.focuses,
            drives,
            talents: draft.talents,
            assets: draft.assets,
            traits: draft.traits,
            determination: Track::determination(),
            active: true,
            created_at: now,
            last_updated: now,
        })
    }

    /// Rating in a skill (0 if unset).
    pub fn skill(&self, skill: Skill) -> u32 {
        self.skills.get(&skill).copied().unwrap_or(0)
    }

    /// Rating in a drive (0 if unset).
    pub fn drive(&self, drive: Drive) -> u32 {
        self.drives.get(&drive).map_or(0, |d| d.value)
    }

    /// Target number for a test: skill plus drive.
    pub fn target_number(&self, skill: Skill, drive: Drive) -> u32 {
        self.skill(skill) + self.drive(drive)
    }
}

impl fmt::Display for CharacterRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.concepts.is_empty() {
            write!(f, " ({})", self.concepts.join(", "))?;
        }
        Ok(())
    }
}

fn rating_pairs(assignment: &Assignment) -> TableResult<Vec<(&str, u32)>> {
    assignment
        .iter()
        .map(|(key, value)| {
            u32::try_from(*value)
                .map(|v| (key.as_str(), v))
                .map_err(|_| TableError::InvalidValue {
                    field: key.clone(),
                    value: value.to_string(),
                })
        })
        .collect()
}

/// Counts from loading a roster file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Records loaded.
    pub loaded: usize,
    /// Records upgraded from an older schema.
    pub migrated: usize,
}

/// Every player character, keyed by id.
#[derive(Debug, Clone)]
pub struct CharacterRoster {
    path: Option<PathBuf>,
    characters: BTreeMap<String, CharacterRecord>,
    max_per_user: usize,
}

impl CharacterRoster {
    /// A roster that is never written to disk.
    pub fn in_memory(max_per_user: usize) -> Self {
        Self {
            path: None,
            characters: BTreeMap::new(),
            max_per_user,
        }
    }

    /// Load a roster file, upgrading older records. A missing file is an empty roster.
    pub fn load(path: impl Into<PathBuf>, max_per_user: usize) -> TableResult<(Self, LoadReport)> {
        let path = path.into();
        let stored: Vec<serde_json::Value> = store::load_json(&path)?.unwrap_or_default();
        let now = Utc::now();
        let mut report = LoadReport::default();
        let mut characters = BTreeMap::new();
        for (index, value) in stored.into_iter().enumerate() {
            let entry = StoredCharacter::from_value(index, value)?;
            let legacy = entry.is_legacy();
            let record = entry.migrate(now)?;
            if legacy {
                tracing::info!(id = %record.id, name = %record.name, "migrated character record");
                report.migrated += 1;
            }
            report.loaded += 1;
            characters.insert(record.id.clone(), record);
        }
        tracing::debug!(loaded = report.loaded, migrated = report.migrated, "loaded characters");
        Ok((
            Self {
                path: Some(path),
                characters,
                max_per_user,
            },
            report,
        ))
    }

    /// Write the roster back to its file. A no-op for in-memory rosters.
    pub fn save(&self) -> TableResult<()> {
        match &self.path {
            Some(path) => {
                let records: Vec<&CharacterRecord> = self.characters.values().collect();
                store::save_json(path, &records)
            }
            None => Ok(()),
        }
    }

    /// Create a character from a finished session.
    ///
    /// Names are unique per guild, ignoring case. The new character becomes
    /// the owner's active one in that guild.
    pub fn create(
        &mut self,
        session: CreationSession,
        now: DateTime<Utc>,
    ) -> TableResult<&CharacterRecord> {
        let owned = self.for_user(&session.key.user_id, &session.key.guild_id).len();
        if owned >= self.max_per_user {
            return Err(TableError::CharacterLimit(self.max_per_user));
        }
        let record = CharacterRecord::from_session(session, now)?;
        if self.find_by_name(&record.guild_id, &record.name).is_some() {
            return Err(TableError::DuplicateName(record.name));
        }
        for other in self.characters.values_mut() {
            if other.user_id == record.user_id && other.guild_id == record.guild_id {
                other.active = false;
            }
        }
        tracing::info!(name = %record.name, user = %record.user_id, "created character");
        let id = record.id.clone();
        Ok(&*self.characters.entry(id).or_insert(record))
    }

    /// A character by id.
    pub fn get(&self, id: &str) -> Option<&CharacterRecord> {
        self.characters.get(id)
    }

    /// A character in a guild by name, ignoring case.
    pub fn find_by_name(&self, guild_id: &str, name: &str) -> Option<&CharacterRecord> {
        self.characters
            .values()
            .find(|c| c.guild_id == guild_id && c.name.eq_ignore_ascii_case(name.trim()))
    }

    /// A character the user owns in a guild, by name, ignoring case.
    pub fn find_owned_by_name(
        &self,
        user_id: &str,
        guild_id: &str,
        name: &str,
    ) -> Option<&CharacterRecord> {
        self.for_user(user_id, guild_id)
            .into_iter()
            .find(|c| c.name.eq_ignore_ascii_case(name.trim()))
    }

    /// A character by name as seen by `user_id`: their own first, then anyone's in the guild.
    pub fn find_for_user(
        &self,
        user_id: &str,
        guild_id: &str,
        name: &str,
    ) -> Option<&CharacterRecord> {
        self.find_owned_by_name(user_id, guild_id, name)
            .or_else(|| self.find_by_name(guild_id, name))
    }

    /// Every character a user owns in a guild.
    pub fn for_user(&self, user_id: &str, guild_id: &str) -> Vec<&CharacterRecord> {
        self.characters
            .values()
            .filter(|c| c.user_id == user_id && c.guild_id == guild_id)
            .collect()
    }

    /// Every character in a guild.
    pub fn for_guild(&self, guild_id: &str) -> Vec<&CharacterRecord> {
        self.characters
            .values()
            .filter(|c| c.guild_id == guild_id)
            .collect()
    }

    /// The user's active character in a guild.
    pub fn active_for(&self, user_id: &str, guild_id: &str) -> Option<&CharacterRecord> {
        self.for_user(user_id, guild_id)
            .into_iter()
            .filter(|c| c.active)
            .max_by_key(|c| c.last_updated)
    }

    /// Delete a character. Only its owner may do so.
    pub fn delete(&mut self, id: &str, requested_by: &str) -> TableResult<CharacterRecord> {
        let record = self
            .characters
            .get(id)
            .ok_or_else(|| TableError::CharacterNotFound(id.to_string()))?;
        if record.user_id != requested_by {
            return Err(TableError::NotOwner);
        }
        let record = self
            .characters
            .remove(id)
            .ok_or_else(|| TableError::CharacterNotFound(id.to_string()))?;
        tracing::info!(name = %record.name, user = requested_by, "deleted character");
        Ok(record)
    }

    /// Spend or regain Determination, clamped to the track.
    pub fn adjust_determination(
        &mut self,
        id: &str,
        delta: i32,
        now: DateTime<Utc>,
    ) -> TableResult<&CharacterRecord> {
        let record = self
            .characters
            .get_mut(id)
            .ok_or_else(|| TableError::CharacterNotFound(id.to_string()))?;
        record.determination.adjust(delta);
        record.last_updated = now;
        Ok(&*record)
    }

    /// Number of characters.
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    /// True when there are no characters.
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}
