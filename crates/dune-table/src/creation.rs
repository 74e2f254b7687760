//! In-progress character creation, one session per user per guild.
//!
//! Sessions hold the partial character while a player works through
//! creation. They expire after a period of inactivity: an expired session is
//! dropped the first time it is read, and [`CreationSessions::sweep`] clears
//! any that were never read again.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use dune_mechanics::{Assignment, Drive, PointBuy, Skill, ValidationResult};

use crate::error::{TableError, TableResult};

/// Identifies a creation session: one per user per guild.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionKey {
    /// Guild (server) id.
    pub guild_id: String,
    /// User id.
    pub user_id: String,
}

impl SessionKey {
    /// Create a key.
    pub fn new(guild_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            guild_id: guild_id.into(),
            user_id: user_id.into(),
        }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.guild_id, self.user_id)
    }
}

/// How the character is being built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreationKind {
    /// Filling in a sheet directly.
    #[default]
    Sheet,
    /// Combining two or more archetypes.
    MixedArchetype,
}

/// The partial character a session accumulates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterDraft {
    /// Character name.
    pub name: Option<String>,
    /// Character concepts.
    pub concepts: Vec<String>,
    /// Archetypes chosen for a mixed-archetype build.
    pub archetypes: Vec<String>,
    /// Great or minor house.
    pub house: Option<String>,
    /// Homeworld.
    pub homeworld: Option<String>,
    /// Accepted skill assignment.
    pub skills: Option<Assignment>,
    /// Accepted drive assignment.
    pub drives: Option<Assignment>,
    /// Focuses per skill.
    pub focuses: BTreeMap<Skill, Vec<String>>,
    /// Statement per drive.
    pub statements: BTreeMap<Drive, String>,
    /// Talents.
    pub talents: Vec<String>,
    /// Assets.
    pub assets: Vec<String>,
    /// Traits.
    pub traits: Vec<String>,
}

impl CharacterDraft {
    /// Required parts still missing, in the order a player fills them in.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.as_deref().is_none_or(|n| n.trim().is_empty()) {
            missing.push("name");
        }
        if self.concepts.is_empty() {
            missing.push("concept");
        }
        if self.skills.is_none() {
            missing.push("skills");
        }
        if self.drives.is_none() {
            missing.push("drives");
        }
        missing
    }
}

/// One user's creation in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationSession {
    /// Whose session this is.
    pub key: SessionKey,
    /// Build style.
    pub kind: CreationKind,
    /// The partial character.
    pub draft: CharacterDraft,
    /// When the session started.
    pub created_at: DateTime<Utc>,
    /// Last change; expiry counts from here.
    pub last_updated: DateTime<Utc>,
}

/// Every live creation session.
#[derive(Debug, Clone)]
pub struct CreationSessions {
    sessions: HashMap<SessionKey, CreationSession>,
    ttl: TimeDelta,
}

impl Default for CreationSessions {
    fn default() -> Self {
        Self::new(TimeDelta::hours(24))
    }
}

impl CreationSessions {
    /// Create an empty set of sessions that expire after `ttl` of inactivity.
    pub fn new(ttl: TimeDelta) -> Self {
        Self {
            sessions: HashMap::new(),
            ttl,
        }
    }

    /// Start a session, replacing any the user already had in that guild.
    pub fn start(
        &mut self,
        key: SessionKey,
        kind: CreationKind,
        now: DateTime<Utc>,
    ) -> &CreationSession {
        tracing::info!(session = %key, ?kind, "starting character creation");
        let session = CreationSession {
            key: key.clone(),
            kind,
            draft: CharacterDraft::default(),
            created_at: now,
            last_updated: now,
        };
        self.sessions.insert(key.clone(), session);
        &self.sessions[&key]
    }

    /// The live session for a key. Expired sessions are removed and not returned.
    pub fn get(&mut self, key: &SessionKey, now: DateTime<Utc>) -> Option<&CreationSession> {
        if self.sessions.get(key).is_some_and(|s| self.is_expired(s, now)) {
            self.sessions.remove(key);
            tracing::debug!(session = %key, "creation session expired");
            return None;
        }
        self.sessions.get(key)
    }

    /// Change the draft of a live session.
    pub fn update(
        &mut self,
        key: &SessionKey,
        now: DateTime<Utc>,
        change: impl FnOnce(&mut CharacterDraft),
    ) -> TableResult<&CreationSession> {
        let session = self.live_mut(key, now)?;
        change(&mut session.draft);
        session.last_updated = now;
        Ok(&*session)
    }

    /// Validate and store a skill assignment. Invalid assignments are not stored.
    pub fn commit_skills(
        &mut self,
        key: &SessionKey,
        assignment: Assignment,
        now: DateTime<Utc>,
    ) -> TableResult<ValidationResult> {
        self.commit(key, assignment, now, &PointBuy::skills(), |draft, a| {
            draft.skills = Some(a)
        })
    }

    /// Validate and store a drive assignment. Invalid assignments are not stored.
    pub fn commit_drives(
        &mut self,
        key: &SessionKey,
        assignment: Assignment,
        now: DateTime<Utc>,
    ) -> TableResult<ValidationResult> {
        self.commit(key, assignment, now, &PointBuy::drives(), |draft, a| {
            draft.drives = Some(a)
        })
    }

    /// Finish a session, handing back its contents.
    ///
    /// The session stays open if the draft is missing a required part.
    pub fn complete(
        &mut self,
        key: &SessionKey,
        now: DateTime<Utc>,
    ) -> TableResult<CreationSession> {
        let missing = self.live_mut(key, now)?.draft.missing();
        if !missing.is_empty() {
            return Err(TableError::IncompleteDraft(missing.join(", ")));
        }
        tracing::info!(session = %key, "character creation complete");
        self.sessions
            .remove(key)
            .ok_or(TableError::NoCreationInProgress)
    }

    /// Abandon a session. Returns true if one existed.
    pub fn cancel(&mut self, key: &SessionKey) -> bool {
        self.sessions.remove(key).is_some()
    }

    /// Drop every expired session. Returns how many were removed.
    pub fn sweep(&mut self, now: DateTime<Utc>) -> usize {
        let ttl = self.ttl;
        let before = self.sessions.len();
        self.sessions.retain(|_, s| now - s.last_updated <= ttl);
        let removed = before - self.sessions.len();
        if removed > 0 {
            tracing::info!(removed, "swept expired creation sessions");
        }
        removed
    }

    /// Number of sessions held, including any not yet swept.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// True when no sessions are held.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn is_expired(&self, session: &CreationSession, now: DateTime<Utc>) -> bool {
        now - session.last_updated > self.ttl
    }

    fn live_mut(
        &mut self,
        key: &SessionKey,
        now: DateTime<Utc>,
    ) -> TableResult<&mut CreationSession> {
        if self.get(key, now).is_none() {
            return Err(TableError::NoCreationInProgress);
        }
        self.sessions
            .get_mut(key)
            .ok_or(TableError::NoCreationInProgress)
    }

    fn commit(
        &mut self,
        key: &SessionKey,
        assignment: Assignment,
        now: DateTime<Utc>,
        rules: &PointBuy,
        store: impl FnOnce(&mut CharacterDraft, Assignment),
    ) -> TableResult<ValidationResult> {
        let session = self.live_mut(key, now)?;
        let result = rules.validate(&assignment);
        if result.is_valid() {
            store(&mut session.draft, assignment);
            session.last_updated = now;
        } else {
            tracing::debug!(session = %key, errors = result.errors.len(), "rejected assignment");
        }
        Ok(result)
    }
}
