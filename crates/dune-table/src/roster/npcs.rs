//! Gamemaster-run characters for a guild.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{TableError, TableResult};
use crate::store;

/// How dangerous an NPC is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NpcTier {
    /// Mooks and extras.
    #[default]
    Minion,
    /// Capable opposition.
    Toughened,
    /// Major antagonists.
    Nemesis,
}

impl NpcTier {
    /// All tiers, weakest first.
    pub const ALL: [NpcTier; 3] = [Self::Minion, Self::Toughened, Self::Nemesis];

    /// Parse a tier name, case-insensitively.
    pub fn from_name(s: &str) -> TableResult<Self> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.id() == lower)
            .ok_or_else(|| TableError::InvalidValue {
                field: "tier".to_string(),
                value: s.to_string(),
            })
    }

    /// Lowercase identifier.
    pub fn id(self) -> &'static str {
        match self {
            Self::Minion => "minion",
            Self::Toughened => "toughened",
            Self::Nemesis => "nemesis",
        }
    }

    /// Default rating in every skill.
    pub fn skill_rating(self) -> u32 {
        match self {
            Self::Minion => 1,
            Self::Toughened => 2,
            Self::Nemesis => 3,
        }
    }

    /// The single target number used for quick NPC rolls.
    pub fn target_number(self) -> u32 {
        match self {
            Self::Minion => 7,
            Self::Toughened => 8,
            Self::Nemesis => 9,
        }
    }
}

impl fmt::Display for NpcTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Minion => "Minion",
            Self::Toughened => "Toughened",
            Self::Nemesis => "Nemesis",
        };
        write!(f, "{name}")
    }
}

/// A stored NPC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NpcRecord {
    /// Unique id.
    pub id: String,
    /// Guild the NPC belongs to.
    pub guild_id: String,
    /// Name.
    pub name: String,
    /// Concepts.
    #[serde(default)]
    pub concepts: Vec<String>,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Tier, if one was chosen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<NpcTier>,
    /// User who created the NPC.
    pub created_by: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl NpcRecord {
    /// Target number for a quick roll. Untiered NPCs roll as minions.
    pub fn target_number(&self) -> u32 {
        self.tier.unwrap_or_default().target_number()
    }
}

/// Fields supplied when creating an NPC.
#[derive(Debug, Clone, Default)]
pub struct NewNpc {
    /// Guild.
    pub guild_id: String,
    /// Name.
    pub name: String,
    /// Concepts.
    pub concepts: Vec<String>,
    /// Description.
    pub description: String,
    /// Tier.
    pub tier: Option<NpcTier>,
    /// Creating user.
    pub created_by: String,
}

/// Every NPC, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct NpcRoster {
    path: Option<PathBuf>,
    npcs: BTreeMap<String, NpcRecord>,
}

impl NpcRoster {
    /// A roster that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load an NPC file. A missing file is an empty roster.
    pub fn load(path: impl Into<PathBuf>) -> TableResult<Self> {
        let path = path.into();
        let records: Vec<NpcRecord> = store::load_json(&path)?.unwrap_or_default();
        Ok(Self {
            path: Some(path),
            npcs: records.into_iter().map(|n| (n.id.clone(), n)).collect(),
        })
    }

    /// Write the roster back to its file. A no-op for in-memory rosters.
    pub fn save(&self) -> TableResult<()> {
        match &self.path {
            Some(path) => store::save_json(path, &self.npcs.values().collect::<Vec<_>>()),
            None => Ok(()),
        }
    }

    /// Add an NPC.
    pub fn create(&mut self, new: NewNpc, now: DateTime<Utc>) -> &NpcRecord {
        let record = NpcRecord {
            id: uuid::Uuid::new_v4().to_string(),
            guild_id: new.guild_id,
            name: new.name,
            concepts: new.concepts,
            description: new.description,
            tier: new.tier,
            created_by: new.created_by,
            created_at: now,
        };
        tracing::info!(name = %record.name, by = %record.created_by, "created NPC");
        self.npcs.entry(record.id.clone()).or_insert(record)
    }

    /// Change one field: `name`, `concept`, `description` or `tier`.
    ///
    /// Setting `concept` replaces every concept with the new one.
    pub fn update_field(&mut self, id: &str, field: &str, value: &str) -> TableResult<&NpcRecord> {
        let npc = self
            .npcs
            .get_mut(id)
            .ok_or_else(|| TableError::NpcNotFound(id.to_string()))?;
        match field.trim().to_lowercase().as_str() {
            "name" => npc.name = value.to_string(),
            "concept" => npc.concepts = vec![value.to_string()],
            "description" => npc.description = value.to_string(),
            "tier" => npc.tier = Some(NpcTier::from_name(value)?),
            _ => return Err(TableError::UnknownField(field.to_string())),
        }
        tracing::info!(name = %npc.name, field, "updated NPC");
        Ok(&*npc)
    }

    /// Remove an NPC.
    pub fn delete(&mut self, id: &str) -> TableResult<NpcRecord> {
        let npc = self
            .npcs
            .remove(id)
            .ok_or_else(|| TableError::NpcNotFound(id.to_string()))?;
        tracing::info!(name = %npc.name, "deleted NPC");
        Ok(npc)
    }

    /// An NPC by id.
    pub fn get(&self, id: &str) -> Option<&NpcRecord> {
        self.npcs.get(id)
    }

    /// An NPC in a guild by name, ignoring case.
    pub fn find_by_name(&self, guild_id: &str, name: &str) -> Option<&NpcRecord> {
        let name_lower = name.trim().to_lowercase();
        self.npcs
            .values()
            .find(|n| n.guild_id == guild_id && n.name.to_lowercase() == name_lower)
    }

    /// Every NPC in a guild.
    pub fn for_guild(&self, guild_id: &str) -> Vec<&NpcRecord> {
        self.npcs.values().filter(|n| n.guild_id == guild_id).collect()
    }

    /// Number of NPCs.
    pub fn len(&self) -> usize {
        self.npcs.len()
    }

    /// True when there are no NPCs.
    pub fn is_empty(&self) -> bool {
        self.npcs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard(tier: Option<NpcTier>) -> NewNpc {
        NewNpc {
            guild_id: "g1".into(),
            name: "Sardaukar Guard".into(),
            concepts: vec!["Elite soldier".into()],
            description: "Imperial terror troops".into(),
            tier,
            created_by: "gm".into(),
        }
    }

    #[test]
    fn create_and_find() {
        let mut roster = NpcRoster::in_memory();
        let id = roster.create(guard(None), Utc::now()).id.clone();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.find_by_name("g1", "sardaukar guard").unwrap().id, id);
        assert!(roster.find_by_name("g2", "Sardaukar Guard").is_none());
    }

    #[test]
    fn tier_drives_target_number() {
        let mut roster = NpcRoster::in_memory();
        let minion = roster.create(guard(None), Utc::now()).target_number();
        assert_eq!(minion, 7);
        let nemesis = roster
            .create(guard(Some(NpcTier::Nemesis)), Utc::now())
            .target_number();
        assert_eq!(nemesis, 9);
    }

    #[test]
    fn tier_ratings() {
        let skills: Vec<u32> = NpcTier::ALL.iter().map(|t| t.skill_rating()).collect();
        assert_eq!(skills, vec![1, 2, 3]);
        assert_eq!(NpcTier::from_name(" Toughened ").unwrap(), NpcTier::Toughened);
        assert!(NpcTier::from_name("boss").is_err());
    }

    #[test]
    fn update_fields() {
        let mut roster = NpcRoster::in_memory();
        let id = roster.create(guard(None), Utc::now()).id.clone();
        roster.update_field(&id, "name", "Bashar").unwrap();
        roster.update_field(&id, "concept", "Commander").unwrap();
        roster.update_field(&id, "description", "Leads the assault").unwrap();
        let npc = roster.update_field(&id, "TIER", "nemesis").unwrap();
        assert_eq!(npc.name, "Bashar");
        assert_eq!(npc.concepts, vec!["Commander".to_string()]);
        assert_eq!(npc.description, "Leads the assault");
        assert_eq!(npc.tier, Some(NpcTier::Nemesis));
    }

    #[test]
    fn update_rejects_unknown_field_and_tier() {
        let mut roster = NpcRoster::in_memory();
        let id = roster.create(guard(None), Utc::now()).id.clone();
        assert!(matches!(
            roster.update_field(&id, "house", "Harkonnen"),
            Err(TableError::UnknownField(_))
        ));
        assert!(matches!(
            roster.update_field(&id, "tier", "boss"),
            Err(TableError::InvalidValue { .. })
        ));
        assert!(matches!(
            roster.update_field("missing", "name", "x"),
            Err(TableError::NpcNotFound(_))
        ));
    }

    #[test]
    fn delete_npc() {
        let mut roster = NpcRoster::in_memory();
        let id = roster.create(guard(None), Utc::now()).id.clone();
        assert_eq!(roster.delete(&id).unwrap().name, "Sardaukar Guard");
        assert!(roster.is_empty());
        assert!(roster.delete(&id).is_err());
    }

    #[test]
    fn for_guild_filters() {
        let mut roster = NpcRoster::in_memory();
        roster.create(guard(None), Utc::now());
        let mut other = guard(None);
        other.guild_id = "g2".into();
        roster.create(other, Utc::now());
        assert_eq!(roster.for_guild("g1").len(), 1);
    }

    #[test]
    fn save_and_reload() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("npcs.json");
        let mut roster = NpcRoster::load(&path).unwrap();
        let id = roster
            .create(guard(Some(NpcTier::Toughened)), Utc::now())
            .id
            .clone();
        roster.save().unwrap();

        let reloaded = NpcRoster::load(&path).unwrap();
        assert_eq!(reloaded.get(&id), roster.get(&id));
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"tier\": \"toughened\""));
        assert!(text.contains("\"createdBy\": \"gm\""));
    }
}
