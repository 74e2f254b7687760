//! Upgrading stored character records to the current schema.
//!
//! Records written before versioning have no `schemaVersion`, keep skills
//! and drives as lists, store Determination as two bare numbers, and may
//! hold `concepts` as a single string. A record is dispatched on its
//! `schemaVersion` field and legacy ones are converted once, at load.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use dune_mechanics::{Drive, Skill, Track};

use super::{CharacterRecord, DriveEntry, SCHEMA_VERSION};
use crate::error::{TableError, TableResult};

/// A character record as found on disk.
#[derive(Debug, Clone)]
pub enum StoredCharacter {
    /// A versioned record.
    Current(CharacterRecord),
    /// A record from before versioning.
    Legacy(LegacyCharacter),
}

/// Concepts as older records stored them.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LegacyConcepts {
    /// A single concept string.
    One(String),
    /// A list of concepts.
    Many(Vec<String>),
}

impl LegacyConcepts {
    fn into_list(self) -> Vec<String> {
        match self {
            Self::One(concept) if concept.trim().is_empty() => Vec::new(),
            Self::One(concept) => vec![concept],
            Self::Many(concepts) => concepts,
        }
    }
}

/// Unversioned character record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyCharacter {
    /// Record id.
    pub id: String,
    /// Owner.
    pub user_id: String,
    /// Guild.
    pub guild_id: String,
    /// Character name.
    pub name: String,
    /// Concepts in whichever shape they were saved.
    #[serde(default)]
    pub concepts: Option<LegacyConcepts>,
    /// House.
    #[serde(default)]
    pub house: Option<String>,
    /// Homeworld.
    #[serde(default)]
    pub homeworld: Option<String>,
    /// Skills as a list.
    #[serde(default)]
    pub skills: Vec<LegacySkill>,
    /// Drives as a list.
    #[serde(default)]
    pub drives: Vec<LegacyDrive>,
    /// Assets, talents included.
    #[serde(default)]
    pub assets: Vec<LegacyEntry>,
    /// Traits.
    #[serde(default)]
    pub traits: Vec<LegacyEntry>,
    /// Current Determination.
    #[serde(default = "default_determination")]
    pub determination: u32,
    /// Maximum Determination.
    #[serde(default = "default_determination")]
    pub max_determination: u32,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last change.
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    /// Whether the character was the active one.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// A skill entry from an unversioned record.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacySkill {
    /// Skill name.
    pub name: String,
    /// Rating.
    pub value: u32,
    /// Focuses.
    #[serde(default)]
    pub focus: Vec<String>,
}

/// A drive entry from an unversioned record.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyDrive {
    /// Drive name.
    pub name: String,
    /// Rating.
    pub value: u32,
    /// Drive statement.
    #[serde(default)]
    pub statement: String,
}

/// An asset or trait from an unversioned record.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyEntry {
    /// Name.
    pub name: String,
    /// Category (`talent`, `equipment`, `flaw`, ...).
    #[serde(rename = "type", default)]
    pub kind: String,
}

fn default_determination() -> u32 {
    dune_mechanics::sheet::STARTING_DETERMINATION
}

fn default_active() -> bool {
    true
}

impl StoredCharacter {
    /// Read the record at `index` of a roster file.
    ///
    /// No `schemaVersion` means legacy. The current version is read as a
    /// [`CharacterRecord`]; any other version is rejected.
    pub fn from_value(index: usize, value: Value) -> TableResult<Self> {
        let id = value
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or("?")
            .to_string();
        let malformed = |source: serde_json::Error| TableError::MalformedRecord {
            index,
            id: id.clone(),
            source,
        };
        let version = value.get("schemaVersion").filter(|v| !v.is_null()).cloned();
        match version {
            None => decode(value).map(Self::Legacy).map_err(malformed),
            Some(version) => {
                let version: u32 = decode(version).map_err(malformed)?;
                if version != SCHEMA_VERSION {
                    return Err(TableError::UnsupportedSchema(version));
                }
                decode(value).map(Self::Current).map_err(malformed)
            }
        }
    }

    /// True for a record that needs upgrading.
    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy(_))
    }

    /// Bring the record up to the current schema. `now` stands in for missing timestamps.
    pub fn migrate(self, now: DateTime<Utc>) -> TableResult<CharacterRecord> {
        match self {
            Self::Current(record) if record.schema_version == SCHEMA_VERSION => Ok(record),
            Self::Current(record) => Err(TableError::UnsupportedSchema(record.schema_version)),
            Self::Legacy(legacy) => Ok(legacy.upgrade(now)),
        }
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(value)
}

impl LegacyCharacter {
    fn upgrade(self, now: DateTime<Utc>) -> CharacterRecord {
        let mut skills = BTreeMap::new();
        let mut focuses = BTreeMap::new();
        for entry in self.skills {
            match Skill::from_name(&entry.name) {
                Ok(skill) => {
                    skills.insert(skill, entry.value);
                    if !entry.focus.is_empty() {
                        focuses.insert(skill, entry.focus);
                    }
                }
                Err(_) => {
                    tracing::warn!(
                        character = %self.id,
                        skill = %entry.name,
                        "dropping unknown skill"
                    );
                }
            }
        }

        let mut drives = BTreeMap::new();
        for entry in self.drives {
            match Drive::from_name(&entry.name) {
                Ok(drive) => {
                    let statement = Some(entry.statement).filter(|s| !s.trim().is_empty());
                    drives.insert(
                        drive,
                        DriveEntry {
                            value: entry.value,
                            statement,
                        },
                    );
                }
                Err(_) => {
                    tracing::warn!(
                        character = %self.id,
                        drive = %entry.name,
                        "dropping unknown drive"
                    );
                }
            }
        }

        let (talents, assets): (Vec<_>, Vec<_>) = self
            .assets
            .into_iter()
            .partition(|a| a.kind.eq_ignore_ascii_case("talent"));

        let mut determination = Track::determination();
        determination.max = self.max_determination;
        determination.current = self.determination.min(self.max_determination);

        let created_at = self.created_at.unwrap_or(now);
        CharacterRecord {
            schema_version: SCHEMA_VERSION,
            id: self.id,
            user_id: self.user_id,
            guild_id: self.guild_id,
            name: self.name,
            concepts: self.concepts.map(LegacyConcepts::into_list).unwrap_or_default(),
            archetypes: Vec::new(),
            house: self.house,
            homeworld: self.homeworld,
            skills,
            focuses,
            drives,
            talents: talents.into_iter().map(|t| t.name).collect(),
            assets: assets.into_iter().map(|a| a.name).collect(),
            traits: self.traits.into_iter().map(|t| t.name).collect(),
            determination,
            active: self.is_active,
            created_at,
            last_updated: self.last_updated.unwrap_or(created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap()
    }

    fn read(json: &str) -> TableResult<StoredCharacter> {
        StoredCharacter::from_value(0, serde_json::from_str(json).unwrap())
    }

    fn parse(json: &str) -> StoredCharacter {
        read(json).unwrap()
    }

    const LEGACY: &str = r#"{
        "id": "char_1",
        "userId": "u1",
        "guildId": "g1",
        "name": "Duncan",
        "concepts": "Swordmaster",
        "house": "Atreides",
        "attributes": { "muscle": 8, "move": 8 },
        "skills": [
            { "name": "Battle", "value": 9, "focus": ["Swords"] },
            { "name": "Move", "value": 7 },
            { "name": "Pilot", "value": 3 }
        ],
        "drives": [
            { "name": "Duty", "value": 8, "statement": "The Duke above all" },
            { "name": "Truth", "value": 4, "statement": "" }
        ],
        "assets": [
            { "name": "Crysknife", "type": "equipment", "description": "" },
            { "name": "Master-at-Arms", "type": "talent", "description": "" }
        ],
        "traits": [{ "name": "Loyal", "type": "background", "description": "" }],
        "determination": 2,
        "maxDetermination": 3,
        "createdAt": "2025-07-11T10:00:00.000Z",
        "lastUpdated": "2025-07-12T10:00:00.000Z",
        "isActive": true
    }"#;

    #[test]
    fn string_concept_becomes_list() {
        let stored = parse(LEGACY);
        assert!(stored.is_legacy());
        let record = stored.migrate(now()).unwrap();
        assert_eq!(record.schema_version, SCHEMA_VERSION);
        assert_eq!(record.concepts, vec!["Swordmaster".to_string()]);
    }

    #[test]
    fn legacy_lists_become_maps() {
        let record = parse(LEGACY).migrate(now()).unwrap();
        assert_eq!(record.skills[&Skill::Battle], 9);
        assert_eq!(record.skills[&Skill::Move], 7);
        assert_eq!(record.skills.len(), 2);
        assert_eq!(record.focuses[&Skill::Battle], vec!["Swords".to_string()]);
        assert_eq!(
            record.drives[&Drive::Duty].statement.as_deref(),
            Some("The Duke above all")
        );
        assert_eq!(record.drives[&Drive::Truth].statement, None);
    }

    #[test]
    fn talents_split_from_assets() {
        let record = parse(LEGACY).migrate(now()).unwrap();
        assert_eq!(record.talents, vec!["Master-at-Arms".to_string()]);
        assert_eq!(record.assets, vec!["Crysknife".to_string()]);
        assert_eq!(record.traits, vec!["Loyal".to_string()]);
    }

    #[test]
    fn determination_becomes_track() {
        let record = parse(LEGACY).migrate(now()).unwrap();
        assert_eq!(record.determination.current, 2);
        assert_eq!(record.determination.max, 3);
    }

    #[test]
    fn timestamps_kept() {
        let record = parse(LEGACY).migrate(now()).unwrap();
        assert_eq!(
            record.created_at,
            Utc.with_ymd_and_hms(2025, 7, 11, 10, 0, 0).unwrap()
        );
        assert_ne!(record.last_updated, record.created_at);
    }

    #[test]
    fn list_and_missing_concepts() {
        let list = r#"{"id":"a","userId":"u","guildId":"g","name":"A","concepts":["Spy","Noble"]}"#;
        let record = parse(list).migrate(now()).unwrap();
        assert_eq!(record.concepts.len(), 2);

        let none = r#"{"id":"b","userId":"u","guildId":"g","name":"B"}"#;
        let record = parse(none).migrate(now()).unwrap();
        assert!(record.concepts.is_empty());
        assert_eq!(record.created_at, now());
        assert_eq!(record.determination.current, 3);
    }

    #[test]
    fn current_record_passes_through() {
        let record = parse(LEGACY).migrate(now()).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        let stored = parse(&json);
        assert!(!stored.is_legacy());
        assert_eq!(stored.migrate(now()).unwrap(), record);
    }

    #[test]
    fn future_schema_is_rejected() {
        let mut record = parse(LEGACY).migrate(now()).unwrap();
        record.schema_version = SCHEMA_VERSION + 1;
        let json = serde_json::to_string(&record).unwrap();
        let err = read(&json).unwrap_err();
        assert!(matches!(err, TableError::UnsupportedSchema(3)));
    }

    #[test]
    fn malformed_record_names_itself() {
        let err = StoredCharacter::from_value(
            4,
            serde_json::json!({ "id": "c9", "userId": "u1", "name": "No Guild" }),
        )
        .unwrap_err();
        match &err {
            TableError::MalformedRecord { index, id, .. } => {
                assert_eq!(*index, 4);
                assert_eq!(id, "c9");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("guildId"));
    }

    #[test]
    fn bad_schema_version_is_malformed() {
        let err = read(r#"{"schemaVersion":"two","id":"c1"}"#).unwrap_err();
        assert!(matches!(err, TableError::MalformedRecord { index: 0, .. }));
    }

    #[test]
    fn current_record_missing_fields_is_not_read_as_legacy() {
        let err = read(r#"{"schemaVersion":2,"id":"c1","userId":"u","guildId":"g","name":"A"}"#)
            .unwrap_err();
        assert!(matches!(err, TableError::MalformedRecord { .. }));
    }
}
