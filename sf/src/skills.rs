//! Skills store: an ordered list of title/description pairs, persisted write-through

use eyre::{Context, Result};
use keystore::Storage;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Storage key for the serialized skill list
pub const SKILLS_KEY: &str = "skillsData";

/// One skill card's data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub title: String,
    pub description: String,
}

impl Skill {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Seed list used when nothing usable is stored
pub fn default_skills() -> Vec<Skill> {
    vec![
        Skill::new(
            "Rust",
            "Systems programming with ownership, lifetimes and fearless concurrency.",
        ),
        Skill::new(
            "Terminal UIs",
            "Immediate-mode interfaces drawn with ratatui on a crossterm backend.",
        ),
        Skill::new(
            "Testing",
            "Unit, property and command-line tests that pin behavior down.",
        ),
    ]
}

/// Parse a stored skill list, dropping records without both fields
///
/// Anything that is not a JSON array yields an empty list.
pub fn parse_skills(raw: &str) -> Vec<Skill> {
    let records = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(records)) => records,
        Ok(other) => {
            warn!(kind = value_kind(&other), "Stored skills are not an array, ignoring");
            return Vec::new();
        }
        Err(e) => {
            warn!(error = %e, "Failed to parse stored skills, ignoring");
            return Vec::new();
        }
    };

    records
        .iter()
        .filter_map(|record| {
            let title = non_empty_str(record.get("title"))?;
            let description = non_empty_str(record.get("description"))?;
            Some(Skill::new(title, description))
        })
        .collect()
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Result of an add attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Appended at this index
    Added(usize),
    /// Title or description was blank after trimming
    Blank,
}

/// In-memory skill list mirrored to storage
#[derive(Debug, Clone, Default)]
pub struct SkillsStore {
    skills: Vec<Skill>,
}

impl SkillsStore {
    /// Load from storage, seeding (and saving) the defaults when nothing usable is stored
    pub fn load(storage: &mut dyn Storage) -> Result<Self> {
        debug!("SkillsStore::load: called");
        let raw = storage.get(SKILLS_KEY).context("Failed to read stored skills")?;
        let skills = raw.as_deref().map(parse_skills).unwrap_or_default();

        if skills.is_empty() {
            info!("No stored skills, seeding defaults");
            let store = Self {
                skills: default_skills(),
            };
            store.save(storage)?;
            return Ok(store);
        }

        debug!(count = skills.len(), "SkillsStore::load: loaded");
        Ok(Self { skills })
    }

    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Append a skill from raw user input and write through
    ///
    /// Both fields are trimmed; a blank field leaves list and storage untouched.
    pub fn add(&mut self, storage: &mut dyn Storage, title: &str, description: &str) -> Result<AddOutcome> {
        let (title, description) = (title.trim(), description.trim());
        if title.is_empty() || description.is_empty() {
            debug!("SkillsStore::add: blank input, ignoring");
            return Ok(AddOutcome::Blank);
        }

        self.skills.push(Skill::new(title, description));
        if let Err(e) = self.save(storage) {
            self.skills.pop();
            return Err(e);
        }

        info!(title, count = self.skills.len(), "Added skill");
        Ok(AddOutcome::Added(self.skills.len() - 1))
    }

    fn save(&self, storage: &mut dyn Storage) -> Result<()> {
        let raw = serde_json::to_string(&self.skills)?;
        storage.set(SKILLS_KEY, &raw).context("Failed to save skills")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keystore::MemoryStore;

    /// Storage that serves its inner entries but refuses every write
    struct ReadOnlyStore(MemoryStore);

    impl Storage for ReadOnlyStore {
        fn get(&self, key: &str) -> keystore::StoreResult<Option<String>> {
            self.0.get(key)
        }

        fn set(&mut self, _key: &str, _value: &str) -> keystore::StoreResult<()> {
            Err(keystore::StoreError::Io {
                path: "store.json".into(),
                source: std::io::Error::other("read-only"),
            })
        }

        fn remove(&mut self, key: &str) -> keystore::StoreResult<()> {
            self.set(key, "")
        }

        fn keys(&self) -> keystore::StoreResult<Vec<String>> {
            self.0.keys()
        }
    }

    fn stored(store: &MemoryStore) -> Vec<Skill> {
        serde_json::from_str(&store.get(SKILLS_KEY).unwrap().unwrap()).unwrap()
    }

    #[test]
    fn test_failed_save_rolls_back_add() {
        let mut seeded = MemoryStore::new();
        let mut store = SkillsStore::load(&mut seeded).unwrap();
        let mut storage = ReadOnlyStore(seeded);

        assert!(store.add(&mut storage, "Go", "Goroutines").is_err());
        assert_eq!(store.skills(), default_skills().as_slice());
        assert_eq!(stored(&storage.0), default_skills());
    }

    #[test]
    fn test_empty_storage_seeds_and_saves_defaults() {
        let mut storage = MemoryStore::new();
        let store = SkillsStore::load(&mut storage).unwrap();

        assert_eq!(store.skills(), default_skills().as_slice());
        assert_eq!(store.len(), 3);
        assert_eq!(stored(&storage), default_skills());
    }

    #[test]
    fn test_reload_keeps_valid_records_in_order() {
        let raw = r#"[
            {"title": "A", "description": "first"},
            {"title": "", "description": "blank title"},
            {"title": "B"},
            {"description": "no title"},
            {"title": 3, "description": "numeric title"},
            "not a record",
            {"title": "C", "description": "third", "extra": true}
        ]"#;
        let mut storage = MemoryStore::with_entries([(SKILLS_KEY, raw)]);
        let store = SkillsStore::load(&mut storage).unwrap();

        assert_eq!(
            store.skills(),
            &[Skill::new("A", "first"), Skill::new("C", "third")]
        );
        // Valid data is not rewritten on load
        assert_eq!(storage.writes(), 0);
    }

    #[test]
    fn test_malformed_data_falls_back_to_defaults() {
        for raw in ["{not json", r#"{"title": "A"}"#, "42", "[]"] {
            let mut storage = MemoryStore::with_entries([(SKILLS_KEY, raw)]);
            let store = SkillsStore::load(&mut storage).unwrap();
            assert_eq!(store.skills(), default_skills().as_slice(), "input: {raw}");
            assert_eq!(stored(&storage), default_skills());
        }
    }

    #[test]
    fn test_add_trims_and_writes_through() {
        let mut storage = MemoryStore::new();
        let mut store = SkillsStore::load(&mut storage).unwrap();

        let outcome = store.add(&mut storage, "  A  ", "  B  ").unwrap();
        assert_eq!(outcome, AddOutcome::Added(3));
        assert_eq!(store.skills().last(), Some(&Skill::new("A", "B")));
        assert_eq!(stored(&storage), store.skills());
    }

    #[test]
    fn test_add_blank_changes_nothing() {
        let mut storage = MemoryStore::new();
        let mut store = SkillsStore::load(&mut storage).unwrap();
        let writes = storage.writes();

        for (title, description) in [("", "desc"), ("   ", "desc"), ("title", ""), ("title", " \t ")] {
            assert_eq!(store.add(&mut storage, title, description).unwrap(), AddOutcome::Blank);
        }
        assert_eq!(store.len(), 3);
        assert_eq!(storage.writes(), writes);
    }

    #[test]
    fn test_parse_skills_round_trips_saved_output() {
        let skills = vec![Skill::new("X", "y")];
        let raw = serde_json::to_string(&skills).unwrap();
        assert_eq!(parse_skills(&raw), skills);
    }
}
