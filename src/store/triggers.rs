use super::{load_or_init, save_atomic, StoreError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

pub const TRIGGERS_FILE: &str = "triggers.json";

/// A stored auto-response. The trigger name is the key in its guild's table;
/// names are unique case-insensitively and keep the creator's casing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TriggerRecord {
    pub response: String,
    pub creator_id: u64,
    pub created_at: DateTime<Utc>,
}

type GuildTable = BTreeMap<String, TriggerRecord>;
type TriggerTable = BTreeMap<String, GuildTable>;

/// Per-guild trigger table backed by `data/triggers.json`. The in-memory map
/// is authoritative; every mutation rewrites the whole file before reporting
/// success. The mutex is held across the load-modify-store cycle so
/// concurrent mutations serialize instead of losing updates.
#[derive(Clone)]
pub struct TriggerStore {
    path: PathBuf,
    guilds: Arc<Mutex<TriggerTable>>,
}

impl TriggerStore {
    pub fn open(data_dir: &Path) -> Result<Self, StoreError> {
        let path = data_dir.join(TRIGGERS_FILE);
        let guilds = load_or_init(&path)?;
        Ok(Self {
            path,
            guilds: Arc::new(Mutex::new(guilds)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self, guild_id: u64, name: &str) -> bool {
        let guilds = self.guilds.lock().unwrap();
        guilds
            .get(&guild_id.to_string())
            .and_then(|table| find_key(table, name))
            .is_some()
    }

    /// Insert a trigger. Returns `Ok(false)` without mutating when any case
    /// variant of the name is already present in the guild.
    pub fn add(&self, guild_id: u64, name: &str, record: TriggerRecord) -> Result<bool, StoreError> {
        let key = guild_id.to_string();
        let mut guilds = self.guilds.lock().unwrap();
        let table = guilds.entry(key.clone()).or_default();
        if find_key(table, name).is_some() {
            return Ok(false);
        }
        table.insert(name.to_string(), record);

        if let Err(e) = save_atomic(&self.path, &*guilds) {
            // Memory and disk must stay in step.
            if let Some(table) = guilds.get_mut(&key) {
                table.remove(name);
            }
            return Err(e);
        }
        debug!("Added trigger '{name}' for guild {guild_id}");
        Ok(true)
    }

    pub fn get(&self, guild_id: u64, name: &str) -> Option<TriggerRecord> {
        let guilds = self.guilds.lock().unwrap();
        let table = guilds.get(&guild_id.to_string())?;
        let key = find_key(table, name)?;
        table.get(&key).cloned()
    }

    /// Remove a trigger. Returns `Ok(false)` when no case variant of the name
    /// is present.
    pub fn delete(&self, guild_id: u64, name: &str) -> Result<bool, StoreError> {
        let key = guild_id.to_string();
        let mut guilds = self.guilds.lock().unwrap();
        let Some(table) = guilds.get_mut(&key) else {
            return Ok(false);
        };
        let Some(stored_key) = find_key(table, name) else {
            return Ok(false);
        };
        let Some(record) = table.remove(&stored_key) else {
            return Ok(false);
        };

        if let Err(e) = save_atomic(&self.path, &*guilds) {
            if let Some(table) = guilds.get_mut(&key) {
                table.insert(stored_key, record);
            }
            return Err(e);
        }
        info!("Deleted trigger '{name}' for guild {guild_id}");
        Ok(true)
    }

    /// All triggers for a guild in deterministic (sorted-name) order.
    pub fn list(&self, guild_id: u64) -> Vec<(String, TriggerRecord)> {
        let guilds = self.guilds.lock().unwrap();
        guilds
            .get(&guild_id.to_string())
            .map(|table| {
                table
                    .iter()
                    .map(|(name, record)| (name.clone(), record.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn count(&self, guild_id: u64) -> usize {
        let guilds = self.guilds.lock().unwrap();
        guilds
            .get(&guild_id.to_string())
            .map(|table| table.len())
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        let guilds = self.guilds.lock().unwrap();
        guilds.values().map(|table| table.len()).sum()
    }

    pub fn guild_count(&self) -> usize {
        self.guilds.lock().unwrap().len()
    }

    /// First trigger in the guild whose lowercased name is a substring of the
    /// lowercased message text. Iteration follows the table's sorted-name
    /// order, so overlapping names resolve the same way every time.
    pub fn find_match(&self, guild_id: u64, content: &str) -> Option<(String, TriggerRecord)> {
        let haystack = content.to_lowercase();
        let guilds = self.guilds.lock().unwrap();
        let table = guilds.get(&guild_id.to_string())?;
        table
            .iter()
            .find(|(name, _)| haystack.contains(&name.to_lowercase()))
            .map(|(name, record)| (name.clone(), record.clone()))
    }

    /// Replace the in-memory table with the file's current contents.
    pub fn reload(&self) -> Result<(), StoreError> {
        let fresh: TriggerTable = load_or_init(&self.path)?;
        *self.guilds.lock().unwrap() = fresh;
        Ok(())
    }
}

/// Case-insensitive key lookup, preferring an exact match.
fn find_key(table: &GuildTable, name: &str) -> Option<String> {
    if table.contains_key(name) {
        return Some(name.to_string());
    }
    let lower = name.to_lowercase();
    table.keys().find(|key| key.to_lowercase() == lower).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const GUILD: u64 = 123;

    fn record(response: &str) -> TriggerRecord {
        TriggerRecord {
            response: response.to_string(),
            creator_id: 1,
            created_at: Utc::now(),
        }
    }

    fn open_store(dir: &tempfile::TempDir) -> TriggerStore {
        TriggerStore::open(dir.path()).unwrap()
    }

    #[test]
    fn add_then_get_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);

        let rec = record("hello");
        assert!(store.add(GUILD, "gm", rec.clone()).unwrap());
        assert_eq!(store.get(GUILD, "gm"), Some(rec.clone()));
        // Lookup is case-insensitive, stored casing is preserved.
        assert_eq!(store.get(GUILD, "GM"), Some(rec));
        assert_eq!(store.list(GUILD)[0].0, "gm");
    }

    #[test]
    fn duplicate_add_fails_for_any_case_variant() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);

        assert!(store.add(GUILD, "Hello", record("first")).unwrap());
        assert!(!store.add(GUILD, "hello", record("second")).unwrap());
        assert!(!store.add(GUILD, "HELLO", record("third")).unwrap());

        // Store unchanged by the failed inserts.
        assert_eq!(store.count(GUILD), 1);
        assert_eq!(store.get(GUILD, "hello").unwrap().response, "first");
    }

    #[test]
    fn delete_then_exists_is_false() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);

        store.add(GUILD, "bye", record("cya")).unwrap();
        assert!(store.exists(GUILD, "bye"));
        assert!(store.delete(GUILD, "BYE").unwrap());
        assert!(!store.exists(GUILD, "bye"));
    }

    #[test]
    fn delete_absent_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);

        assert!(!store.delete(GUILD, "nope").unwrap());
    }

    #[test]
    fn file_roundtrip_yields_identical_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);

        store.add(GUILD, "gm", record("hello")).unwrap();
        store.add(GUILD, "gn", record("bye")).unwrap();
        store.add(456, "gm", record("other guild")).unwrap();

        let reopened = open_store(&dir);
        assert_eq!(store.list(GUILD), reopened.list(GUILD));
        assert_eq!(store.list(456), reopened.list(456));
        assert_eq!(reopened.total(), 3);
    }

    #[test]
    fn corrupt_file_recovers_to_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TRIGGERS_FILE);
        fs::write(&path, "{not json").unwrap();

        let store = open_store(&dir);
        assert_eq!(store.total(), 0);
        // The empty table was re-persisted over the corrupt file.
        let raw = fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, serde_json::json!({}));
    }

    #[test]
    fn triggers_are_guild_scoped() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);

        store.add(GUILD, "gm", record("hello")).unwrap();
        assert!(store.get(456, "gm").is_none());
        assert!(store.find_match(456, "gm everyone").is_none());
    }

    #[test]
    fn match_is_substring_and_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        store.add(GUILD, "gm", record("hello")).unwrap();

        let (name, rec) = store.find_match(GUILD, "good gm morning").unwrap();
        assert_eq!(name, "gm");
        assert_eq!(rec.response, "hello");
        assert!(store.find_match(GUILD, "DoGMa").is_some()); // "gm" inside a word
        assert!(store.find_match(GUILD, "good morning").is_none());
    }

    #[test]
    fn overlapping_names_match_exactly_once_deterministically() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        store.add(GUILD, "cats", record("meows")).unwrap();
        store.add(GUILD, "cat", record("meow")).unwrap();

        // Sorted-name iteration: "cat" is evaluated before "cats", every run.
        let (name, _) = store.find_match(GUILD, "I like cats").unwrap();
        assert_eq!(name, "cat");
        let again = store.find_match(GUILD, "I like cats").unwrap();
        assert_eq!(again.0, "cat");
    }

    #[test]
    fn reload_picks_up_external_edits() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        store.add(GUILD, "gm", record("hello")).unwrap();

        // Another process rewrote the file.
        let other = open_store(&dir);
        other.add(GUILD, "gn", record("bye")).unwrap();

        store.reload().unwrap();
        assert_eq!(store.count(GUILD), 2);
    }
}
