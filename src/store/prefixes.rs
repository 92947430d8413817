use super::{load_or_init, save_atomic, StoreError, MAX_PREFIX_LEN};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::info;

pub const PREFIXES_FILE: &str = "prefixes.json";

type PrefixTable = BTreeMap<String, String>;

/// Guild → command-prefix table backed by `data/prefixes.json`, with the same
/// whole-file rewrite discipline as the trigger store.
#[derive(Clone)]
pub struct PrefixStore {
    path: PathBuf,
    prefixes: Arc<Mutex<PrefixTable>>,
}

impl PrefixStore {
    pub fn open(data_dir: &Path) -> Result<Self, StoreError> {
        let path = data_dir.join(PREFIXES_FILE);
        let prefixes = load_or_init(&path)?;
        Ok(Self {
            path,
            prefixes: Arc::new(Mutex::new(prefixes)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The guild's prefix, or `default` when none is stored.
    pub fn get(&self, guild_id: u64, default: &str) -> String {
        let prefixes = self.prefixes.lock().unwrap();
        prefixes
            .get(&guild_id.to_string())
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    /// Set the guild's prefix. Prefixes longer than [`MAX_PREFIX_LEN`]
    /// characters are rejected and the prior value stays in place.
    pub fn set(&self, guild_id: u64, prefix: &str) -> Result<(), StoreError> {
        if prefix.chars().count() > MAX_PREFIX_LEN {
            return Err(StoreError::PrefixTooLong);
        }
        let key = guild_id.to_string();
        let mut prefixes = self.prefixes.lock().unwrap();
        let previous = prefixes.insert(key.clone(), prefix.to_string());

        if let Err(e) = save_atomic(&self.path, &*prefixes) {
            match previous {
                Some(prior) => {
                    prefixes.insert(key, prior);
                }
                None => {
                    prefixes.remove(&key);
                }
            }
            return Err(e);
        }
        info!("Prefix for guild {guild_id} set to '{prefix}'");
        Ok(())
    }

    /// Remove the guild's prefix entry, e.g. when the bot leaves the guild.
    pub fn delete(&self, guild_id: u64) -> Result<bool, StoreError> {
        let key = guild_id.to_string();
        let mut prefixes = self.prefixes.lock().unwrap();
        let Some(previous) = prefixes.remove(&key) else {
            return Ok(false);
        };

        if let Err(e) = save_atomic(&self.path, &*prefixes) {
            prefixes.insert(key, previous);
            return Err(e);
        }
        info!("Prefix for guild {guild_id} removed");
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.prefixes.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace the in-memory table with the file's current contents.
    pub fn reload(&self) -> Result<(), StoreError> {
        let fresh: PrefixTable = load_or_init(&self.path)?;
        *self.prefixes.lock().unwrap() = fresh;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const GUILD: u64 = 123;

    fn open_store(dir: &tempfile::TempDir) -> PrefixStore {
        PrefixStore::open(dir.path()).unwrap()
    }

    #[test]
    fn unset_guild_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);

        assert_eq!(store.get(GUILD, "!"), "!");
        store.set(GUILD, "?").unwrap();
        assert_eq!(store.get(GUILD, "!"), "?");
    }

    #[test]
    fn overlong_prefix_is_rejected_keeping_prior_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);

        store.set(GUILD, "?").unwrap();
        let result = store.set(GUILD, "toolong");
        assert!(matches!(result, Err(StoreError::PrefixTooLong)));
        assert_eq!(store.get(GUILD, "!"), "?");
    }

    #[test]
    fn five_characters_is_the_limit() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);

        store.set(GUILD, "abcde").unwrap();
        assert!(store.set(GUILD, "abcdef").is_err());
        // Multi-byte characters count as characters, not bytes.
        store.set(GUILD, "héllo").unwrap();
        assert_eq!(store.get(GUILD, "!"), "héllo");
    }

    #[test]
    fn delete_removes_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);

        store.set(GUILD, "?").unwrap();
        assert!(store.delete(GUILD).unwrap());
        assert!(!store.delete(GUILD).unwrap());
        assert_eq!(store.get(GUILD, "!"), "!");
    }

    #[test]
    fn file_roundtrip_yields_identical_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);

        store.set(GUILD, "?").unwrap();
        store.set(456, "$").unwrap();

        let reopened = open_store(&dir);
        assert_eq!(reopened.get(GUILD, "!"), "?");
        assert_eq!(reopened.get(456, "!"), "$");
        assert_eq!(reopened.len(), 2);
    }

    #[test]
    fn corrupt_file_recovers_to_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(PREFIXES_FILE), "[1, 2").unwrap();

        let store = open_store(&dir);
        assert!(store.is_empty());
        assert_eq!(store.get(GUILD, "!"), "!");
    }
}
