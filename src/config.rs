use anyhow::Context as _;
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const CONFIG_FILE: &str = "config.json";

const TOKEN_PLACEHOLDER: &str = "YOUR_BOT_TOKEN_HERE";

const DEFAULT_CONFIG: &str = r#"{
  "token": "YOUR_BOT_TOKEN_HERE",
  "prefix": "!",
  "owner_id": 123456789
}
"#;

#[derive(Clone, Deserialize)]
pub struct Config {
    pub token: String,
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(rename = "owner_id", default)]
    owner_id: Option<OwnerId>,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

/// `owner_id` in config.json may be a single id or a list of ids.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
enum OwnerId {
    One(u64),
    Many(Vec<u64>),
}

fn default_prefix() -> String {
    "!".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenv().ok();
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Load the configuration file. When the file is missing a template is
    /// written in its place and startup is aborted so the operator can fill
    /// in the bot details.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            fs::write(path, DEFAULT_CONFIG)
                .with_context(|| format!("failed to write default {}", path.display()))?;
            anyhow::bail!(
                "created default {}; edit it with your bot details and restart",
                path.display()
            );
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mut config: Config = serde_json::from_str(&raw)
            .with_context(|| format!("{} is malformed", path.display()))?;

        if let Ok(token) = env::var("DISCORD_TOKEN") {
            config.token = token;
        }
        if config.token.is_empty() || config.token == TOKEN_PLACEHOLDER {
            anyhow::bail!(
                "no bot token configured; set it in {} or via DISCORD_TOKEN",
                path.display()
            );
        }
        if config.owner_ids().is_empty() {
            warn!("No valid owner_id found in config, owner commands will be unavailable");
        }

        Ok(config)
    }

    pub fn owner_ids(&self) -> Vec<u64> {
        match &self.owner_id {
            Some(OwnerId::One(id)) => vec![*id],
            Some(OwnerId::Many(ids)) => ids.clone(),
            None => Vec::new(),
        }
    }

    pub fn is_owner(&self, user_id: u64) -> bool {
        match &self.owner_id {
            Some(OwnerId::One(id)) => *id == user_id,
            Some(OwnerId::Many(ids)) => ids.contains(&user_id),
            None => false,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("token", &"[REDACTED]")
            .field("prefix", &self.prefix)
            .field("owner_id", &self.owner_id)
            .field("data_dir", &self.data_dir)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(dir: &Path, contents: &str) -> PathBuf {
        let path = dir.join("config.json");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn missing_file_writes_template_and_fails() {
        env::remove_var("DISCORD_TOKEN");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let result = Config::load_from(&path);
        assert!(result.is_err());
        // The template must exist now, but still fail to load: the operator
        // has to replace the placeholder token first.
        assert!(path.exists());
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn owner_id_accepts_single_integer() {
        env::remove_var("DISCORD_TOKEN");
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"{"token": "t0k3n", "prefix": "?", "owner_id": 42}"#,
        );

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.prefix, "?");
        assert_eq!(config.owner_ids(), vec![42]);
        assert!(config.is_owner(42));
        assert!(!config.is_owner(43));
    }

    #[test]
    fn owner_id_accepts_list() {
        env::remove_var("DISCORD_TOKEN");
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), r#"{"token": "t0k3n", "owner_id": [1, 2]}"#);

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.owner_ids(), vec![1, 2]);
        assert!(config.is_owner(2));
        assert_eq!(config.prefix, "!");
    }

    #[test]
    fn owner_id_may_be_absent() {
        env::remove_var("DISCORD_TOKEN");
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), r#"{"token": "t0k3n"}"#);

        let config = Config::load_from(&path).unwrap();
        assert!(config.owner_ids().is_empty());
        assert!(!config.is_owner(1));
    }

    #[test]
    fn debug_redacts_token() {
        env::remove_var("DISCORD_TOKEN");
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), r#"{"token": "super-secret"}"#);

        let config = Config::load_from(&path).unwrap();
        let debug_output = format!("{:?}", config);
        assert!(!debug_output.contains("super-secret"));
        assert!(debug_output.contains("[REDACTED]"));
    }
}
