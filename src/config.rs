//! Persisted configuration: the API key and the model identifier.
//!
//! The record lives in a small JSON file (`~/.incanto/config.json` by
//! default). Loading never fails outward: a missing file yields the
//! defaults and a malformed one yields the defaults plus a diagnostic.

use anyhow::{Context, Result, anyhow};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Model used when none has been configured.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "INCANTO_CONFIG_PATH";

const API_KEY_MASK: &str = "********";

/// Effective configuration for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub api_key: String,
    pub model: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

/// On-disk shape. Every field is optional so a partial file still loads.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedConfig {
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default)]
    model: Option<String>,
}

impl PersistedConfig {
    fn into_config(self) -> Config {
        let defaults = Config::default();
        Config {
            api_key: self.api_key.unwrap_or(defaults.api_key),
            model: self
                .model
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(defaults.model),
        }
    }
}

impl Config {
    /// Returns the API key, or `None` when it has not been set.
    pub fn api_key(&self) -> Option<&str> {
        let key = self.api_key.trim();
        if key.is_empty() { None } else { Some(key) }
    }

    /// API key as shown to the operator: a fixed mask plus the last four characters.
    pub fn redacted_api_key(&self) -> String {
        match self.api_key() {
            None => "(not set)".to_string(),
            Some(key) => {
                let chars: Vec<char> = key.chars().collect();
                let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
                format!("{}{}", API_KEY_MASK, tail)
            }
        }
    }
}

/// Reads and writes the configuration record at a fixed path.
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the per-user default location, honoring `INCANTO_CONFIG_PATH`.
    pub fn from_default_location() -> Result<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    pub fn default_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            if !path.trim().is_empty() {
                return Ok(PathBuf::from(path));
            }
        }
        let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
        Ok(home.join(".incanto").join("config.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the configuration, falling back to defaults on any problem.
    pub fn load(&self) -> Config {
        match self.try_load() {
            Ok(Some(config)) => config,
            Ok(None) => {
                debug!("No config file at {}, using defaults", self.path.display());
                Config::default()
            }
            Err(e) => {
                debug!("Failed to read config from {}: {:#}", self.path.display(), e);
                eprintln!(
                    "{} {:#}",
                    "⚠️  Could not read configuration, using defaults:".yellow(),
                    e
                );
                Config::default()
            }
        }
    }

    fn try_load(&self) -> Result<Option<Config>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        let persisted: PersistedConfig = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        info!("Loaded config from: {}", self.path.display());
        Ok(Some(persisted.into_config()))
    }

    /// Writes the whole record, replacing the file in one rename.
    pub fn save(&self, config: &Config) -> Result<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)
            .with_context(|| format!("creating {}", parent.display()))?;

        let content = serde_json::to_string_pretty(config)?;
        let mut file = NamedTempFile::new_in(&parent)?;
        file.write_all(content.as_bytes())?;
        file.flush()?;
        file.persist(&self.path)
            .map_err(|e| anyhow!("writing {}: {}", self.path.display(), e.error))?;

        info!("Saved config to: {}", self.path.display());
        Ok(())
    }

    /// Loads, sets the API key, and saves.
    pub fn set_api_key(&self, api_key: &str) -> Result<()> {
        let mut config = self.load();
        config.api_key = api_key.trim().to_string();
        self.save(&config)
    }

    /// Loads, sets the model, and saves.
    pub fn set_model(&self, model: &str) -> Result<()> {
        let model = model.trim();
        if model.is_empty() {
            return Err(anyhow!("Model name cannot be empty"));
        }
        let mut config = self.load();
        config.model = model.to_string();
        self.save(&config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> ConfigStore {
        ConfigStore::new(dir.path().join("nested").join("config.json"))
    }

    #[test]
    fn test_load_without_file_returns_defaults() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let config = store.load();

        assert_eq!(config, Config { api_key: String::new(), model: "gpt-4o-mini".to_string() });
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let config = Config { api_key: "sk-test-1234".to_string(), model: "gpt-4o".to_string() };

        store.save(&config).unwrap();

        assert_eq!(store.load(), config);
    }

    #[test]
    fn test_save_then_load_roundtrip_with_empty_key() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let config = Config { api_key: String::new(), model: "o3-mini".to_string() };

        store.save(&config).unwrap();

        assert_eq!(store.load(), config);
    }

    #[test]
    fn test_saved_file_uses_camel_case_keys() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.save(&Config::default()).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"apiKey\""));
        assert!(raw.contains("\"model\""));
    }

    #[test]
    fn test_partial_file_falls_back_per_field() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "apiKey": "sk-abc" }"#).unwrap();

        let config = ConfigStore::new(&path).load();

        assert_eq!(config.api_key, "sk-abc");
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_empty_model_falls_back_to_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "apiKey": "", "model": "  " }"#).unwrap();

        let config = ConfigStore::new(&path).load();

        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_malformed_file_returns_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json at all").unwrap();

        let config = ConfigStore::new(&path).load();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_set_api_key_keeps_model() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.set_model("gpt-4.1").unwrap();

        store.set_api_key("sk-new-9876").unwrap();

        let config = store.load();
        assert_eq!(config.api_key, "sk-new-9876");
        assert_eq!(config.model, "gpt-4.1");
    }

    #[test]
    fn test_set_model_rejects_blank() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert!(store.set_model("   ").is_err());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_api_key_none_when_blank() {
        let config = Config { api_key: "   ".to_string(), model: DEFAULT_MODEL.to_string() };
        assert!(config.api_key().is_none());
    }

    #[test]
    fn test_redacted_api_key_shows_last_four() {
        let config = Config { api_key: "sk-proj-abcdef1234".to_string(), model: DEFAULT_MODEL.to_string() };
        assert_eq!(config.redacted_api_key(), "********1234");
    }

    #[test]
    fn test_redacted_api_key_short_key() {
        let config = Config { api_key: "ab".to_string(), model: DEFAULT_MODEL.to_string() };
        assert_eq!(config.redacted_api_key(), "********ab");
    }

    #[test]
    fn test_redacted_api_key_not_set() {
        assert_eq!(Config::default().redacted_api_key(), "(not set)");
    }
}
