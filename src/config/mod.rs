use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::tui::theme::ThemeConfig;

/// Which document store holds the task collection.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    #[default]
    Sqlite,
    Firestore,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub backend: Backend,

    /// Default log filter when `RUST_LOG` is unset. Default: "info"
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub firestore: FirestoreConfig,

    #[serde(default)]
    pub theme: ThemeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            backend: Backend::default(),
            log_level: default_log_level(),
            firestore: FirestoreConfig::default(),
            theme: ThemeConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct FirestoreConfig {
    /// Firebase project id (required for the firestore backend).
    #[serde(default)]
    pub project_id: String,

    /// Web API key, appended as `key=` when non-empty.
    #[serde(default)]
    pub api_key: String,

    /// Collection holding task documents. Default: "tasks"
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Per-request timeout in seconds. Default: 15
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FirestoreConfig {
    fn default() -> Self {
        FirestoreConfig {
            project_id: String::new(),
            api_key: String::new(),
            collection: default_collection(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_collection() -> String {
    "tasks".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

const DEFAULT_CONFIG: &str = r#"# taskpad configuration

# Where tasks live: "sqlite" (local database file) or "firestore".
backend = "sqlite"

# Log filter for ~/.taskpad/taskpad.log (RUST_LOG takes precedence).
log_level = "info"

[firestore]
project_id = ""
api_key = ""
collection = "tasks"
timeout_secs = 15

# [theme]
# accent = "cyan"
# done = "green"
# error = "red"
"#;

/// Returns the base taskpad directory: ~/.taskpad/
pub fn base_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("could not determine home directory")?;
    Ok(home.join(".taskpad"))
}

/// Returns the path to the `SQLite` database
pub fn db_path() -> Result<PathBuf> {
    Ok(base_dir()?.join("taskpad.db"))
}

/// Returns the path to the log file
pub fn log_path() -> Result<PathBuf> {
    Ok(base_dir()?.join("taskpad.log"))
}

/// Returns the path to config.toml
pub fn config_path() -> Result<PathBuf> {
    Ok(base_dir()?.join("config.toml"))
}

/// Ensure the base directory exists
pub fn ensure_dirs() -> Result<()> {
    let base = base_dir()?;
    fs::create_dir_all(&base).context("failed to create ~/.taskpad/")?;
    Ok(())
}

/// Write a commented default config unless one already exists.
/// Returns `true` when a file was written.
pub fn write_default(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(true)
}

/// Load config from ~/.taskpad/config.toml (or return defaults if it doesn't exist)
pub fn load() -> Result<Config> {
    load_from(&config_path()?)
}

pub fn load_from(path: &Path) -> Result<Config> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config =
            toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    } else {
        Ok(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg.backend, Backend::Sqlite);
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.firestore.collection, "tasks");
        assert_eq!(cfg.firestore.timeout_secs, 15);
    }

    #[test]
    fn parses_firestore_backend() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "backend = \"firestore\"\n[firestore]\nproject_id = \"demo\"\napi_key = \"k\"\n",
        )
        .unwrap();
        let cfg = load_from(&path).unwrap();
        assert_eq!(cfg.backend, Backend::Firestore);
        assert_eq!(cfg.firestore.project_id, "demo");
        assert_eq!(cfg.firestore.api_key, "k");
        assert_eq!(cfg.firestore.collection, "tasks");
    }

    #[test]
    fn default_config_file_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert!(write_default(&path).unwrap());
        assert!(!write_default(&path).unwrap());
        let cfg = load_from(&path).unwrap();
        assert_eq!(cfg.backend, Backend::Sqlite);
    }

    #[test]
    fn unknown_backend_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "backend = \"mongo\"\n").unwrap();
        assert!(load_from(&path).is_err());
    }
}
