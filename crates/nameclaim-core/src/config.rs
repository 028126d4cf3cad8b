//! Configuration management for nameclaim.
//!
//! Loads configuration from ${NAMECLAIM_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for nameclaim configuration and data.
    //!
    //! NAMECLAIM_HOME resolution order:
    //! 1. NAMECLAIM_HOME environment variable (if set)
    //! 2. ~/.config/nameclaim (default)

    use std::path::PathBuf;

    /// Returns the nameclaim home directory.
    pub fn home() -> PathBuf {
        if let Ok(home) = std::env::var("NAMECLAIM_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".nameclaim"),
            |h| h.join(".config").join("nameclaim"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        home().join("config.toml")
    }

    /// Returns the path of the persisted sign-in state.
    pub fn identity_state_path() -> PathBuf {
        home().join("identity.json")
    }

    /// Returns the directory receiving log files.
    pub fn logs_dir() -> PathBuf {
        home().join("logs")
    }
}

/// Local profile used by the identity provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Fixed user id (generated and remembered when unset).
    pub id: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// Document store location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Store file, relative to NAMECLAIM_HOME unless absolute.
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "store.json".to_string(),
        }
    }
}

/// Username form behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Quiet period before an availability lookup, in milliseconds.
    pub debounce_ms: u64,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            debounce_ms: Config::DEFAULT_DEBOUNCE_MS,
        }
    }
}

/// Presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Notification lifetime in seconds (0 = until dismissed).
    pub toast_secs: u64,
    /// Render the "Username valid" debug line.
    pub show_debug_state: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            toast_secs: Config::DEFAULT_TOAST_SECS,
            show_debug_state: false,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing` filter directive (e.g. "info", "nameclaim_core=debug").
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub identity: IdentityConfig,
    pub store: StoreConfig,
    pub form: FormConfig,
    pub ui: UiConfig,
    pub log: LogConfig,
}

impl Config {
    const DEFAULT_DEBOUNCE_MS: u64 = 500;
    const DEFAULT_TOAST_SECS: u64 = 5;

    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Creates a default config file at the given path.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(path, default_config_template())
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    /// Debounce window for availability lookups.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.form.debounce_ms)
    }

    /// Notification lifetime, `None` when toasts stay until dismissed.
    pub fn toast_lifetime(&self) -> Option<Duration> {
        (self.ui.toast_secs > 0).then(|| Duration::from_secs(self.ui.toast_secs))
    }

    /// Resolved store file path.
    pub fn store_path(&self) -> PathBuf {
        let path = PathBuf::from(&self.store.path);
        if path.is_absolute() {
            path
        } else {
            paths::home().join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nonexistent.toml")).unwrap();

        assert_eq!(config.debounce(), Duration::from_millis(500));
        assert_eq!(config.toast_lifetime(), Some(Duration::from_secs(5)));
        assert!(config.identity.display_name.is_none());
        assert!(!config.ui.show_debug_state);
    }

    #[test]
    fn test_load_partial_config_merges_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(
            &config_path,
            "[identity]\ndisplay_name = \"Ada\"\n\n[ui]\ntoast_secs = 0\n",
        )
        .unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.identity.display_name.as_deref(), Some("Ada"));
        assert_eq!(config.toast_lifetime(), None);
        assert_eq!(config.form.debounce_ms, 500);
        assert_eq!(config.store.path, "store.json");
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "[form\n").unwrap();

        let err = Config::load_from(&config_path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config"));
    }

    #[test]
    fn test_init_writes_template_that_parses_to_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subdir").join("config.toml");

        Config::init(&config_path).unwrap();
        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.form.debounce_ms, 500);
        assert_eq!(config.log.level, "info");

        assert!(Config::init(&config_path).is_err());
    }

    #[test]
    fn test_absolute_store_path_is_kept() {
        let dir = tempdir().unwrap();
        let absolute = dir.path().join("docs.json");
        let config = Config {
            store: StoreConfig {
                path: absolute.to_string_lossy().to_string(),
            },
            ..Config::default()
        };
        assert_eq!(config.store_path(), absolute);
    }
}
