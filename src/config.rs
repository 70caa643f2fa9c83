//! Application-level configuration loading.

use std::{env, fs, io::ErrorKind, path::PathBuf, str::FromStr};

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "BINGO_BACK_CONFIG_PATH";
/// Largest board side accepted at creation unless configured otherwise.
const DEFAULT_MAX_BOARD_SIDE: u32 = 32;
/// Environment variable naming the board store backend.
const STORE_ENV: &str = "BINGO_STORE";

/// Board store backend selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    /// Process-local store; boards vanish on restart.
    #[default]
    Memory,
    /// CouchDB configured from `COUCH_*` variables.
    Couch,
    /// MongoDB configured from `MONGO_*` variables.
    Mongo,
}

/// `BINGO_STORE` named no known backend.
#[derive(Debug, Error)]
#[error("unknown board store `{0}` (expected memory, couch or mongo)")]
pub struct UnknownStoreBackend(String);

impl FromStr for StoreBackend {
    type Err = UnknownStoreBackend;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "couch" | "couchdb" => Ok(StoreBackend::Couch),
            "mongo" | "mongodb" => Ok(StoreBackend::Mongo),
            _ => Err(UnknownStoreBackend(value.to_owned())),
        }
    }
}

impl StoreBackend {
    /// Read the backend from `BINGO_STORE`, defaulting to [`StoreBackend::Memory`].
    pub fn from_env() -> Result<Self, UnknownStoreBackend> {
        match env::var(STORE_ENV) {
            Ok(value) if !value.trim().is_empty() => value.parse(),
            _ => Ok(StoreBackend::default()),
        }
    }
}

/// How concurrent toggles on the same tile are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleGuard {
    /// Toggles on one tile run one at a time; no update is lost.
    #[default]
    PerTile,
    /// Read and write are not serialized; the last write wins.
    #[serde(rename = "none")]
    Unguarded,
}

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    toggle_guard: ToggleGuard,
    max_board_side: u32,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        toggle_guard = ?app_config.toggle_guard,
                        max_board_side = app_config.max_board_side,
                        "loaded config"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Override the toggle guard, mostly useful in tests.
    pub fn with_toggle_guard(mut self, guard: ToggleGuard) -> Self {
        self.toggle_guard = guard;
        self
    }

    /// How concurrent toggles on one tile are ordered.
    pub fn toggle_guard(&self) -> ToggleGuard {
        self.toggle_guard
    }

    /// Largest width or height a new board may have.
    pub fn max_board_side(&self) -> u32 {
        self.max_board_side
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            toggle_guard: ToggleGuard::default(),
            max_board_side: DEFAULT_MAX_BOARD_SIDE,
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    toggle_guard: ToggleGuard,
    #[serde(default)]
    max_board_side: Option<u32>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        Self {
            toggle_guard: value.toggle_guard,
            max_board_side: value
                .max_board_side
                .filter(|side| *side > 0)
                .unwrap_or(DEFAULT_MAX_BOARD_SIDE),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_config_reads_toggle_guard() {
        let raw: RawConfig = serde_json::from_str(r#"{"toggle_guard": "none"}"#).unwrap();
        let config = AppConfig::from(raw);
        assert_eq!(config.toggle_guard(), ToggleGuard::Unguarded);
        assert_eq!(config.max_board_side(), DEFAULT_MAX_BOARD_SIDE);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let raw: RawConfig = serde_json::from_str("{}").unwrap();
        let config = AppConfig::from(raw);
        assert_eq!(config.toggle_guard(), ToggleGuard::PerTile);
    }

    #[test]
    fn store_backend_names_are_case_insensitive() {
        assert_eq!("Mongo".parse::<StoreBackend>().unwrap(), StoreBackend::Mongo);
        assert_eq!("couchdb".parse::<StoreBackend>().unwrap(), StoreBackend::Couch);
        assert_eq!(" memory ".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert!("mysql".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn zero_board_side_is_ignored() {
        let raw: RawConfig =
            serde_json::from_str(r#"{"toggle_guard": "per_tile", "max_board_side": 0}"#).unwrap();
        assert_eq!(AppConfig::from(raw).max_board_side(), DEFAULT_MAX_BOARD_SIDE);
    }
}
