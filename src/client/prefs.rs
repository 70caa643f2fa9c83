use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::claims::ClaimantCode;

use super::error::{ClientError, ClientResult};

/// Preferences file used when no override is set.
const DEFAULT_PREFS_PATH: &str = ".bingo-client.json";
/// Environment variable that overrides [`DEFAULT_PREFS_PATH`].
const PREFS_PATH_ENV: &str = "BINGO_CLIENT_PREFS";

/// Viewer choices that survive restarts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientPrefs {
    /// Board the viewer last opened.
    #[serde(default)]
    pub board_id: Option<Uuid>,
    /// Color code used for toggles.
    #[serde(default)]
    pub code: ClaimantCode,
}

impl ClientPrefs {
    /// Location of the preferences file, taking the environment override into account.
    pub fn path() -> PathBuf {
        env::var_os(PREFS_PATH_ENV)
            .map(PathBuf::from)
            .filter(|path| !path.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PREFS_PATH))
    }

    /// Read preferences from [`ClientPrefs::path`].
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// Read preferences from `path`; missing or unreadable files yield the defaults.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(prefs) => prefs,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "invalid client preferences; using defaults");
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "no client preferences yet; using defaults");
                Self::default()
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to read client preferences; using defaults");
                Self::default()
            }
        }
    }

    /// Write preferences to [`ClientPrefs::path`].
    pub fn save(&self) -> ClientResult<()> {
        self.save_to(&Self::path())
    }

    /// Write preferences to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> ClientResult<()> {
        let contents = serde_json::to_string_pretty(self).map_err(|source| ClientError::PrefsFormat {
            path: path.to_owned(),
            source,
        })?;
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ClientError::PrefsIo {
                path: parent.to_owned(),
                source,
            })?;
        }
        fs::write(path, contents).map_err(|source| ClientError::PrefsIo {
            path: path.to_owned(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path() -> PathBuf {
        env::temp_dir()
            .join(format!("bingo-prefs-{}", Uuid::new_v4()))
            .join("prefs.json")
    }

    #[test]
    fn missing_file_yields_defaults() {
        let prefs = ClientPrefs::load_from(&scratch_path());
        assert_eq!(prefs.board_id, None);
        assert_eq!(prefs.code, ClaimantCode::One);
    }

    #[test]
    fn saved_prefs_are_read_back() {
        let path = scratch_path();
        let prefs = ClientPrefs {
            board_id: Some(Uuid::new_v4()),
            code: ClaimantCode::Six,
        };
        prefs.save_to(&path).unwrap();

        assert_eq!(ClientPrefs::load_from(&path), prefs);
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains(r#""code": "6""#));

        fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn corrupt_file_yields_defaults() {
        let path = scratch_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"code": "9"}"#).unwrap();

        assert_eq!(ClientPrefs::load_from(&path), ClientPrefs::default());

        fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }
}
