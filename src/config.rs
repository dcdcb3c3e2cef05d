//! Service configuration.
//!
//! Read from TOML, then overridden by environment variables:
//!
//! ```toml
//! database_path = "rota.db"
//! weekday_labels = "ko"
//! roster = ["Kim", "Lee"]
//! ```
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `ROTA_DATABASE_PATH` | `database_path` |
//! | `ROTA_WEEKDAY_LABELS` | `weekday_labels` (`ko` or `en`) |

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, ScheduleError};
use crate::models::WeekdayLabels;
use crate::roster::StaticRoster;

pub const ENV_DATABASE_PATH: &str = "ROTA_DATABASE_PATH";
pub const ENV_WEEKDAY_LABELS: &str = "ROTA_WEEKDAY_LABELS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Weekday labels on the monthly table
    #[serde(default)]
    pub weekday_labels: WeekdayLabels,

    /// Active actors, one table column each
    #[serde(default)]
    pub roster: Vec<String>,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("rota.db")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            weekday_labels: WeekdayLabels::default(),
            roster: Vec::new(),
        }
    }
}

impl Config {
    /// Loads `path` (defaults if it does not exist) and applies env overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = fs::read_to_string(path).map_err(|e| {
                ScheduleError::Config(format!("failed to read {}: {e}", path.display()))
            })?;
            Self::from_toml_str(&contents).map_err(|e| match e {
                ScheduleError::Config(msg) => {
                    ScheduleError::Config(format!("{}: {msg}", path.display()))
                }
                other => other,
            })?
        } else {
            debug!("no config at {}, using defaults", path.display());
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| ScheduleError::Config(format!("invalid config: {e}")))
    }

    /// Applies overrides from `lookup` (the process environment in `load`).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_DATABASE_PATH).filter(|p| !p.trim().is_empty()) {
            self.database_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup(ENV_WEEKDAY_LABELS) {
            match WeekdayLabels::parse(&raw) {
                Some(labels) => self.weekday_labels = labels,
                None => warn!("ignoring {ENV_WEEKDAY_LABELS}={raw}: expected ko or en"),
            }
        }
    }

    /// The configured roster, validated and sorted.
    pub fn roster(&self) -> Result<StaticRoster> {
        StaticRoster::new(self.roster.iter().cloned())
    }
}
