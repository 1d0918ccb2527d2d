//! Configuration file handling
//!
//! The configuration is a small JSON document. Only `color` is required:
//!
//! ```json
//! { "color": "#3A6EA5" }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::color::{self, ColorError, SysColor};
use crate::constants::{config as paths, schedule};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// When tick outcomes are shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyPolicy {
    /// Every correction attempt is reported, even if it repeats the last one
    #[default]
    EveryAttempt,
    /// Only report an outcome that differs from the previous one
    OnChange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Desired desktop color as `#RRGGBB`
    pub color: String,

    /// Seconds between two checks
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    #[serde(default)]
    pub notify_policy: NotifyPolicy,
}

fn default_interval_secs() -> u64 {
    schedule::DEFAULT_INTERVAL_SECS
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            path = %path.display(),
            color = %config.color,
            interval_secs = config.interval_secs,
            "Loaded configuration"
        );
        Ok(config)
    }

    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        let mut config: Config = serde_json::from_str(contents)?;
        config.validate_and_clamp();
        Ok(config)
    }

    /// Clamp values to safe ranges
    fn validate_and_clamp(&mut self) {
        use schedule::{MAX_INTERVAL_SECS, MIN_INTERVAL_SECS};

        if self.interval_secs < MIN_INTERVAL_SECS {
            warn!(
                interval_secs = self.interval_secs,
                min = MIN_INTERVAL_SECS,
                "interval_secs below minimum, clamping"
            );
            self.interval_secs = MIN_INTERVAL_SECS;
        } else if self.interval_secs > MAX_INTERVAL_SECS {
            warn!(
                interval_secs = self.interval_secs,
                max = MAX_INTERVAL_SECS,
                "interval_secs exceeds maximum, clamping"
            );
            self.interval_secs = MAX_INTERVAL_SECS;
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn desired_color(&self) -> Result<SysColor, ColorError> {
        color::decode(&self.color)
    }
}

/// Locate the configuration file
///
/// Priority: explicit path > `config.json` in the working directory > the
/// platform config directory.
pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    resolve_path_in(explicit, &cwd, dirs::config_dir())
}

fn resolve_path_in(explicit: Option<&Path>, cwd: &Path, config_dir: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    let local = cwd.join(paths::FILENAME);
    if local.exists() {
        return local;
    }

    match config_dir {
        Some(dir) => dir.join(paths::APP_DIR).join(paths::FILENAME),
        None => local,
    }
}
