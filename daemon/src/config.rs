//! Daemon configuration (`~/.minewatchd.toml`).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Error;
use crate::watcher::WatchMode;

const CONFIG_FILE_NAME: &str = ".minewatchd.toml";
const DEFAULT_NOTIFY_TIMEOUT_SECS: u64 = 10;
const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Configuration record, read once at startup and never reloaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Notice recipients. One HTTP channel is built per address.
    #[serde(default)]
    pub emails: Vec<String>,

    /// Players whose join/leave events are never announced.
    #[serde(default)]
    pub muted_users: Vec<String>,

    /// Endpoint that receives `{"Recipient", "Message"}` POSTs.
    #[serde(default)]
    pub notify_url: String,

    /// Server log to follow.
    #[serde(default)]
    pub log_file: PathBuf,

    /// IANA zone the server writes its timestamps in. Empty means UTC.
    #[serde(default)]
    pub time_zone: String,

    #[serde(default = "default_notify_timeout_secs")]
    pub notify_timeout_secs: u64,

    #[serde(default)]
    pub watch_mode: WatchMode,

    /// Only used with `watch_mode = "poll"`.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_notify_timeout_secs() -> u64 {
    DEFAULT_NOTIFY_TIMEOUT_SECS
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

impl Config {
    /// `$HOME/.minewatchd.toml`.
    pub fn default_path() -> Result<PathBuf, Error> {
        let home = dirs::home_dir().ok_or(Error::HomeDirNotFound)?;
        Ok(home.join(CONFIG_FILE_NAME))
    }

    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, Error> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        config.validate(path)?;

        info!(
            path = %path.display(),
            log_file = %config.log_file.display(),
            recipients = config.emails.len(),
            muted = config.muted_users.len(),
            "Loaded config"
        );

        Ok(config)
    }

    /// Parse config text without validating it.
    pub fn from_toml(content: &str) -> Result<Self, Error> {
        toml::from_str(content).map_err(|e| Error::ConfigParse(e.to_string()))
    }

    /// Check the fields the daemon cannot start without.
    pub fn validate(&self, path: &Path) -> Result<(), Error> {
        if self.log_file.as_os_str().is_empty() {
            return Err(Error::ConfigInvalid(format!(
                "you must provide log_file value in {}",
                path.display()
            )));
        }

        if !self.emails.is_empty() && self.notify_url.trim().is_empty() {
            return Err(Error::ConfigInvalid(format!(
                "emails are configured but notify_url is empty in {}",
                path.display()
            )));
        }

        self.zone()?;
        debug!(path = %path.display(), "Config is valid");
        Ok(())
    }

    /// Resolve `time_zone` to a zone.
    pub fn zone(&self) -> Result<Tz, Error> {
        resolve_zone(&self.time_zone)
    }

    pub fn notify_timeout(&self) -> Duration {
        Duration::from_secs(self.notify_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Look up an IANA zone name. An empty name is UTC.
pub fn resolve_zone(name: &str) -> Result<Tz, Error> {
    let name = name.trim();
    if name.is_empty() {
        return Ok(Tz::UTC);
    }

    name.parse::<Tz>()
        .map_err(|e| Error::ConfigInvalid(format!("unknown time_zone {:?}: {}", name, e)))
}
