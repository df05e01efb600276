//! Global eventscope configuration.

use std::path::PathBuf;
use std::time::Duration;

use config::{Config, File};
use serde::Deserialize;

use crate::error::{EventScopeError, EventScopeResult};
use crate::mirror::Mirror;

static DEFAULT_DATA_PATH: &str = "~/.local/share/eventscope/events.json";
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 3600;

fn default_data_file() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_PATH)
}

fn default_sweep_interval_secs() -> u64 {
    DEFAULT_SWEEP_INTERVAL_SECS
}

/// Global configuration at ~/.config/eventscope/config.toml
#[derive(Deserialize, Clone)]
pub struct EventScopeConfig {
    /// Where the event collection is stored.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Display name used as the invitation organizer.
    pub organizer: Option<String>,

    /// Invitation mail service; mail dispatch is skipped when unset.
    pub mailer: Option<MailerConfig>,

    /// External calendar mirror; mirroring is skipped when unset.
    pub mirror: Option<Mirror>,

    /// Seconds between sweeper passes in `eventscope watch`.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MailerConfig {
    pub url: String,
}

impl EventScopeConfig {
    pub fn load() -> EventScopeResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        let config: EventScopeConfig = Config::builder()
            .add_source(File::from(config_path).required(false))
            .build()
            .map_err(|e| EventScopeError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| EventScopeError::Config(e.to_string()))?;

        Ok(config)
    }

    pub fn config_path() -> EventScopeResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| {
                EventScopeError::Config("Could not determine config directory".into())
            })?
            .join("eventscope");

        Ok(config_dir.join("config.toml"))
    }

    /// The data file path with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.data_file.to_string_lossy()).into_owned();
        PathBuf::from(expanded)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &std::path::Path) -> EventScopeResult<()> {
        let contents = format!(
            "\
# eventscope configuration

# Where the event collection is stored:
# data_file = \"{DEFAULT_DATA_PATH}\"

# Shown as the organizer on invitation mail:
# organizer = \"Alex Chen\"

# Invitation mail service:
# [mailer]
# url = \"http://localhost:3001\"

# External calendar mirror (needs eventscope-provider-<name> on PATH):
# [mirror]
# provider = \"google\"
# google_account = \"you@example.com\"
# google_calendar_id = \"primary\"

# Seconds between retention sweeps in `eventscope watch`:
# sweep_interval_secs = {DEFAULT_SWEEP_INTERVAL_SECS}
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                EventScopeError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| EventScopeError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
