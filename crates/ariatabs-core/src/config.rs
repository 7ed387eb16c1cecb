//! File-backed configuration
//!
//! ```json
//! {
//!   "tabs": { "tabListClass": "tl_list", "onClass": "ON", "hoverableClass": "tl-hoverable" },
//!   "logLevel": "info"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use ariatabs_tabs::TabListConfig;

use crate::error::CoreError;
use crate::Result;

pub const CONFIG_FILE_NAME: &str = "ariatabs.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Tab list markers
    pub tabs: TabListConfig,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Config {
    pub fn new() -> Self {
        Self {
            tabs: TabListConfig::default(),
            log_level: "info".to_string(),
        }
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let mut config: Config = serde_json::from_str(json)?;
        config.tabs = config.tabs.normalized();
        config.validate()?;
        Ok(config)
    }

    /// `ariatabs.json` in the working directory
    pub fn default_path() -> PathBuf {
        std::env::current_dir()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .unwrap_or_else(|_| PathBuf::from(CONFIG_FILE_NAME))
    }

    /// Reject class names that cannot match as a single class token
    pub fn validate(&self) -> Result<()> {
        let classes = [
            &self.tabs.tab_list_class,
            &self.tabs.on_class,
            &self.tabs.hoverable_class,
        ];
        if let Some(bad) = classes.iter().find(|c| c.contains(char::is_whitespace)) {
            return Err(CoreError::Config(format!(
                "class name must be a single token: {:?}",
                bad
            )));
        }
        if self.log_level.trim().is_empty() {
            return Err(CoreError::Config("log level cannot be empty".to_string()));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
