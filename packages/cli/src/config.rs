use pagecraft_editor::DEFAULT_MAX_LEVELS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "pagecraft.config.json";

/// Pagecraft project configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding one JSON file per page
    #[serde(default = "default_pages_dir")]
    pub pages_dir: String,

    /// Undo levels kept per editing session (0 = unlimited)
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Log filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_pages_dir() -> String {
    "pages".to_string()
}

fn default_history_limit() -> usize {
    DEFAULT_MAX_LEVELS
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Absolute path to the pages directory
    pub fn pages_dir(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.pages_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pages_dir: default_pages_dir(),
            history_limit: default_history_limit(),
            log_level: default_log_level(),
        }
    }
}
