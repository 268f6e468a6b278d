use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_VERSION: u64 = 1;

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_state_file() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join("goaltrack")
        .join("state.json")
}

fn default_version() -> u64 {
    CONFIG_VERSION
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("goaltrack")
        .join("config.json")
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GoalTrackConfig {
    #[serde(default = "default_version")]
    pub version: u64,
    /// Root of the REST service, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub debug_logging: bool,
    /// Where the `activeView` and `authToken` keys are kept.
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
}

impl Default for GoalTrackConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            base_url: default_base_url(),
            debug_logging: false,
            state_file: default_state_file(),
        }
    }
}

impl GoalTrackConfig {
    /// Load from `path`, falling back to defaults when the file is missing
    /// or unreadable.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str::<Self>(&content) {
            Ok(config) => {
                if config.version != CONFIG_VERSION {
                    log::warn!(
                        "Config version {} differs from supported version {}",
                        config.version,
                        CONFIG_VERSION
                    );
                }
                config
            }
            Err(e) => {
                log::warn!("Ignoring malformed config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
