use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Keys persisted between runs (`activeView`, `authToken`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct StoredState {
    #[serde(rename = "activeView", default, skip_serializing_if = "Option::is_none")]
    active_view: Option<String>,
    #[serde(rename = "authToken", default, skip_serializing_if = "Option::is_none")]
    auth_token: Option<String>,
}

/// Small JSON key store for client-side state. Every setter writes through.
#[derive(Debug, Clone)]
pub struct ClientStore {
    path: PathBuf,
    state: StoredState,
}

impl ClientStore {
    pub fn open(path: &Path) -> Self {
        let state = match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log::warn!("Discarding unreadable client state {}: {}", path.display(), e);
                StoredState::default()
            }),
            Err(_) => StoredState::default(),
        };
        Self {
            path: path.to_path_buf(),
            state,
        }
    }

    pub fn active_view(&self) -> Option<&str> {
        self.state.active_view.as_deref()
    }

    pub fn set_active_view(&mut self, view: &str) {
        self.state.active_view = Some(view.to_string());
        self.save();
    }

    /// Bearer token left here by the login flow.
    pub fn auth_token(&self) -> Option<&str> {
        self.state.auth_token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn set_auth_token(&mut self, token: Option<&str>) {
        self.state.auth_token = token.map(str::to_string);
        self.save();
    }

    fn save(&self) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                log::error!("Failed to create {}: {}", parent.display(), e);
                return;
            }
        }
        match serde_json::to_string_pretty(&self.state) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&self.path, json) {
                    log::error!("Failed to save client state: {}", e);
                }
            }
            Err(e) => log::error!("Failed to serialize client state: {}", e),
        }
    }
}
