use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::item::{ItemId, Listed, timestamp};

/// A project card: a title and a cover image stored on the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ItemId,
    pub title: String,
    /// Path relative to the backend's upload directory.
    #[serde(default)]
    pub image: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Listed for Project {
    fn id(&self) -> &ItemId {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }
}

impl Project {
    pub fn image_url(&self, upload_base: &str) -> String {
        format!(
            "{}/{}",
            upload_base.trim_end_matches('/'),
            self.image.trim_start_matches('/')
        )
    }
}

/// Payload for creating a project: title plus the cover image upload.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    pub title: String,
    pub image_name: String,
    pub image_type: String,
    pub image_bytes: Vec<u8>,
}

impl NewProject {
    pub fn new(title: impl Into<String>, image_name: impl Into<String>, image_bytes: Vec<u8>) -> Self {
        let image_name = image_name.into();
        let image_type = guess_image_type(&image_name).to_string();
        Self {
            title: title.into(),
            image_name,
            image_type,
            image_bytes,
        }
    }
}

fn guess_image_type(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}
