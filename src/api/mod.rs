pub mod error;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

use crate::config::GoalTrackConfig;
use crate::core::goal::Goal;
use crate::core::item::ItemId;
use crate::core::project::{NewProject, Project};
pub use error::{CreateError, DeleteError, LoadError, RegisterError};

/// Remote collections exposed by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Goals,
    Projects,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Goals => "goals",
            Self::Projects => "projects",
        }
    }

    /// Name of the array field in a list response.
    pub fn field(&self) -> &'static str {
        self.path()
    }

    pub fn noun(&self) -> &'static str {
        match self {
            Self::Goals => "goal",
            Self::Projects => "project",
        }
    }
}

/// Account creation payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// HTTP client for the goaltrack REST service.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, String> {
        let http = Client::builder()
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {}", e))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn from_config(config: &GoalTrackConfig) -> Result<Self, String> {
        Self::new(config.base())
    }

    pub fn upload_base(&self) -> String {
        format!("{}/uploads", self.base_url)
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.base_url, endpoint.path())
    }

    /// Goals are fetched without credentials.
    pub async fn load_goals(&self) -> Result<Vec<Goal>, LoadError> {
        self.load_collection(Endpoint::Goals, None).await
    }

    pub async fn load_projects(&self, auth_token: Option<&str>) -> Result<Vec<Project>, LoadError> {
        self.load_collection(Endpoint::Projects, auth_token).await
    }

    /// GET a collection and pull the array out of its named field.
    pub async fn load_collection<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        auth_token: Option<&str>,
    ) -> Result<Vec<T>, LoadError> {
        let mut req = self.http.get(self.url(endpoint));
        if let Some(token) = auth_token {
            req = req.bearer_auth(token);
        }
        let resp = req
            .send()
            .await
            .map_err(|e| LoadError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            log::warn!("GET /{} returned {}", endpoint.path(), status);
            return Err(LoadError::FetchFailed {
                collection: endpoint.path(),
                status: status.as_u16(),
            });
        }

        let text = resp
            .text()
            .await
            .map_err(|e| LoadError::Transport(e.to_string()))?;
        let items = decode_collection(&text, endpoint.field())?;
        log::debug!("Loaded {} {}", items.len(), endpoint.path());
        Ok(items)
    }

    /// DELETE one item. Sent without credentials for both collections.
    pub async fn delete_item(&self, endpoint: Endpoint, id: &ItemId) -> Result<(), DeleteError> {
        let mut url = Url::parse(&self.url(endpoint)).map_err(|e| DeleteError::Transport(e.to_string()))?;
        // the id is one escaped segment, never extra path or query
        url.path_segments_mut()
            .map_err(|_| DeleteError::Transport(format!("{} cannot take a path", self.base_url)))?
            .push(id.as_str());
        let resp = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(|e| DeleteError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(DeleteError::DeleteFailed {
                noun: endpoint.noun(),
                status: resp.status().as_u16(),
            });
        }
        Ok(())
    }

    /// POST a new project as multipart form data and return the stored record.
    pub async fn create_project(
        &self,
        payload: &NewProject,
        auth_token: Option<&str>,
    ) -> Result<Project, CreateError> {
        let image = Part::bytes(payload.image_bytes.clone())
            .file_name(payload.image_name.clone())
            .mime_str(&payload.image_type)
            .map_err(|e| CreateError::Transport(e.to_string()))?;
        let form = Form::new()
            .text("title", payload.title.clone())
            .part("image", image);

        let mut req = self.http.post(self.url(Endpoint::Projects)).multipart(form);
        if let Some(token) = auth_token {
            req = req.bearer_auth(token);
        }
        let resp = req
            .send()
            .await
            .map_err(|e| CreateError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            let msg = server_error(resp, "Project could not be created.").await;
            return Err(CreateError::CreateFailed(msg));
        }

        let value: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| CreateError::CreateFailed(format!("Invalid response: {}", e)))?;
        let record = match value.get("project") {
            Some(inner) if inner.is_object() => inner.clone(),
            _ => value,
        };
        serde_json::from_value(record)
            .map_err(|e| CreateError::CreateFailed(format!("Invalid response: {}", e)))
    }

    pub async fn register(&self, registration: &Registration) -> Result<(), RegisterError> {
        let resp = self
            .http
            .post(format!("{}/register", self.base_url))
            .json(registration)
            .send()
            .await
            .map_err(|e| RegisterError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            let msg = server_error(resp, "Account could not be created.").await;
            return Err(RegisterError::Rejected(msg));
        }
        log::info!("Registered account for {}", registration.email);
        Ok(())
    }
}

/// Extract the array under `field` from a list response body.
fn decode_collection<T: DeserializeOwned>(body: &str, field: &'static str) -> Result<Vec<T>, LoadError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|_| LoadError::MalformedResponse {
            detail: format!("{} not found", field),
        })?;

    let array = match value.get(field) {
        Some(serde_json::Value::Array(items)) => items,
        _ => {
            return Err(LoadError::MalformedResponse {
                detail: format!("{} not found", field),
            });
        }
    };

    array
        .iter()
        .enumerate()
        .map(|(i, item)| {
            T::deserialize(item).map_err(|e| LoadError::MalformedResponse {
                detail: format!("{}[{}]: {}", field, i, e),
            })
        })
        .collect()
}

/// The `error` field of a rejection body, or `fallback` when absent.
async fn server_error(resp: Response, fallback: &str) -> String {
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    serde_json::from_str::<serde_json::Value>(&text)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| {
            log::warn!("Server returned {} without an error message", status);
            fallback.to_string()
        })
}
