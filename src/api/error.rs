use thiserror::Error;

/// Why a collection could not be loaded. The display text is what the view
/// shows in its error state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("Failed to fetch {collection}")]
    FetchFailed { collection: &'static str, status: u16 },
    #[error("Invalid data format: {detail}")]
    MalformedResponse { detail: String },
    #[error("Request failed: {0}")]
    Transport(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeleteError {
    #[error("Failed to delete {noun} (HTTP {status})")]
    DeleteFailed { noun: &'static str, status: u16 },
    #[error("Request failed: {0}")]
    Transport(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateError {
    /// Server-supplied message, shown as-is.
    #[error("{0}")]
    CreateFailed(String),
    #[error("Request failed: {0}")]
    Transport(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterError {
    /// Server-supplied message, shown as-is.
    #[error("{0}")]
    Rejected(String),
    #[error("Request failed: {0}")]
    Transport(String),
}
