pub mod gist;
pub mod republish;

pub use gist::GistClient;
pub use republish::RepublishService;

use async_trait::async_trait;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetRequest {
    /// File name to content.
    pub files: BTreeMap<String, String>,
    pub try_short_url: bool,
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetResult {
    pub url: String,
}

#[derive(Debug, Error)]
pub enum SnippetError {
    #[error("No github token configured")]
    NotConfigured,

    #[error("Not a gist id: {0}")]
    InvalidId(String),

    /// The host answered but refused the request, most often a rate limit.
    #[error("Snippet host rejected the request (status {status}): {message}")]
    Host { status: u16, message: String },

    #[error("Snippet host request failed: {0}")]
    Unknown(String),
}

impl SnippetError {
    pub fn is_host_error(&self) -> bool {
        matches!(self, SnippetError::Host { .. })
    }

    /// The message the host gave, if it gave one.
    pub fn host_message(&self) -> Option<&str> {
        match self {
            SnippetError::Host { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}

pub type SnippetHostResult<T> = Result<T, SnippetError>;

/// Gist ids are plain alphanumeric path segments.
pub fn is_gist_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric())
}

#[async_trait]
pub trait SnippetHost: Send + Sync {
    async fn create(&self, request: SnippetRequest) -> SnippetHostResult<SnippetResult>;

    async fn delete(&self, id: &str, token: &str) -> SnippetHostResult<()>;
}
