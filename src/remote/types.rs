use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Role;

#[derive(Debug, Clone, Error)]
pub enum RemoteError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Remote store returned HTTP {status}")]
    Status { status: u16 },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            RemoteError::InvalidResponse(e.to_string())
        } else {
            RemoteError::Network(e.to_string())
        }
    }
}

/// Body of `POST` / `PUT` on the conversations resource.
#[derive(Debug, Serialize)]
pub struct TitleBody<'a> {
    pub title: &'a str,
}

/// Body of `POST` on the messages resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    pub conversation_id: i64,
    pub role: Role,
    pub content: String,
}
