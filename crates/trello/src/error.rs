//! Error types for Trello API calls.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when calling the Trello API.
#[derive(Debug, Error)]
pub enum TrelloError {
    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("Trello API returned error status {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// Response body was not the JSON we expected
    #[error("Failed to parse Trello API response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The HTTP client could not be built
    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

impl TrelloError {
    /// HTTP status of the failed call, if the API answered at all.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status(),
            _ => None,
        }
    }

    /// Whether the API reported the requested resource as missing.
    ///
    /// Trello answers with 404 for deleted boards and lists, and with 400 for
    /// ids that are not valid object ids.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST)
        )
    }
}
