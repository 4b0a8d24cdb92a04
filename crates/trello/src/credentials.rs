//! API key and token handling.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trello API key and token.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Developer API key
    pub key: String,
    /// Token generated for the key
    pub token: String,
}

impl Credentials {
    /// Create credentials from a key and a token.
    #[must_use]
    pub fn new(key: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            token: token.into(),
        }
    }

    /// Both the key and the token are set.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.key.is_empty() && !self.token.is_empty()
    }

    /// Fill empty fields from `fallback`.
    #[must_use]
    pub fn or(self, fallback: Self) -> Self {
        Self {
            key: if self.key.is_empty() {
                fallback.key
            } else {
                self.key
            },
            token: if self.token.is_empty() {
                fallback.token
            } else {
                self.token
            },
        }
    }

    pub(crate) fn query(&self) -> [(&'static str, &str); 2] {
        [("key", &self.key), ("token", &self.token)]
    }
}

// Never print secrets in logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &redact(&self.key))
            .field("token", &redact(&self.token))
            .finish()
    }
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() {
        "<empty>"
    } else {
        "<redacted>"
    }
}

/// Source of the credentials attached to each API call.
///
/// The client asks for credentials on every request, so a provider backed by
/// a settings store picks up admin changes without rebuilding the client.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Current credentials. Missing values are returned as empty strings.
    async fn credentials(&self) -> Credentials;
}

#[async_trait]
impl CredentialProvider for Credentials {
    async fn credentials(&self) -> Credentials {
        self.clone()
    }
}
