//! Global Trello settings (`webform_trello.settings`).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use trello::{CredentialProvider, Credentials};

use crate::store::{ConfigStore, StoreError};

/// Name of the settings object in the config store.
pub const SETTINGS_NAME: &str = "webform_trello.settings";

/// App credentials section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Developer API key
    pub apikey: String,
    /// Token generated for the key
    pub token: String,
}

impl From<&AppSettings> for Credentials {
    fn from(app: &AppSettings) -> Self {
        Credentials::new(&app.apikey, &app.token)
    }
}

/// Default card text section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketSettings {
    /// Card title template
    pub name: String,
    /// Card description template
    pub description: String,
}

/// The whole settings object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrelloSettings {
    /// App credentials
    pub app: AppSettings,
    /// Default card text
    pub ticket: TicketSettings,
}

impl TrelloSettings {
    /// Credentials held by the app section.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::from(&self.app)
    }
}

/// Reads and writes [`TrelloSettings`] through a config store.
#[derive(Clone)]
pub struct SettingsRepository {
    store: Arc<dyn ConfigStore>,
}

impl SettingsRepository {
    /// Create a repository over a store.
    #[must_use]
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self { store }
    }

    /// Load settings; never-saved settings load as defaults.
    pub async fn load(&self) -> Result<TrelloSettings, StoreError> {
        match self.store.get(SETTINGS_NAME).await? {
            Some(value) => serde_json::from_value(value).map_err(|source| StoreError::Data {
                name: SETTINGS_NAME.to_string(),
                source,
            }),
            None => Ok(TrelloSettings::default()),
        }
    }

    /// Persist settings as-is.
    pub async fn save(&self, settings: &TrelloSettings) -> Result<(), StoreError> {
        let value = serde_json::to_value(settings).map_err(|source| StoreError::Data {
            name: SETTINGS_NAME.to_string(),
            source,
        })?;
        self.store.set(SETTINGS_NAME, value).await
    }
}

#[async_trait]
impl CredentialProvider for SettingsRepository {
    async fn credentials(&self) -> Credentials {
        match self.load().await {
            Ok(settings) => settings.credentials(),
            Err(e) => {
                warn!(error = %e, "Could not load Trello settings, using empty credentials");
                Credentials::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryConfigStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_missing_settings_load_as_defaults() {
        let repo = SettingsRepository::new(Arc::new(MemoryConfigStore::new()));
        let settings = repo.load().await.unwrap();
        assert_eq!(settings, TrelloSettings::default());
        assert!(!repo.credentials().await.is_complete());
    }

    #[tokio::test]
    async fn test_partial_object_fills_defaults() {
        let store = Arc::new(MemoryConfigStore::new());
        store
            .set(SETTINGS_NAME, json!({"app": {"apikey": "k"}}))
            .await
            .unwrap();

        let settings = SettingsRepository::new(store).load().await.unwrap();
        assert_eq!(settings.app.apikey, "k");
        assert_eq!(settings.app.token, "");
        assert_eq!(settings.ticket.name, "");
    }

    #[tokio::test]
    async fn test_save_uses_dotted_keys_layout() {
        let store = Arc::new(MemoryConfigStore::new());
        let repo = SettingsRepository::new(store.clone());

        let settings = TrelloSettings {
            app: AppSettings {
                apikey: "k".to_string(),
                token: "t".to_string(),
            },
            ticket: TicketSettings {
                name: "New submission".to_string(),
                description: "{{values.message}}".to_string(),
            },
        };
        repo.save(&settings).await.unwrap();

        let stored = store.get(SETTINGS_NAME).await.unwrap().unwrap();
        assert_eq!(stored["app"]["apikey"], "k");
        assert_eq!(stored["ticket"]["description"], "{{values.message}}");
        assert_eq!(repo.credentials().await, Credentials::new("k", "t"));
    }
}
