//! Per-form handler configuration and its persistence.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use trello::CardPosition;

use crate::settings::TrelloSettings;
use crate::store::{validate_name, ConfigStore, StoreError};

/// Handler plugin id.
pub const HANDLER_ID: &str = "trello";

/// Settings of one handler attached to a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HandlerConfig {
    /// Target board id
    pub board: String,
    /// Board name when the config was saved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board_label: Option<String>,
    /// Target list id
    pub list: String,
    /// List name when the config was saved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_label: Option<String>,
    /// Card title template
    pub name: String,
    /// Card position in the list
    pub position: CardPosition,
    /// Label ids attached to each card
    pub labels: Vec<String>,
    /// Member ids assigned to each card
    pub members: Vec<String>,
    /// Card description template
    pub description: String,
    /// Report invoked handler methods to the submitter
    pub debug: bool,
}

impl HandlerConfig {
    /// Default configuration for a new attachment, seeded from the global
    /// ticket templates.
    #[must_use]
    pub fn defaults(settings: &TrelloSettings) -> Self {
        Self {
            name: settings.ticket.name.clone(),
            description: settings.ticket.description.clone(),
            position: CardPosition::Top,
            ..Self::default()
        }
    }
}

/// Config name of the handler attached to `form_id`.
pub fn handler_config_name(form_id: &str) -> Result<String, StoreError> {
    let name = format!("webform.webform.{form_id}.handlers.{HANDLER_ID}");
    // A form id must be a single name segment.
    if form_id.contains('.') {
        return Err(StoreError::InvalidName(name));
    }
    validate_name(&name)?;
    Ok(name)
}

/// Reads and writes handler configs through a config store.
#[derive(Clone)]
pub struct HandlerRepository {
    store: Arc<dyn ConfigStore>,
}

impl HandlerRepository {
    /// Create a repository over a store.
    #[must_use]
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self { store }
    }

    /// Load the handler attached to a form, if any.
    pub async fn load(&self, form_id: &str) -> Result<Option<HandlerConfig>, StoreError> {
        let name = handler_config_name(form_id)?;
        self.store
            .get(&name)
            .await?
            .map(|value| {
                serde_json::from_value(value).map_err(|source| StoreError::Data { name, source })
            })
            .transpose()
    }

    /// Attach or update the handler of a form.
    pub async fn save(&self, form_id: &str, config: &HandlerConfig) -> Result<(), StoreError> {
        let name = handler_config_name(form_id)?;
        let value = serde_json::to_value(config).map_err(|source| StoreError::Data {
            name: name.clone(),
            source,
        })?;
        self.store.set(&name, value).await
    }

    /// Detach the handler of a form. Returns whether one was attached.
    pub async fn delete(&self, form_id: &str) -> Result<bool, StoreError> {
        let name = handler_config_name(form_id)?;
        self.store.delete(&name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::TicketSettings;
    use crate::store::MemoryConfigStore;

    #[test]
    fn test_defaults_come_from_settings() {
        let settings = TrelloSettings {
            ticket: TicketSettings {
                name: "Submission {{submission.id}}".to_string(),
                description: "{{values.message}}".to_string(),
            },
            ..TrelloSettings::default()
        };

        let config = HandlerConfig::defaults(&settings);
        assert_eq!(config.name, "Submission {{submission.id}}");
        assert_eq!(config.description, "{{values.message}}");
        assert_eq!(config.position, CardPosition::Top);
        assert!(config.board.is_empty());
        assert!(config.labels.is_empty());
        assert!(!config.debug);
    }

    #[test]
    fn test_config_name() {
        assert_eq!(
            handler_config_name("contact").unwrap(),
            "webform.webform.contact.handlers.trello"
        );
        assert!(handler_config_name("../x").is_err());
        assert!(handler_config_name("a.b").is_err());
        assert!(handler_config_name("").is_err());
    }

    #[tokio::test]
    async fn test_repository_round_trip() {
        let repo = HandlerRepository::new(Arc::new(MemoryConfigStore::new()));
        assert!(repo.load("contact").await.unwrap().is_none());

        let config = HandlerConfig {
            board: "b1".to_string(),
            board_label: Some("Support".to_string()),
            list: "l1".to_string(),
            labels: vec!["L1".to_string()],
            position: CardPosition::Bottom,
            ..HandlerConfig::default()
        };
        repo.save("contact", &config).await.unwrap();
        assert_eq!(repo.load("contact").await.unwrap(), Some(config));

        assert!(repo.delete("contact").await.unwrap());
        assert!(repo.load("contact").await.unwrap().is_none());
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{"board": "b1", "boardLabel": "Support", "position": "bottom"}"#;
        let config: HandlerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.board_label.as_deref(), Some("Support"));
        assert_eq!(config.position, CardPosition::Bottom);
        assert!(config.members.is_empty());
    }
}
