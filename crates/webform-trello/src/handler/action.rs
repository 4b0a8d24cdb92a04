//! Card creation on form submission.

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument, warn};
use trello::{Card, NewCard, TrelloApi, TrelloError};

use super::config::{HandlerConfig, HANDLER_ID};
use crate::sanitize::filter_xss;
use crate::submission::Submission;
use crate::template::{TemplateError, TemplateRenderer};

/// Errors raised while turning a submission into a card.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("Failed to create Trello card: {0}")]
    Trello(#[from] TrelloError),
}

/// Result of a successful card creation.
#[derive(Debug, Clone, Serialize)]
pub struct ActionReport {
    /// The created card
    pub card: Card,
    /// Debug trace messages, empty unless the handler has `debug` enabled
    pub messages: Vec<String>,
}

/// Creates a card for each submission of a form with the handler attached.
pub struct CardAction {
    api: Arc<dyn TrelloApi>,
    renderer: TemplateRenderer,
}

impl CardAction {
    #[must_use]
    pub fn new(api: Arc<dyn TrelloApi>) -> Self {
        Self {
            api,
            renderer: TemplateRenderer::new(),
        }
    }

    /// Render the templates and build the card input.
    pub fn build_card(
        &self,
        config: &HandlerConfig,
        submission: &Submission,
    ) -> Result<NewCard, TemplateError> {
        let context = submission.template_context();
        let name = self.renderer.render(&config.name, &context)?;
        let description = self.renderer.render(&config.description, &context)?;

        Ok(NewCard::new(name, filter_xss(&description))
            .with_position(config.position)
            .with_labels(config.labels.clone())
            .with_members(config.members.clone()))
    }

    /// Create the card for a submission that is about to be saved.
    #[instrument(skip_all, fields(form_id = %submission.form_id, submission_id = %submission.id))]
    pub async fn pre_save(
        &self,
        config: &HandlerConfig,
        submission: &Submission,
    ) -> Result<ActionReport, ActionError> {
        let card = self.build_card(config, submission)?;
        let created = self.api.create_card(&config.list, &card).await?;
        info!(card_id = %created.id, list = %config.list, "Created Trello card for submission");

        let messages = self.debug(config, "pre_save").into_iter().collect();
        Ok(ActionReport {
            card: created,
            messages,
        })
    }

    /// Trace message naming the invoked method, when debugging is enabled.
    fn debug(&self, config: &HandlerConfig, method_name: &str) -> Option<String> {
        if !config.debug {
            return None;
        }
        let message = format!(
            "Invoked {HANDLER_ID}: {}:{method_name}",
            std::any::type_name::<Self>()
        );
        warn!("{message}");
        Some(message)
    }
}
