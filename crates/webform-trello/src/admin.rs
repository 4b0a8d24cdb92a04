//! Admin settings form: API credentials and default card text.

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use trello::TrelloApi;

use crate::forms::{FormErrors, TextField};
use crate::settings::{SettingsRepository, TrelloSettings};
use crate::store::StoreError;
use crate::template::TemplateRenderer;

/// Where Trello developers get their key and token.
pub const TRELLO_APP_KEY_URL: &str = "https://trello.com/app-key/";

/// Admin settings route, linked from unconfigured handler forms.
pub const ADMIN_SETTINGS_PATH: &str = "/admin/config/trello";

/// App credentials section of the form.
#[derive(Debug, Clone, Serialize)]
pub struct AppSection {
    pub apikey: TextField,
    pub token: TextField,
}

/// Ticket template section of the form.
#[derive(Debug, Clone, Serialize)]
pub struct TicketSection {
    pub name: TextField,
    pub description: TextField,
}

/// The admin settings form.
#[derive(Debug, Clone, Serialize)]
pub struct AdminConfigForm {
    pub app: AppSection,
    pub ticket: TicketSection,
}

impl AdminConfigForm {
    fn new(settings: &TrelloSettings) -> Self {
        Self {
            app: AppSection {
                apikey: TextField::new("Developer API KEY", &settings.app.apikey)
                    .describe(&format!(
                        "This api key is provided by Trello. See Developer API Keys at {TRELLO_APP_KEY_URL}"
                    ))
                    .required(),
                token: TextField::new("Token", &settings.app.token)
                    .describe(&format!(
                        "Generate the corresponding token via Developer API Keys at {TRELLO_APP_KEY_URL}"
                    ))
                    .required(),
            },
            ticket: TicketSection {
                name: TextField::new("Title", &settings.ticket.name)
                    .describe("The title of the card")
                    .required(),
                description: TextField::new("Description", &settings.ticket.description)
                    .multiline(5)
                    .required(),
            },
        }
    }
}

/// Builds, validates and saves the admin settings form.
pub struct AdminConfigService {
    api: Arc<dyn TrelloApi>,
    settings: SettingsRepository,
    renderer: TemplateRenderer,
}

impl AdminConfigService {
    #[must_use]
    pub fn new(api: Arc<dyn TrelloApi>, settings: SettingsRepository) -> Self {
        Self {
            api,
            settings,
            renderer: TemplateRenderer::new(),
        }
    }

    /// Form pre-filled with the stored settings.
    pub async fn build(&self) -> Result<AdminConfigForm, StoreError> {
        let settings = self.settings.load().await?;
        Ok(AdminConfigForm::new(&settings))
    }

    /// Validate submitted settings.
    ///
    /// Credentials are checked against the live API only once all required
    /// fields are present. The API cannot tell which of the two is wrong, so
    /// a failed check flags both.
    pub async fn validate(&self, input: &TrelloSettings) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        errors.require("app[apikey]", "Developer API KEY", &input.app.apikey);
        errors.require("app[token]", "Token", &input.app.token);
        errors.require("ticket[name]", "Title", &input.ticket.name);
        errors.require("ticket[description]", "Description", &input.ticket.description);

        for (element, template) in [
            ("ticket[name]", &input.ticket.name),
            ("ticket[description]", &input.ticket.description),
        ] {
            if let Err(e) = self.renderer.validate(template) {
                errors.set(element, e.to_string());
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        if !self
            .api
            .check_authorization(&input.app.apikey, &input.app.token)
            .await
        {
            warn!("Trello rejected the submitted credentials");
            errors.set("app[apikey]", "The key might be wrong");
            errors.set("app[token]", "The token might be wrong");
        }

        errors.into_result()
    }

    /// Persist both sections as submitted.
    pub async fn submit(&self, input: &TrelloSettings) -> Result<(), StoreError> {
        self.settings.save(input).await?;
        info!("Trello settings saved");
        Ok(())
    }
}
