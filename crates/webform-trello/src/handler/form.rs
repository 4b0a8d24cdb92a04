//! Handler configuration form.
//!
//! Board, list, label and member options are fetched live every time the
//! form is built. Changing the board triggers [`HandlerFormService::refresh`],
//! which re-fetches the board's lists, labels and members.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument, warn};
use trello::{
    board_label_options, board_list_options, board_member_options, board_options, CardPosition,
    Options, TrelloApi, TrelloError,
};

use super::config::{HandlerConfig, HandlerRepository};
use crate::admin::ADMIN_SETTINGS_PATH;
use crate::forms::{CheckboxField, FormErrors, SelectField, TextField};
use crate::settings::SettingsRepository;
use crate::store::StoreError;
use crate::template::TemplateRenderer;

/// Errors raised while building or saving the handler form.
#[derive(Debug, Error)]
pub enum HandlerFormError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Trello(#[from] TrelloError),
}

/// Values submitted through the handler form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlerInput {
    pub board: String,
    pub list: String,
    pub name: String,
    pub position: CardPosition,
    pub labels: Vec<String>,
    pub members: Vec<String>,
    pub description: String,
    pub debug: bool,
}

impl From<&HandlerConfig> for HandlerInput {
    fn from(config: &HandlerConfig) -> Self {
        Self {
            board: config.board.clone(),
            list: config.list.clone(),
            name: config.name.clone(),
            position: config.position,
            labels: config.labels.clone(),
            members: config.members.clone(),
            description: config.description.clone(),
            debug: config.debug,
        }
    }
}

/// Options that depend on the selected board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BoardOptions {
    pub lists: Options,
    pub labels: Options,
    pub members: Options,
}

#[derive(Debug, Clone, Serialize)]
pub struct BoardSettingsSection {
    pub board: SelectField,
    pub list: SelectField,
}

#[derive(Debug, Clone, Serialize)]
pub struct TicketSection {
    pub name: TextField,
    pub position: SelectField,
    pub labels: SelectField,
    pub members: SelectField,
    pub description: TextField,
}

#[derive(Debug, Clone, Serialize)]
pub struct DevelopmentSection {
    pub debug: CheckboxField,
}

/// Fully built handler settings form.
#[derive(Debug, Clone, Serialize)]
pub struct HandlerSettingsForm {
    pub board_settings: BoardSettingsSection,
    pub ticket: TicketSection,
    pub development: DevelopmentSection,
}

/// The handler form, or a pointer to the admin settings when credentials
/// are missing.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum HandlerConfigForm {
    Unconfigured { warning: String, settings_path: String },
    Ready(Box<HandlerSettingsForm>),
}

fn position_options() -> Options {
    [
        (CardPosition::Top.to_string(), "Top".to_string()),
        (CardPosition::Bottom.to_string(), "Bottom".to_string()),
    ]
    .into_iter()
    .collect()
}

impl HandlerSettingsForm {
    fn new(config: &HandlerConfig, boards: Options, dependent: BoardOptions) -> Self {
        Self {
            board_settings: BoardSettingsSection {
                board: SelectField::single("Board", boards, &config.board)
                    .describe("Select the board you want to create ticket.")
                    .required(),
                list: SelectField::single("List", dependent.lists, &config.list)
                    .describe("Select the list you want to create ticket.")
                    .required(),
            },
            ticket: TicketSection {
                name: TextField::new("Title", &config.name)
                    .describe("The title of the card")
                    .required(),
                position: SelectField::single(
                    "Position",
                    position_options(),
                    config.position.as_str(),
                )
                .describe(
                    "Top means the card will be created at the top of the list. \
                     Bottom means the card will be created at the bottom of the list.",
                )
                .required(),
                labels: SelectField::multiple("Labels", dependent.labels, &config.labels),
                members: SelectField::multiple("Members", dependent.members, &config.members),
                description: TextField::new("Description", &config.description)
                    .multiline(5)
                    .required(),
            },
            development: DevelopmentSection {
                debug: CheckboxField::new("Enable debugging", config.debug).describe(
                    "If checked, every handler method invoked will be displayed to the submitter.",
                ),
            },
        }
    }
}

/// Builds, validates and saves handler configuration.
pub struct HandlerFormService {
    api: Arc<dyn TrelloApi>,
    settings: SettingsRepository,
    handlers: HandlerRepository,
    renderer: TemplateRenderer,
}

impl HandlerFormService {
    #[must_use]
    pub fn new(
        api: Arc<dyn TrelloApi>,
        settings: SettingsRepository,
        handlers: HandlerRepository,
    ) -> Self {
        Self {
            api,
            settings,
            handlers,
            renderer: TemplateRenderer::new(),
        }
    }

    /// Current configuration of a form's handler, or defaults for a new one.
    pub async fn current(&self, form_id: &str) -> Result<HandlerConfig, StoreError> {
        match self.handlers.load(form_id).await? {
            Some(config) => Ok(config),
            None => Ok(HandlerConfig::defaults(&self.settings.load().await?)),
        }
    }

    /// Build the form for `form_id`.
    ///
    /// `selected_board` is the board picked in the current request; when it
    /// is empty the dependent options follow the saved board.
    #[instrument(skip(self))]
    pub async fn build(
        &self,
        form_id: &str,
        selected_board: Option<&str>,
    ) -> Result<HandlerConfigForm, HandlerFormError> {
        let settings = self.settings.load().await?;
        if !settings.credentials().is_complete() {
            return Ok(HandlerConfigForm::Unconfigured {
                warning: "Please input the trello app settings first".to_string(),
                settings_path: ADMIN_SETTINGS_PATH.to_string(),
            });
        }

        let config = self.current(form_id).await?;
        let boards = board_options(self.api.as_ref()).await?;

        let board = selected_board
            .filter(|b| !b.is_empty())
            .or(Some(config.board.as_str()).filter(|b| !b.is_empty()));
        let dependent = match board {
            Some(board_id) => self.refresh(board_id).await?,
            None => BoardOptions::default(),
        };

        Ok(HandlerConfigForm::Ready(Box::new(HandlerSettingsForm::new(
            &config, boards, dependent,
        ))))
    }

    /// Re-fetch the options that depend on the board selection.
    #[instrument(skip(self))]
    pub async fn refresh(&self, board_id: &str) -> Result<BoardOptions, TrelloError> {
        let api = self.api.as_ref();
        Ok(BoardOptions {
            lists: board_list_options(api, board_id).await?,
            labels: board_label_options(api, board_id).await?,
            members: board_member_options(api, board_id).await?,
        })
    }

    /// Validate submitted handler settings.
    pub fn validate(&self, input: &HandlerInput) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        if input.board.trim().is_empty() {
            errors.set("board", "Select the board you want to create ticket.");
        }
        errors.require("list", "List", &input.list);
        errors.require("name", "Title", &input.name);
        errors.require("description", "Description", &input.description);

        for (element, template) in [("name", &input.name), ("description", &input.description)] {
            if let Err(e) = self.renderer.validate(template) {
                errors.set(element, e.to_string());
            }
        }

        errors.into_result()
    }

    /// Save submitted settings, resolving the board and list names.
    ///
    /// Names are looked up once, at save time. An id missing from the
    /// current options is saved without a name.
    #[instrument(skip(self, input))]
    pub async fn submit(
        &self,
        form_id: &str,
        input: HandlerInput,
    ) -> Result<HandlerConfig, HandlerFormError> {
        let api = self.api.as_ref();

        let board_label = board_options(api)
            .await?
            .get(&input.board)
            .map(str::to_string);
        if board_label.is_none() {
            warn!(board = %input.board, "Selected board is not among the member's boards");
        }

        let list_label = if board_label.is_some() {
            match board_list_options(api, &input.board).await {
                Ok(lists) => lists.get(&input.list).map(str::to_string),
                Err(e) if e.is_not_found() => None,
                Err(e) => return Err(e.into()),
            }
        } else {
            None
        };
        if list_label.is_none() {
            warn!(list = %input.list, "Selected list is not on the board");
        }

        let config = HandlerConfig {
            board: input.board,
            board_label,
            list: input.list,
            list_label,
            name: input.name,
            position: input.position,
            labels: input.labels,
            members: input.members,
            description: input.description,
            debug: input.debug,
        };

        self.handlers.save(form_id, &config).await?;
        info!(form_id, board = %config.board, list = %config.list, "Trello handler saved");
        Ok(config)
    }

    /// Detach the handler from a form.
    pub async fn delete(&self, form_id: &str) -> Result<bool, StoreError> {
        let deleted = self.handlers.delete(form_id).await?;
        if deleted {
            info!(form_id, "Trello handler removed");
        }
        Ok(deleted)
    }
}
