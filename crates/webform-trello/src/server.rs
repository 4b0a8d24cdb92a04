//! HTTP server exposing the admin form, the handler form and submissions.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use trello::{TrelloApi, TrelloClient, TrelloError};

use crate::admin::{AdminConfigService, ADMIN_SETTINGS_PATH};
use crate::config::Config;
use crate::handler::config::handler_config_name;
use crate::handler::{
    CardAction, HandlerFormError, HandlerFormService, HandlerInput, HandlerRepository,
};
use crate::settings::{SettingsRepository, TrelloSettings};
use crate::store::{ConfigStore, FileConfigStore, StoreError};
use crate::submission::Submission;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Admin settings form.
    pub admin: Arc<AdminConfigService>,
    /// Per-form handler settings form.
    pub handler_form: Arc<HandlerFormService>,
    /// Attached handler configs.
    pub handlers: HandlerRepository,
    /// Submission action.
    pub action: Arc<CardAction>,
}

impl AppState {
    /// Wire the services over a config store and a Trello API.
    #[must_use]
    pub fn new(store: Arc<dyn ConfigStore>, api: Arc<dyn TrelloApi>) -> Self {
        let settings = SettingsRepository::new(store.clone());
        let handlers = HandlerRepository::new(store);
        Self {
            admin: Arc::new(AdminConfigService::new(api.clone(), settings.clone())),
            handler_form: Arc::new(HandlerFormService::new(
                api.clone(),
                settings,
                handlers.clone(),
            )),
            handlers,
            action: Arc::new(CardAction::new(api)),
        }
    }

    /// File-backed store and a Trello client reading credentials from it.
    pub fn from_config(config: &Config) -> Result<Self, TrelloError> {
        let store: Arc<dyn ConfigStore> = Arc::new(FileConfigStore::new(&config.config_dir));
        let settings = SettingsRepository::new(store.clone());
        let client = TrelloClient::with_url(Arc::new(settings), &config.api_url)?;
        Ok(Self::new(store, Arc::new(client)))
    }
}

/// Build the HTTP router.
pub fn build_router(state: AppState) -> Router {
    let handler_path = "/forms/{form_id}/handlers/trello";

    Router::new()
        .route(
            ADMIN_SETTINGS_PATH,
            get(get_admin_form).post(save_admin_form),
        )
        .route(
            handler_path,
            get(get_handler_form)
                .put(save_handler)
                .delete(delete_handler),
        )
        .route(
            &format!("{handler_path}/options"),
            get(get_board_options),
        )
        .route("/forms/{form_id}/submissions", post(submit_form))
        // Health check
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Errors returned by the HTTP handlers.
#[derive(Debug)]
pub enum ApiError {
    /// Config store failure (400 for bad form ids)
    Store(StoreError),
    /// Trello call failure
    Trello(TrelloError),
    /// Bad request parameters
    BadRequest(String),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl From<TrelloError> for ApiError {
    fn from(e: TrelloError) -> Self {
        Self::Trello(e)
    }
}

impl From<HandlerFormError> for ApiError {
    fn from(e: HandlerFormError) -> Self {
        match e {
            HandlerFormError::Store(e) => Self::Store(e),
            HandlerFormError::Trello(e) => Self::Trello(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Store(e @ StoreError::InvalidName(_)) => (StatusCode::BAD_REQUEST, e.to_string()),
            Self::Store(e) => {
                error!(error = %e, "Config store failure");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            Self::Trello(e) => {
                error!(error = %e, "Trello API call failed");
                (StatusCode::BAD_GATEWAY, e.to_string())
            }
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
        };

        (
            status,
            Json(json!({
                "status": "error",
                "error": message
            })),
        )
            .into_response()
    }
}

fn invalid(errors: &crate::forms::FormErrors) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({
            "status": "invalid",
            "errors": errors
        })),
    )
        .into_response()
}

// =========================================================================
// Admin settings
// =========================================================================

async fn get_admin_form(State(state): State<AppState>) -> Result<Response, ApiError> {
    let form = state.admin.build().await?;
    Ok(Json(form).into_response())
}

async fn save_admin_form(
    State(state): State<AppState>,
    Json(input): Json<TrelloSettings>,
) -> Result<Response, ApiError> {
    if let Err(errors) = state.admin.validate(&input).await {
        warn!(count = errors.len(), "Admin settings rejected");
        return Ok(invalid(&errors));
    }

    state.admin.submit(&input).await?;
    Ok(Json(json!({ "status": "saved" })).into_response())
}

// =========================================================================
// Handler settings
// =========================================================================

/// Board picked in the current request.
#[derive(Debug, Default, Deserialize)]
struct BoardQuery {
    #[serde(default)]
    board: Option<String>,
}

async fn get_handler_form(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
    Query(query): Query<BoardQuery>,
) -> Result<Response, ApiError> {
    handler_config_name(&form_id)?;

    let form = state
        .handler_form
        .build(&form_id, query.board.as_deref())
        .await?;
    Ok(Json(form).into_response())
}

/// Dependent refresh after the board selection changed.
async fn get_board_options(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
    Query(query): Query<BoardQuery>,
) -> Result<Response, ApiError> {
    handler_config_name(&form_id)?;

    let Some(board) = query.board.filter(|b| !b.is_empty()) else {
        return Err(ApiError::BadRequest("board query parameter is required".to_string()));
    };

    let options = state.handler_form.refresh(&board).await?;
    Ok(Json(options).into_response())
}

async fn save_handler(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
    Json(input): Json<HandlerInput>,
) -> Result<Response, ApiError> {
    handler_config_name(&form_id)?;

    if let Err(errors) = state.handler_form.validate(&input) {
        return Ok(invalid(&errors));
    }

    let config = state.handler_form.submit(&form_id, input).await?;
    Ok(Json(json!({
        "status": "saved",
        "handler": config
    }))
    .into_response())
}

async fn delete_handler(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
) -> Result<Response, ApiError> {
    if state.handler_form.delete(&form_id).await? {
        Ok(StatusCode::NO_CONTENT.into_response())
    } else {
        Ok((
            StatusCode::NOT_FOUND,
            Json(json!({
                "status": "error",
                "error": "No Trello handler attached to this form"
            })),
        )
            .into_response())
    }
}

// =========================================================================
// Submissions
// =========================================================================

/// Request body for a form submission.
#[derive(Debug, Deserialize)]
struct SubmissionRequest {
    #[serde(default)]
    values: Map<String, Value>,
}

/// Run the Trello handler for a submission.
///
/// A failed card creation does not reject the submission; the failure is
/// logged and reported in the response body.
async fn submit_form(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
    Json(request): Json<SubmissionRequest>,
) -> Result<Response, ApiError> {
    let Some(config) = state.handlers.load(&form_id).await? else {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(json!({
                "status": "error",
                "error": "No Trello handler attached to this form"
            })),
        )
            .into_response());
    };

    let submission = Submission::new(form_id, request.values);
    info!(form_id = %submission.form_id, submission_id = %submission.id, "Submission received");

    let body = match state.action.pre_save(&config, &submission).await {
        Ok(report) => json!({
            "status": "accepted",
            "submissionId": submission.id,
            "card": report.card,
            "messages": report.messages
        }),
        Err(e) => {
            error!(
                form_id = %submission.form_id,
                submission_id = %submission.id,
                error = %e,
                "Trello card was not created"
            );
            json!({
                "status": "accepted",
                "submissionId": submission.id,
                "card": null,
                "error": e.to_string()
            })
        }
    };

    Ok(Json(body).into_response())
}

/// Health check endpoint.
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "webform-trello"
    }))
}
