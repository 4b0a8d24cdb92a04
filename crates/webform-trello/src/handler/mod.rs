//! The Trello form handler: per-form configuration, its settings form and
//! the submission action.

pub mod action;
pub mod config;
pub mod form;

pub use action::{ActionError, ActionReport, CardAction};
pub use config::{HandlerConfig, HandlerRepository, HANDLER_ID};
pub use form::{BoardOptions, HandlerConfigForm, HandlerFormError, HandlerFormService, HandlerInput};
