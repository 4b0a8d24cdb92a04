//! Create Trello cards from web form submissions.
//!
//! This crate provides:
//! - A config store for the global Trello settings and per-form handlers
//! - The admin settings form (API key, token, default card text)
//! - The per-form handler form with live board/list/label/member options
//! - Card template rendering and description sanitizing
//! - The submission action that creates one card per submission
//! - HTTP server exposing all of the above (standalone service)

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Store and API failures everywhere

pub mod admin;
pub mod config;
pub mod forms;
pub mod handler;
pub mod sanitize;
pub mod server;
pub mod settings;
pub mod store;
pub mod submission;
pub mod template;

#[cfg(test)]
mod test_support;

pub use admin::AdminConfigService;
pub use config::Config;
pub use handler::{CardAction, HandlerConfig, HandlerFormService, HandlerRepository};
pub use settings::{SettingsRepository, TrelloSettings};
pub use store::{ConfigStore, FileConfigStore, MemoryConfigStore};
pub use submission::Submission;
