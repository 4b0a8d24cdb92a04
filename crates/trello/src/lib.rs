//! Trello REST API client.
//!
//! This crate provides:
//! - An async client for the handful of Trello endpoints a form handler needs
//!   (current member, boards, lists, labels, members, card creation)
//! - The [`TrelloApi`] trait so callers can swap the client for a fake
//! - Option helpers that turn boards/lists/labels/members into ordered
//!   `id -> name` select options
//! - Type definitions for the Trello entities involved
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use trello::{Credentials, TrelloApi, TrelloClient};
//!
//! # async fn example() -> Result<(), trello::TrelloError> {
//! let client = TrelloClient::new(Arc::new(Credentials::new("key", "token")))?;
//! for board in client.get_boards().await? {
//!     println!("{}: {}", board.id, board.name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Authentication uses an API key and a token passed as query parameters on
//! every request. There is no caching, retry or pagination; every call goes
//! straight to the API.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Every API method can fail the same way

pub mod client;
pub mod credentials;
pub mod error;
pub mod models;
pub mod options;

pub use client::{TrelloApi, TrelloClient, TRELLO_API_URL};
pub use credentials::{CredentialProvider, Credentials};
pub use error::TrelloError;
pub use models::*;
pub use options::{
    board_label_options, board_list_options, board_member_options, board_options, Options,
};
