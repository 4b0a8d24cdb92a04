//! REST client for the Trello API.

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, error, instrument};

use crate::credentials::{CredentialProvider, Credentials};
use crate::error::TrelloError;
use crate::models::{Board, BoardList, BoardMember, Card, Label, Member, NewCard};

/// Trello API endpoint
pub const TRELLO_API_URL: &str = "https://api.trello.com/1";

type Result<T> = std::result::Result<T, TrelloError>;

/// Operations the form handler needs from Trello.
#[async_trait]
pub trait TrelloApi: Send + Sync {
    /// Check a key/token pair against `/members/me`.
    ///
    /// Empty arguments fall back to the provider's credentials. Returns
    /// `true` only for a 200 response; transport failures are logged and
    /// reported as `false`.
    async fn check_authorization(&self, key: &str, token: &str) -> bool;

    /// Get the member that owns the token.
    async fn get_me(&self) -> Result<Member>;

    /// Get all boards of the member.
    async fn get_boards(&self) -> Result<Vec<Board>>;

    /// Get a board by ID.
    async fn get_board(&self, board_id: &str) -> Result<Board>;

    /// Get the lists of a board.
    async fn get_board_lists(&self, board_id: &str) -> Result<Vec<BoardList>>;

    /// Get the labels of a board.
    async fn get_labels(&self, board_id: &str) -> Result<Vec<Label>>;

    /// Get the members of a board.
    async fn get_members(&self, board_id: &str) -> Result<Vec<BoardMember>>;

    /// Create a card in a list.
    async fn create_card(&self, id_list: &str, card: &NewCard) -> Result<Card>;
}

/// Trello REST client
#[derive(Clone)]
pub struct TrelloClient {
    client: reqwest::Client,
    api_url: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl std::fmt::Debug for TrelloClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrelloClient")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl TrelloClient {
    /// Create a client against the public Trello API.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built
    pub fn new(credentials: Arc<dyn CredentialProvider>) -> Result<Self> {
        Self::with_url(credentials, TRELLO_API_URL)
    }

    /// Create a client with a custom API URL (for tests and proxies).
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built
    pub fn with_url(credentials: Arc<dyn CredentialProvider>, api_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("webform-trello/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TrelloError::Client(e.to_string()))?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_url)
    }

    /// Send a request with credentials and extra query parameters, decode JSON.
    async fn request<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<R> {
        let credentials = self.credentials.credentials().await;

        let response = self
            .client
            .request(method, self.url(path))
            .query(&credentials.query())
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TrelloError::Status { status, body });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        self.request(Method::GET, path, &[]).await
    }
}

#[async_trait]
impl TrelloApi for TrelloClient {
    #[instrument(skip_all)]
    async fn check_authorization(&self, key: &str, token: &str) -> bool {
        let credentials = Credentials::new(key, token).or(self.credentials.credentials().await);

        match self
            .client
            .get(self.url("/members/me"))
            .query(&credentials.query())
            .send()
            .await
        {
            Ok(response) => {
                let status = response.status();
                debug!(%status, "Authorization check completed");
                status == StatusCode::OK
            }
            Err(e) => {
                error!(error = %e, "Authorization check failed");
                false
            }
        }
    }

    #[instrument(skip(self))]
    async fn get_me(&self) -> Result<Member> {
        self.get("/members/me").await
    }

    #[instrument(skip(self))]
    async fn get_boards(&self) -> Result<Vec<Board>> {
        let boards: Vec<Board> = self.get("/members/me/boards").await?;
        debug!(count = boards.len(), "Retrieved boards");
        Ok(boards)
    }

    #[instrument(skip(self), fields(board_id = %board_id))]
    async fn get_board(&self, board_id: &str) -> Result<Board> {
        self.get(&format!("/boards/{board_id}")).await
    }

    #[instrument(skip(self), fields(board_id = %board_id))]
    async fn get_board_lists(&self, board_id: &str) -> Result<Vec<BoardList>> {
        self.get(&format!("/boards/{board_id}/lists")).await
    }

    #[instrument(skip(self), fields(board_id = %board_id))]
    async fn get_labels(&self, board_id: &str) -> Result<Vec<Label>> {
        self.get(&format!("/boards/{board_id}/labels")).await
    }

    #[instrument(skip(self), fields(board_id = %board_id))]
    async fn get_members(&self, board_id: &str) -> Result<Vec<BoardMember>> {
        self.get(&format!("/boards/{board_id}/members")).await
    }

    #[instrument(skip(self, card), fields(id_list = %id_list, name = %card.name))]
    async fn create_card(&self, id_list: &str, card: &NewCard) -> Result<Card> {
        let created: Card = self
            .request(Method::POST, "/cards", &card.query(id_list))
            .await?;
        debug!(card_id = %created.id, "Created card");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let result = TrelloClient::new(Arc::new(Credentials::new("key", "token")));
        assert!(result.is_ok());
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client =
            TrelloClient::with_url(Arc::new(Credentials::default()), "http://localhost:1234/1/")
                .unwrap();
        assert_eq!(client.url("/cards"), "http://localhost:1234/1/cards");
    }

    #[test]
    fn test_debug_hides_credentials() {
        let client = TrelloClient::new(Arc::new(Credentials::new("secret", "token"))).unwrap();
        assert!(!format!("{client:?}").contains("secret"));
    }
}
