//! In-memory Trello fake for unit tests.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::Mutex;
use trello::{
    Board, BoardList, BoardMember, Card, Label, Member, NewCard, TrelloApi, TrelloError,
};

#[derive(Default)]
pub struct FakeTrello {
    credentials: Option<(String, String)>,
    boards: Vec<Board>,
    lists: HashMap<String, Vec<BoardList>>,
    labels: HashMap<String, Vec<Label>>,
    members: HashMap<String, Vec<BoardMember>>,
    fail_create: bool,
    calls: Mutex<Vec<String>>,
    created: Mutex<Vec<(String, NewCard)>>,
}

impl FakeTrello {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(mut self, key: &str, token: &str) -> Self {
        self.credentials = Some((key.to_string(), token.to_string()));
        self
    }

    pub fn with_board(mut self, id: &str, name: &str) -> Self {
        self.boards.push(Board {
            id: id.to_string(),
            name: name.to_string(),
            desc: None,
            closed: false,
            url: None,
        });
        self
    }

    pub fn with_list(mut self, board: &str, id: &str, name: &str) -> Self {
        self.lists.entry(board.to_string()).or_default().push(BoardList {
            id: id.to_string(),
            name: name.to_string(),
            closed: false,
            id_board: Some(board.to_string()),
        });
        self
    }

    pub fn with_label(mut self, board: &str, id: &str, name: &str) -> Self {
        self.labels.entry(board.to_string()).or_default().push(Label {
            id: id.to_string(),
            name: name.to_string(),
            color: None,
        });
        self
    }

    pub fn with_member(mut self, board: &str, id: &str, full_name: &str) -> Self {
        self.members
            .entry(board.to_string())
            .or_default()
            .push(BoardMember {
                id: id.to_string(),
                full_name: full_name.to_string(),
                username: String::new(),
            });
        self
    }

    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    /// Names of the API methods called so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Cards passed to `create_card`, with their list ids.
    pub fn created(&self) -> Vec<(String, NewCard)> {
        self.created.lock().unwrap().clone()
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    fn board_missing(&self, board_id: &str) -> Option<TrelloError> {
        (!self.boards.iter().any(|b| b.id == board_id)).then(|| TrelloError::Status {
            status: StatusCode::NOT_FOUND,
            body: "The requested resource was not found.".to_string(),
        })
    }
}

#[async_trait]
impl TrelloApi for FakeTrello {
    async fn check_authorization(&self, key: &str, token: &str) -> bool {
        self.record("check_authorization");
        self.credentials
            .as_ref()
            .is_some_and(|(k, t)| k == key && t == token)
    }

    async fn get_me(&self) -> Result<Member, TrelloError> {
        self.record("get_me");
        Ok(Member {
            id: "me".to_string(),
            username: "fake".to_string(),
            full_name: "Fake Member".to_string(),
        })
    }

    async fn get_boards(&self) -> Result<Vec<Board>, TrelloError> {
        self.record("get_boards");
        Ok(self.boards.clone())
    }

    async fn get_board(&self, board_id: &str) -> Result<Board, TrelloError> {
        self.record("get_board");
        if let Some(e) = self.board_missing(board_id) {
            return Err(e);
        }
        Ok(self
            .boards
            .iter()
            .find(|b| b.id == board_id)
            .cloned()
            .unwrap())
    }

    async fn get_board_lists(&self, board_id: &str) -> Result<Vec<BoardList>, TrelloError> {
        self.record("get_board_lists");
        if let Some(e) = self.board_missing(board_id) {
            return Err(e);
        }
        Ok(self.lists.get(board_id).cloned().unwrap_or_default())
    }

    async fn get_labels(&self, board_id: &str) -> Result<Vec<Label>, TrelloError> {
        self.record("get_labels");
        if let Some(e) = self.board_missing(board_id) {
            return Err(e);
        }
        Ok(self.labels.get(board_id).cloned().unwrap_or_default())
    }

    async fn get_members(&self, board_id: &str) -> Result<Vec<BoardMember>, TrelloError> {
        self.record("get_members");
        if let Some(e) = self.board_missing(board_id) {
            return Err(e);
        }
        Ok(self.members.get(board_id).cloned().unwrap_or_default())
    }

    async fn create_card(&self, id_list: &str, card: &NewCard) -> Result<Card, TrelloError> {
        self.record("create_card");
        if self.fail_create {
            return Err(TrelloError::Status {
                status: StatusCode::BAD_REQUEST,
                body: "invalid value for idList".to_string(),
            });
        }
        self.created
            .lock()
            .unwrap()
            .push((id_list.to_string(), card.clone()));
        Ok(Card {
            id: format!("card-{}", self.created.lock().unwrap().len()),
            name: card.name.clone(),
            desc: Some(card.desc.clone()),
            id_list: Some(id_list.to_string()),
            id_board: None,
            url: None,
            short_url: None,
        })
    }
}
