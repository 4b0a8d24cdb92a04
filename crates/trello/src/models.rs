//! Trello entity type definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The member that owns the token (`/members/me`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Unique identifier
    pub id: String,
    /// Login name
    #[serde(default)]
    pub username: String,
    /// Display name
    #[serde(default)]
    pub full_name: String,
}

/// Trello board
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    /// Unique identifier
    pub id: String,
    /// Board name
    pub name: String,
    /// Board description
    #[serde(default)]
    pub desc: Option<String>,
    /// Whether the board is archived
    #[serde(default)]
    pub closed: bool,
    /// URL to the board
    #[serde(default)]
    pub url: Option<String>,
}

/// A list (column) on a board
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardList {
    /// Unique identifier
    pub id: String,
    /// List name
    pub name: String,
    /// Whether the list is archived
    #[serde(default)]
    pub closed: bool,
    /// Board the list belongs to
    #[serde(default)]
    pub id_board: Option<String>,
}

/// A label defined on a board
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    /// Unique identifier
    pub id: String,
    /// Label name (Trello allows unnamed, color-only labels)
    #[serde(default)]
    pub name: String,
    /// Label color
    #[serde(default)]
    pub color: Option<String>,
}

/// A member of a board
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardMember {
    /// Unique identifier
    pub id: String,
    /// Display name
    #[serde(default)]
    pub full_name: String,
    /// Login name
    #[serde(default)]
    pub username: String,
}

/// Card position within its list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardPosition {
    /// Created at the top of the list
    #[default]
    Top,
    /// Created at the bottom of the list
    Bottom,
}

impl CardPosition {
    /// Value sent as the `pos` query parameter.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }
}

impl fmt::Display for CardPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            other => Err(format!("invalid card position: {other} (expected top or bottom)")),
        }
    }
}

/// Input for creating a card
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCard {
    /// Card title
    pub name: String,
    /// Card description
    pub desc: String,
    /// Position in the list
    pub pos: CardPosition,
    /// Labels to attach
    pub id_labels: Vec<String>,
    /// Members to assign
    pub id_members: Vec<String>,
}

impl NewCard {
    /// Create a card input with a title and description.
    #[must_use]
    pub fn new(name: impl Into<String>, desc: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            desc: desc.into(),
            ..Self::default()
        }
    }

    /// Set the position.
    #[must_use]
    pub fn with_position(mut self, pos: CardPosition) -> Self {
        self.pos = pos;
        self
    }

    /// Set the label ids.
    #[must_use]
    pub fn with_labels(mut self, id_labels: Vec<String>) -> Self {
        self.id_labels = id_labels;
        self
    }

    /// Set the member ids.
    #[must_use]
    pub fn with_members(mut self, id_members: Vec<String>) -> Self {
        self.id_members = id_members;
        self
    }

    /// Query parameters for `POST /cards`, minus the credentials.
    ///
    /// Label and member ids are sent comma-joined; an empty set is sent as an
    /// empty string.
    #[must_use]
    pub fn query(&self, id_list: &str) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("desc", self.desc.clone()),
            ("pos", self.pos.as_str().to_string()),
            ("idList", id_list.to_string()),
            ("idMembers", self.id_members.join(",")),
            ("idLabels", self.id_labels.join(",")),
        ]
    }
}

/// Trello card
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Unique identifier
    pub id: String,
    /// Card title
    #[serde(default)]
    pub name: String,
    /// Card description
    #[serde(default)]
    pub desc: Option<String>,
    /// List the card is in
    #[serde(default)]
    pub id_list: Option<String>,
    /// Board the card is on
    #[serde(default)]
    pub id_board: Option<String>,
    /// URL to the card
    #[serde(default)]
    pub url: Option<String>,
    /// Short URL to the card
    #[serde(default)]
    pub short_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_query_joins_ids() {
        let card = NewCard::new("Bug", "<b>desc</b>")
            .with_labels(vec!["L1".to_string(), "L2".to_string()])
            .with_members(vec![]);
        let query = card.query("list-1");

        assert!(query.contains(&("idLabels", "L1,L2".to_string())));
        assert!(query.contains(&("idMembers", String::new())));
        assert!(query.contains(&("idList", "list-1".to_string())));
        assert!(query.contains(&("pos", "top".to_string())));
    }

    #[test]
    fn test_position_parsing() {
        assert_eq!("bottom".parse::<CardPosition>(), Ok(CardPosition::Bottom));
        assert_eq!("TOP".parse::<CardPosition>(), Ok(CardPosition::Top));
        assert!("middle".parse::<CardPosition>().is_err());
    }

    #[test]
    fn test_board_member_deserialize() {
        let json = r#"{"id": "m1", "fullName": "Ada Lovelace", "username": "ada"}"#;
        let member: BoardMember = serde_json::from_str(json).unwrap();
        assert_eq!(member.full_name, "Ada Lovelace");
    }

    #[test]
    fn test_card_deserialize_ignores_unknown_fields() {
        let json = r#"{
            "id": "c1",
            "name": "Bug",
            "desc": "details",
            "idList": "l1",
            "idBoard": "b1",
            "shortUrl": "https://trello.com/c/abc",
            "badges": {"votes": 0}
        }"#;
        let card: Card = serde_json::from_str(json).unwrap();
        assert_eq!(card.id, "c1");
        assert_eq!(card.id_list.as_deref(), Some("l1"));
        assert_eq!(card.short_url.as_deref(), Some("https://trello.com/c/abc"));
    }
}
