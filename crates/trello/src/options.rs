//! Select options built from live API calls.
//!
//! Each helper re-issues its read call; nothing is cached between calls.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::client::TrelloApi;
use crate::error::TrelloError;

/// Ordered `id -> display name` options, in the order the API returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options(IndexMap<String, String>);

impl Options {
    /// Create empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Display name for an id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&str> {
        self.0.get(id).map(String::as_str)
    }

    /// Whether the id is one of the options.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    /// Number of options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no options.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(id, name)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<'a> IntoIterator for &'a Options {
    type Item = (&'a String, &'a String);
    type IntoIter = indexmap::map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, String)> for Options {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Board options for the member.
pub async fn board_options<A: TrelloApi + ?Sized>(api: &A) -> Result<Options, TrelloError> {
    Ok(api
        .get_boards()
        .await?
        .into_iter()
        .map(|board| (board.id, board.name))
        .collect())
}

/// List options of a board.
pub async fn board_list_options<A: TrelloApi + ?Sized>(
    api: &A,
    board_id: &str,
) -> Result<Options, TrelloError> {
    Ok(api
        .get_board_lists(board_id)
        .await?
        .into_iter()
        .map(|list| (list.id, list.name))
        .collect())
}

/// Label options of a board.
pub async fn board_label_options<A: TrelloApi + ?Sized>(
    api: &A,
    board_id: &str,
) -> Result<Options, TrelloError> {
    Ok(api
        .get_labels(board_id)
        .await?
        .into_iter()
        .map(|label| (label.id, label.name))
        .collect())
}

/// Member options of a board, keyed by id with the full name as label.
pub async fn board_member_options<A: TrelloApi + ?Sized>(
    api: &A,
    board_id: &str,
) -> Result<Options, TrelloError> {
    Ok(api
        .get_members(board_id)
        .await?
        .into_iter()
        .map(|member| (member.id, member.full_name))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_keep_insertion_order() {
        let options: Options = vec![
            ("z".to_string(), "Last alphabetically".to_string()),
            ("a".to_string(), "First alphabetically".to_string()),
        ]
        .into_iter()
        .collect();

        let ids: Vec<_> = options.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["z", "a"]);
        assert_eq!(options.get("a"), Some("First alphabetically"));
    }

    #[test]
    fn test_options_iterate_by_reference() {
        let options: Options = vec![
            ("l2".to_string(), "Doing".to_string()),
            ("l1".to_string(), "Todo".to_string()),
        ]
        .into_iter()
        .collect();

        let mut names = Vec::new();
        for (_, name) in &options {
            names.push(name.as_str());
        }
        assert_eq!(names, vec!["Doing", "Todo"]);
    }

    #[test]
    fn test_options_serialize_as_object() {
        let options: Options = vec![("b1".to_string(), "Support".to_string())]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&options).unwrap();
        assert_eq!(json, r#"{"b1":"Support"}"#);
    }
}
