//! Form element and validation types shared by the admin and handler forms.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use trello::Options;

/// Field-level validation errors keyed by element name (e.g. `app[apikey]`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, String>);

impl FormErrors {
    /// Create an empty error set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the error of an element, replacing any earlier one.
    pub fn set(&mut self, element: impl Into<String>, message: impl Into<String>) {
        self.0.insert(element.into(), message.into());
    }

    /// Error of an element.
    #[must_use]
    pub fn get(&self, element: &str) -> Option<&str> {
        self.0.get(element).map(String::as_str)
    }

    /// No errors were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of elements with an error.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Record a "required" error when `value` is blank.
    pub fn require(&mut self, element: &str, title: &str, value: &str) {
        if value.trim().is_empty() {
            self.set(element, format!("{title} field is required."));
        }
    }

    /// `Ok(())` when empty, otherwise the errors.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<_> = self
            .0
            .iter()
            .map(|(element, message)| format!("{element}: {message}"))
            .collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for FormErrors {}

/// Single-line or multi-line text element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextField {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub value: String,
    pub required: bool,
    /// Visible rows for multi-line elements
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<u8>,
}

impl TextField {
    #[must_use]
    pub fn new(title: &str, value: &str) -> Self {
        Self {
            title: title.to_string(),
            description: None,
            value: value.to_string(),
            required: false,
            rows: None,
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn describe(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    #[must_use]
    pub fn multiline(mut self, rows: u8) -> Self {
        self.rows = Some(rows);
        self
    }
}

/// Select element; multiple selects carry several default values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectField {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub options: Options,
    pub value: Vec<String>,
    pub required: bool,
    pub multiple: bool,
    /// Label of the "nothing selected" option
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_option: Option<String>,
}

impl SelectField {
    /// Single-value select with a "- Select -" empty option.
    pub fn single(title: &str, options: Options, value: &str) -> Self {
        Self {
            title: title.to_string(),
            description: None,
            options,
            value: if value.is_empty() {
                vec![]
            } else {
                vec![value.to_string()]
            },
            required: false,
            multiple: false,
            empty_option: Some("- Select -".to_string()),
        }
    }

    /// Multi-value select.
    pub fn multiple(title: &str, options: Options, value: &[String]) -> Self {
        Self {
            title: title.to_string(),
            description: None,
            options,
            value: value.to_vec(),
            required: false,
            multiple: true,
            empty_option: None,
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn describe(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// Checkbox element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckboxField {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub value: bool,
}

impl CheckboxField {
    #[must_use]
    pub fn new(title: &str, value: bool) -> Self {
        Self {
            title: title.to_string(),
            description: None,
            value,
        }
    }

    #[must_use]
    pub fn describe(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}
