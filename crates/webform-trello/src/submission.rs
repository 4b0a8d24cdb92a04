//! Form submissions handed to the Trello handler.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;

/// A submitted form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    /// Submission id
    pub id: Uuid,
    /// Form the submission belongs to
    pub form_id: String,
    /// When the form was submitted
    pub created: DateTime<Utc>,
    /// Submitted element values keyed by element name
    pub values: Map<String, Value>,
}

impl Submission {
    /// New submission received now.
    #[must_use]
    pub fn new(form_id: impl Into<String>, values: Map<String, Value>) -> Self {
        Self {
            id: Uuid::new_v4(),
            form_id: form_id.into(),
            created: Utc::now(),
            values,
        }
    }

    /// Context card templates are rendered against.
    ///
    /// Placeholders available: `{{values.<element>}}`, `{{submission.id}}`,
    /// `{{submission.created}}` and `{{webform.id}}`.
    #[must_use]
    pub fn template_context(&self) -> Value {
        json!({
            "values": self.values,
            "submission": {
                "id": self.id.to_string(),
                "created": self.created.to_rfc3339(),
            },
            "webform": {
                "id": self.form_id,
            },
        })
    }
}
