use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Record;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    /// Name of the subject this task belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

impl Task {
    pub fn new(id: String, title: String, subject: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title,
            completed: false,
            created_at: now,
            subject,
        }
    }
}

impl Record for Task {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_document_shape() {
        let json = r#"{"id":"1","title":"Read ch.1","completed":true,"createdAt":"2024-03-01T10:00:00Z"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert!(task.completed);
        assert!(task.subject.is_none());
        let back = serde_json::to_value(&task).unwrap();
        assert!(back.get("subject").is_none());
        assert_eq!(back["createdAt"], "2024-03-01T10:00:00Z");
    }
}
