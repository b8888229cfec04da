use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Record;

pub const DEFAULT_SUBJECT_COLOR: &str = "#3B82F6";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl Record for Subject {
    fn id(&self) -> &str {
        &self.id
    }
}
