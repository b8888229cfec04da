use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Record;
use crate::timer::Phase;

/// A countdown that ran to zero. Written once per completion, never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroSession {
    pub id: String,
    /// Minutes.
    pub duration: u32,
    #[serde(rename = "type")]
    pub kind: Phase,
    pub completed_at: DateTime<Utc>,
}

impl PomodoroSession {
    pub fn is_focus(&self) -> bool {
        self.kind == Phase::Focus
    }
}

impl Record for PomodoroSession {
    fn id(&self) -> &str {
        &self.id
    }
}
