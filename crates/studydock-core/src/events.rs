use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::PomodoroSession;
use crate::timer::Phase;

/// Every engine state change in [`crate::StudyContext`] produces an Event.
/// Timestamps come from the context's clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// A countdown reached zero and the session was logged.
    SessionCompleted {
        session: PomodoroSession,
        points_awarded: u64,
        next_phase: Phase,
        at: DateTime<Utc>,
    },
    DurationsChanged {
        focus_min: u32,
        break_min: u32,
        at: DateTime<Utc>,
    },
    ReviewStarted {
        card_id: String,
        at: DateTime<Utc>,
    },
    AnswerRevealed {
        card_id: String,
        at: DateTime<Utc>,
    },
    /// `scored` is false when the card was deleted before grading.
    CardGraded {
        card_id: String,
        correct: bool,
        scored: bool,
        at: DateTime<Utc>,
    },
    ReviewStopped {
        card_id: String,
        at: DateTime<Utc>,
    },
    DataWiped {
        summary: WipeSummary,
        at: DateTime<Utc>,
    },
}

/// Record counts removed by a wipe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WipeSummary {
    pub tasks: usize,
    pub sessions: usize,
    pub events: usize,
    pub flashcards: usize,
    pub subjects: usize,
    pub points: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let event = Event::TimerReset {
            phase: Phase::Break,
            remaining_secs: 300,
            at: "2024-03-01T10:00:00Z".parse().unwrap(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "timer_reset");
        assert_eq!(json["phase"], "break");
    }
}
