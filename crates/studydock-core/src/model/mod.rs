//! Study data owned by the current user.
//!
//! Each entity type lives in a [`Collection`] that mirrors one stored JSON
//! array. Documents use camelCase field names.

mod calendar;
mod collection;
mod flashcard;
mod session;
mod subject;
mod task;

pub use calendar::CalendarEvent;
pub use collection::{Collection, Record};
pub use flashcard::{Flashcard, DEFAULT_FLASHCARD_SUBJECT};
pub use session::PomodoroSession;
pub use subject::{Subject, DEFAULT_SUBJECT_COLOR};
pub use task::Task;

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Trimmed text, or `None` when nothing is left.
pub(crate) fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
