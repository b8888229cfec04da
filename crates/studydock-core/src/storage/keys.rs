/// Logical documents in the store, one JSON value each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Tasks,
    PomodoroSessions,
    CalendarEvents,
    Flashcards,
    Subjects,
    UserPoints,
    /// Reserved, nothing writes it.
    Badges,
    /// Reserved, nothing writes it.
    FocusSessions,
    CurrentUser,
    TimerState,
    ReviewState,
}

impl StoreKey {
    /// Everything a data wipe removes. The user pointer and engine state
    /// survive.
    pub const WIPE_SET: [StoreKey; 8] = [
        StoreKey::Tasks,
        StoreKey::PomodoroSessions,
        StoreKey::CalendarEvents,
        StoreKey::Flashcards,
        StoreKey::Subjects,
        StoreKey::UserPoints,
        StoreKey::Badges,
        StoreKey::FocusSessions,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StoreKey::Tasks => "studydock_tasks",
            StoreKey::PomodoroSessions => "studydock_pomodoro_stats",
            StoreKey::CalendarEvents => "studydock_calendar_events",
            StoreKey::Flashcards => "studydock_flashcards",
            StoreKey::Subjects => "studydock_subjects",
            StoreKey::UserPoints => "studydock_user_points",
            StoreKey::Badges => "studydock_badges",
            StoreKey::FocusSessions => "studydock_focus_sessions",
            StoreKey::CurrentUser => "studydock_current_user",
            StoreKey::TimerState => "studydock_pomodoro_timer",
            StoreKey::ReviewState => "studydock_flashcard_review",
        }
    }
}

impl std::fmt::Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
