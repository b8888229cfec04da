//! # StudyDock Core Library
//!
//! Core logic for StudyDock, a personal study dashboard. The `studydock` CLI
//! is a thin shell over this crate.
//!
//! ## Architecture
//!
//! - **Pomodoro Engine**: A tick-driven Focus/Break countdown. The caller
//!   supplies ticks, either one per second from a live [`timer::Ticker`] or by
//!   catching up on wall-clock time.
//! - **Review Engine**: Show-question, reveal-answer, grade cycle over a
//!   randomly chosen flashcard.
//! - **Storage**: Write-through JSON documents in SQLite plus TOML
//!   configuration.
//! - **Stats**: Points and "today" aggregates derived from the collections.
//!
//! ## Key Components
//!
//! - [`StudyContext`]: Owns the user's data and both engines
//! - [`PomodoroEngine`]: Timer state machine
//! - [`ReviewEngine`]: Flashcard review state machine
//! - [`SqliteStore`]: Persistent key-value store
//! - [`Config`]: Application configuration management

pub mod clock;
pub mod context;
pub mod error;
pub mod events;
pub mod model;
pub mod review;
pub mod stats;
pub mod storage;
pub mod timer;
pub mod user;

pub use clock::{Clock, ManualClock, SystemClock};
pub use context::StudyContext;
pub use error::{ConfigError, CoreError, StoreError};
pub use events::{Event, WipeSummary};
pub use model::{CalendarEvent, Collection, Flashcard, PomodoroSession, Subject, Task};
pub use review::{ReviewEngine, ReviewState};
pub use stats::{DailyStats, Overview};
pub use storage::{Config, MemoryStore, SqliteStore, Store, StoreKey};
pub use timer::{Phase, PomodoroEngine, TimerDurations, TimerSnapshot};
pub use user::UserProfile;
