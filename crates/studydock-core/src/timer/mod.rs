mod durations;
mod engine;
mod ticker;

pub use durations::{
    parse_minutes, Phase, TimerDurations, DEFAULT_BREAK_MIN, DEFAULT_FOCUS_MIN, MAX_BREAK_MIN,
    MAX_FOCUS_MIN,
};
pub use engine::{format_mm_ss, Motion, PhaseCompletion, PomodoroEngine, TimerSnapshot};
pub use ticker::Ticker;
