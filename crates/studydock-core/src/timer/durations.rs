use serde::{Deserialize, Serialize};

/// Which interval the timer is counting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Focus,
    Break,
}

impl Phase {
    pub fn opposite(self) -> Self {
        match self {
            Phase::Focus => Phase::Break,
            Phase::Break => Phase::Focus,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Focus => "focus",
            Phase::Break => "break",
        }
    }
}

pub const DEFAULT_FOCUS_MIN: u32 = 25;
pub const DEFAULT_BREAK_MIN: u32 = 5;
pub const MAX_FOCUS_MIN: u32 = 60;
pub const MAX_BREAK_MIN: u32 = 30;

/// Configured length of each phase, in minutes.
///
/// Values are always inside `1..=MAX_*_MIN`; rejected edits leave the last
/// valid value in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawDurations")]
pub struct TimerDurations {
    focus_min: u32,
    break_min: u32,
}

#[derive(Deserialize)]
struct RawDurations {
    focus_min: u32,
    break_min: u32,
}

impl From<RawDurations> for TimerDurations {
    fn from(raw: RawDurations) -> Self {
        Self::new(raw.focus_min, raw.break_min)
    }
}

impl TimerDurations {
    /// Build from raw minutes, falling back to the defaults for any value
    /// outside the allowed range.
    pub fn new(focus_min: u32, break_min: u32) -> Self {
        let mut durations = Self::default();
        durations.set(Phase::Focus, focus_min);
        durations.set(Phase::Break, break_min);
        durations
    }

    pub fn focus_min(&self) -> u32 {
        self.focus_min
    }

    pub fn break_min(&self) -> u32 {
        self.break_min
    }

    pub fn minutes(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Focus => self.focus_min,
            Phase::Break => self.break_min,
        }
    }

    pub fn secs(&self, phase: Phase) -> u64 {
        u64::from(self.minutes(phase)) * 60
    }

    pub fn max_minutes(phase: Phase) -> u32 {
        match phase {
            Phase::Focus => MAX_FOCUS_MIN,
            Phase::Break => MAX_BREAK_MIN,
        }
    }

    /// Returns `true` if `minutes` was adopted.
    pub fn set(&mut self, phase: Phase, minutes: u32) -> bool {
        if minutes == 0 || minutes > Self::max_minutes(phase) {
            return false;
        }
        match phase {
            Phase::Focus => self.focus_min = minutes,
            Phase::Break => self.break_min = minutes,
        }
        true
    }
}

impl Default for TimerDurations {
    fn default() -> Self {
        Self {
            focus_min: DEFAULT_FOCUS_MIN,
            break_min: DEFAULT_BREAK_MIN,
        }
    }
}

/// Parse user-entered minutes. Non-numeric and non-positive input yields
/// `None`.
pub fn parse_minutes(input: &str) -> Option<u32> {
    match input.trim().parse::<i64>() {
        Ok(n) if n > 0 => u32::try_from(n).ok(),
        _ => None,
    }
}
