//! Pomodoro engine implementation.
//!
//! The engine is a tick-driven state machine with two orthogonal axes:
//! the [`Phase`] being counted down and the [`Motion`] of the countdown.
//! It owns no thread or timer; the caller advances it with `tick()`, one
//! call per elapsed second.
//!
//! ## State Transitions
//!
//! ```text
//! (phase, Stopped) --start--> (phase, Running)
//! (phase, Running) --pause--> (phase, Stopped)
//! (phase, *)       --reset--> (phase, Stopped), remaining reloaded
//! (phase, Running) --tick at 1s left--> (phase.opposite(), Stopped)
//! ```
//!
//! The engine halts at every phase boundary; the next phase needs an
//! explicit `start`.

use serde::{Deserialize, Serialize};

use super::durations::{Phase, TimerDurations};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Motion {
    Stopped,
    Running,
}

/// Emitted by [`PomodoroEngine::tick`] when a countdown reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseCompletion {
    /// Phase that just ended.
    pub phase: Phase,
    /// Configured minutes of the phase that just ended.
    pub duration_min: u32,
    /// Phase now loaded (stopped) in the engine.
    pub next_phase: Phase,
}

/// Read-only view of the engine for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub phase: Phase,
    pub motion: Motion,
    pub remaining_secs: u64,
    pub total_secs: u64,
    pub display: String,
    pub progress: f64,
    pub focus_min: u32,
    pub break_min: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroEngine {
    durations: TimerDurations,
    phase: Phase,
    motion: Motion,
    /// Seconds left in the current phase.
    remaining_secs: u64,
}

impl PomodoroEngine {
    /// Stopped at the start of a Focus phase.
    pub fn new(durations: TimerDurations) -> Self {
        Self {
            durations,
            phase: Phase::Focus,
            motion: Motion::Stopped,
            remaining_secs: durations.secs(Phase::Focus),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn motion(&self) -> Motion {
        self.motion
    }

    pub fn is_running(&self) -> bool {
        self.motion == Motion::Running
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn durations(&self) -> TimerDurations {
        self.durations
    }

    pub fn total_secs(&self) -> u64 {
        self.durations.secs(self.phase)
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_secs as f64 / total as f64)
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.phase,
            motion: self.motion,
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs(),
            display: format_mm_ss(self.remaining_secs),
            progress: self.progress(),
            focus_min: self.durations.focus_min(),
            break_min: self.durations.break_min(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Returns `false` if already running.
    pub fn start(&mut self) -> bool {
        match self.motion {
            Motion::Running => false,
            Motion::Stopped => {
                self.motion = Motion::Running;
                true
            }
        }
    }

    /// Returns `false` if not running. Remaining time is kept as is.
    pub fn pause(&mut self) -> bool {
        match self.motion {
            Motion::Running => {
                self.motion = Motion::Stopped;
                true
            }
            Motion::Stopped => false,
        }
    }

    /// Stop and reload the current phase's configured duration.
    pub fn reset(&mut self) {
        self.motion = Motion::Stopped;
        self.remaining_secs = self.durations.secs(self.phase);
    }

    /// Change a phase duration. Ignored while running and for values
    /// outside the allowed range; returns whether the value was adopted.
    ///
    /// A phase that has not been started yet picks the new length up
    /// immediately; a partially elapsed countdown is capped at it.
    pub fn set_duration(&mut self, phase: Phase, minutes: u32) -> bool {
        if self.is_running() {
            return false;
        }
        let untouched = self.remaining_secs == self.durations.secs(self.phase);
        if !self.durations.set(phase, minutes) {
            return false;
        }
        if phase == self.phase {
            let total = self.durations.secs(phase);
            self.remaining_secs = if untouched {
                total
            } else {
                self.remaining_secs.min(total)
            };
        }
        true
    }

    /// Advance by one second. Returns the completion when the countdown
    /// hits zero.
    pub fn tick(&mut self) -> Option<PhaseCompletion> {
        if self.motion != Motion::Running || self.remaining_secs == 0 {
            return None;
        }
        self.remaining_secs -= 1;
        if self.remaining_secs > 0 {
            return None;
        }
        Some(self.complete())
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete(&mut self) -> PhaseCompletion {
        let ended = self.phase;
        let duration_min = self.durations.minutes(ended);
        self.phase = ended.opposite();
        self.remaining_secs = self.durations.secs(self.phase);
        self.motion = Motion::Stopped;
        PhaseCompletion {
            phase: ended,
            duration_min,
            next_phase: self.phase,
        }
    }
}

impl Default for PomodoroEngine {
    fn default() -> Self {
        Self::new(TimerDurations::default())
    }
}

/// `MM:SS`, minutes not capped at 59.
pub fn format_mm_ss(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn run_ticks(engine: &mut PomodoroEngine, n: u64) -> Vec<PhaseCompletion> {
        (0..n).filter_map(|_| engine.tick()).collect()
    }

    #[test]
    fn start_pause_start() {
        let mut engine = PomodoroEngine::default();
        assert_eq!(engine.motion(), Motion::Stopped);

        assert!(engine.start());
        assert!(!engine.start());
        assert_eq!(engine.motion(), Motion::Running);

        run_ticks(&mut engine, 10);
        assert!(engine.pause());
        assert!(!engine.pause());
        assert_eq!(engine.remaining_secs(), 1490);

        run_ticks(&mut engine, 10);
        assert_eq!(engine.remaining_secs(), 1490);
    }

    #[test]
    fn full_focus_countdown_completes_once() {
        let mut engine = PomodoroEngine::new(TimerDurations::new(25, 5));
        engine.start();
        let done = run_ticks(&mut engine, 1500);
        assert_eq!(
            done,
            vec![PhaseCompletion {
                phase: Phase::Focus,
                duration_min: 25,
                next_phase: Phase::Break,
            }]
        );
        assert_eq!(engine.phase(), Phase::Break);
        assert_eq!(engine.remaining_secs(), 300);
        assert_eq!(engine.motion(), Motion::Stopped);
    }

    #[test]
    fn does_not_auto_chain_into_break() {
        let mut engine = PomodoroEngine::new(TimerDurations::new(1, 1));
        engine.start();
        run_ticks(&mut engine, 60);
        assert!(run_ticks(&mut engine, 120).is_empty());
        assert_eq!(engine.remaining_secs(), 60);
    }

    #[test]
    fn reset_reloads_current_phase() {
        let mut engine = PomodoroEngine::new(TimerDurations::new(1, 2));
        engine.start();
        run_ticks(&mut engine, 60);
        assert_eq!(engine.phase(), Phase::Break);
        engine.start();
        run_ticks(&mut engine, 30);
        engine.reset();
        assert_eq!(engine.phase(), Phase::Break);
        assert_eq!(engine.remaining_secs(), 120);
        assert_eq!(engine.motion(), Motion::Stopped);
    }

    #[test]
    fn durations_locked_while_running() {
        let mut engine = PomodoroEngine::default();
        engine.start();
        run_ticks(&mut engine, 5);
        assert!(!engine.set_duration(Phase::Focus, 10));
        assert!(!engine.set_duration(Phase::Break, 10));
        assert_eq!(engine.durations(), TimerDurations::default());
        assert_eq!(engine.remaining_secs(), 1495);
    }

    #[test]
    fn editing_untouched_phase_reloads_remaining() {
        let mut engine = PomodoroEngine::default();
        assert!(engine.set_duration(Phase::Focus, 50));
        assert_eq!(engine.remaining_secs(), 3000);
        assert!(engine.set_duration(Phase::Break, 10));
        assert_eq!(engine.remaining_secs(), 3000);
    }

    #[test]
    fn editing_partial_phase_caps_remaining() {
        let mut engine = PomodoroEngine::default();
        engine.start();
        run_ticks(&mut engine, 100);
        engine.pause();
        assert!(engine.set_duration(Phase::Focus, 10));
        assert_eq!(engine.remaining_secs(), 600);
        assert_eq!(engine.phase(), Phase::Focus);
    }

    #[test]
    fn invalid_duration_keeps_previous() {
        let mut engine = PomodoroEngine::default();
        assert!(!engine.set_duration(Phase::Focus, 0));
        assert_eq!(engine.durations().focus_min(), 25);
        assert_eq!(engine.remaining_secs(), 1500);
    }

    #[test]
    fn snapshot_formats_display() {
        let mut engine = PomodoroEngine::default();
        engine.start();
        run_ticks(&mut engine, 61);
        let snap = engine.snapshot();
        assert_eq!(snap.display, "23:59");
        assert_eq!(snap.total_secs, 1500);
        assert!(snap.progress > 0.0 && snap.progress < 1.0);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Start,
        Pause,
        Reset,
        Tick(u16),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Start),
            Just(Op::Pause),
            Just(Op::Reset),
            (1u16..400).prop_map(Op::Tick),
        ]
    }

    proptest! {
        #[test]
        fn remaining_stays_within_configured(
            focus in 1u32..=3,
            brk in 1u32..=3,
            ops in proptest::collection::vec(op(), 0..60),
        ) {
            let mut engine = PomodoroEngine::new(TimerDurations::new(focus, brk));
            for op in ops {
                match op {
                    Op::Start => { engine.start(); }
                    Op::Pause => { engine.pause(); }
                    Op::Reset => engine.reset(),
                    Op::Tick(n) => { run_ticks(&mut engine, u64::from(n)); }
                }
                prop_assert!(engine.remaining_secs() <= engine.total_secs());
                prop_assert!(engine.remaining_secs() > 0);
            }
        }

        #[test]
        fn completions_alternate_phase(
            starts in 1usize..12,
        ) {
            let mut engine = PomodoroEngine::new(TimerDurations::new(1, 1));
            let mut expected = Phase::Focus;
            for _ in 0..starts {
                engine.start();
                let done = run_ticks(&mut engine, 60);
                prop_assert_eq!(done.len(), 1);
                prop_assert_eq!(done[0].phase, expected);
                prop_assert_eq!(done[0].next_phase, expected.opposite());
                expected = expected.opposite();
            }
        }
    }
}
