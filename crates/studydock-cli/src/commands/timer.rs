use std::time::Duration;

use clap::Subcommand;
use serde::Serialize;
use studydock_core::timer::parse_minutes;
use studydock_core::{Event, Phase, TimerSnapshot};
use tracing::warn;

use super::{open_context, print_json, CmdResult, Context};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start or resume the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Stop and reload the current phase
    Reset,
    /// Print current timer state as JSON
    Status,
    /// Apply one-second ticks right away
    Tick {
        /// Number of ticks
        #[arg(default_value = "1")]
        count: u32,
    },
    /// Count down live until the phase ends or Ctrl-C
    Run,
    /// Show or change phase lengths (minutes)
    Durations {
        /// Focus length, 1-60
        #[arg(long)]
        focus: Option<String>,
        /// Break length, 1-30
        #[arg(long = "break")]
        brk: Option<String>,
    },
}

#[derive(Serialize)]
struct TimerReport {
    events: Vec<Event>,
    timer: TimerSnapshot,
}

fn report(ctx: &Context, events: Vec<Event>) -> CmdResult {
    print_json(&TimerReport {
        events,
        timer: ctx.timer_snapshot(),
    })
}

fn set_minutes(ctx: &mut Context, phase: Phase, input: &str) -> Option<Event> {
    let Some(minutes) = parse_minutes(input) else {
        warn!(phase = phase.as_str(), input, "not a positive number of minutes");
        return None;
    };
    ctx.set_timer_duration(phase, minutes)
}

pub fn run(action: TimerAction) -> CmdResult {
    let (mut ctx, caught_up) = open_context()?;
    let mut events: Vec<Event> = caught_up.into_iter().collect();

    match action {
        TimerAction::Start => events.extend(ctx.start_timer()),
        TimerAction::Pause => events.extend(ctx.pause_timer()),
        TimerAction::Reset => events.push(ctx.reset_timer()),
        TimerAction::Status => {}
        TimerAction::Tick { count } => {
            for _ in 0..count {
                events.extend(ctx.tick());
            }
        }
        TimerAction::Run => {
            events.extend(ctx.start_timer());
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let done = runtime.block_on(ctx.run_timer(
                Duration::from_secs(1),
                tokio::signal::ctrl_c(),
                |snap| eprint!("\r{:<5} {}", snap.phase.as_str(), snap.display),
            ));
            eprintln!();
            events.extend(done);
        }
        TimerAction::Durations { focus, brk } => {
            if let Some(input) = focus {
                events.extend(set_minutes(&mut ctx, Phase::Focus, &input));
            }
            if let Some(input) = brk {
                events.extend(set_minutes(&mut ctx, Phase::Break, &input));
            }
        }
    }

    report(&ctx, events)
}
