use chrono::Local;
use clap::Subcommand;

use super::{open_context, print_json, CmdResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's stats, by local date
    Today,
    /// All-time totals
    Overview,
}

pub fn run(action: StatsAction) -> CmdResult {
    let (ctx, _) = open_context()?;

    match action {
        StatsAction::Today => {
            let now = ctx.now().with_timezone(&Local);
            print_json(&ctx.daily_stats_at(&now))?;
        }
        StatsAction::Overview => print_json(&ctx.overview())?,
    }
    Ok(())
}
