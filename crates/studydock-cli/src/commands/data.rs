use clap::Subcommand;

use super::{open_context, print_json, CmdResult};

#[derive(Subcommand)]
pub enum DataAction {
    /// Delete all tasks, sessions, events, flashcards, subjects and points
    Wipe {
        /// Confirm the wipe
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: DataAction) -> CmdResult {
    match action {
        DataAction::Wipe { yes } => {
            if !yes {
                return Err("refusing to wipe study data without --yes".into());
            }
            let (mut ctx, _) = open_context()?;
            print_json(&ctx.wipe())?;
        }
    }
    Ok(())
}
