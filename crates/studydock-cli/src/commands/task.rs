//! Task management commands for CLI.

use clap::Subcommand;
use serde_json::json;

use super::{not_found, open_context, print_json, CmdResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Add {
        /// Task title
        title: String,
        /// Subject name
        #[arg(long)]
        subject: Option<String>,
    },
    /// List tasks
    List {
        /// Only tasks not yet completed
        #[arg(long)]
        open: bool,
    },
    /// Flip a task between done and not done
    Toggle {
        /// Task ID
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
}

pub fn run(action: TaskAction) -> CmdResult {
    let (mut ctx, _) = open_context()?;

    match action {
        TaskAction::Add { title, subject } => {
            let task = ctx
                .add_task(&title, subject.as_deref())
                .ok_or("task title must not be blank")?;
            print_json(&task)?;
        }
        TaskAction::List { open } => {
            let tasks: Vec<_> = ctx.tasks().iter().filter(|t| !open || !t.completed).collect();
            print_json(&tasks)?;
        }
        TaskAction::Toggle { id } => {
            let completed = ctx.toggle_task(&id).ok_or_else(|| not_found("task", &id))?;
            print_json(&json!({ "id": id, "completed": completed }))?;
        }
        TaskAction::Delete { id } => {
            if !ctx.delete_task(&id) {
                return Err(not_found("task", &id));
            }
            print_json(&json!({ "deleted": id }))?;
        }
    }
    Ok(())
}
