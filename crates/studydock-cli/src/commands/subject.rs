use clap::Subcommand;
use serde_json::json;

use super::{not_found, open_context, print_json, CmdResult};

#[derive(Subcommand)]
pub enum SubjectAction {
    /// Create a subject
    Add {
        name: String,
        /// Display color (default: #3B82F6)
        #[arg(long)]
        color: Option<String>,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// List subjects
    List,
    /// Delete a subject
    Delete {
        /// Subject ID
        id: String,
    },
}

pub fn run(action: SubjectAction) -> CmdResult {
    let (mut ctx, _) = open_context()?;

    match action {
        SubjectAction::Add { name, color, notes } => {
            let subject = ctx
                .add_subject(&name, color.as_deref(), &notes)
                .ok_or("subject name must not be blank")?;
            print_json(&subject)?;
        }
        SubjectAction::List => print_json(ctx.subjects().as_slice())?,
        SubjectAction::Delete { id } => {
            if !ctx.delete_subject(&id) {
                return Err(not_found("subject", &id));
            }
            print_json(&json!({ "deleted": id }))?;
        }
    }
    Ok(())
}
