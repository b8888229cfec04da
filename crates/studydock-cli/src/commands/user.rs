use clap::Subcommand;
use serde_json::json;
use studydock_core::UserProfile;

use super::{open_context, print_json, CmdResult};

#[derive(Subcommand)]
pub enum UserAction {
    /// Sign in as a user
    Login {
        email: String,
        /// Display name (default: the part of the email before '@')
        #[arg(long)]
        name: Option<String>,
        /// Newly created account; starts from empty study data
        #[arg(long)]
        new: bool,
    },
    /// Sign out, keeping study data
    Logout,
    /// Print the signed-in user
    Whoami,
}

pub fn run(action: UserAction) -> CmdResult {
    let (mut ctx, _) = open_context()?;

    match action {
        UserAction::Login { email, name, new } => {
            let email = email.trim().to_string();
            if email.is_empty() {
                return Err("email must not be blank".into());
            }
            let name = name.unwrap_or_else(|| {
                email.split('@').next().unwrap_or_default().to_string()
            });
            let wiped = ctx.sign_in(UserProfile {
                email,
                name,
                is_new_user: new,
            });
            print_json(&json!({ "user": ctx.current_user(), "event": wiped }))?;
        }
        UserAction::Logout => {
            let user = ctx.sign_out().ok_or("not signed in")?;
            print_json(&json!({ "signedOut": user }))?;
        }
        UserAction::Whoami => print_json(&ctx.current_user())?,
    }
    Ok(())
}
