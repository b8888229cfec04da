use chrono::{NaiveDate, NaiveTime};
use clap::Subcommand;
use serde_json::json;

use super::{not_found, open_context, print_json, CmdResult};

#[derive(Subcommand)]
pub enum EventAction {
    /// Add a calendar event
    Add {
        /// Event title
        title: String,
        /// Day of the event (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        /// Time of day (HH:MM)
        #[arg(long, value_parser = parse_time)]
        time: Option<NaiveTime>,
        /// Free-form description
        #[arg(long)]
        description: Option<String>,
    },
    /// List events, optionally for one day
    List {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Delete an event
    Delete {
        /// Event ID
        id: String,
    },
}

fn parse_time(input: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(input, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(input, "%H:%M:%S"))
}

pub fn run(action: EventAction) -> CmdResult {
    let (mut ctx, _) = open_context()?;

    match action {
        EventAction::Add {
            title,
            date,
            time,
            description,
        } => {
            let event = ctx
                .add_event(&title, date, time, description.as_deref())
                .ok_or("event title must not be blank")?;
            print_json(&event)?;
        }
        EventAction::List { date } => match date {
            Some(date) => print_json(&ctx.events_on(date))?,
            None => print_json(ctx.calendar_events().as_slice())?,
        },
        EventAction::Delete { id } => {
            if !ctx.delete_event(&id) {
                return Err(not_found("event", &id));
            }
            print_json(&json!({ "deleted": id }))?;
        }
    }
    Ok(())
}
