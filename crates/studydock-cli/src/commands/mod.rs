pub mod card;
pub mod config;
pub mod data;
pub mod event;
pub mod stats;
pub mod subject;
pub mod task;
pub mod timer;
pub mod user;

use std::error::Error;

use serde::Serialize;
use studydock_core::storage::data_dir;
use studydock_core::{Config, Event, SqliteStore, StudyContext, SystemClock};

pub type Context = StudyContext<SqliteStore, SystemClock>;

pub type CmdResult = Result<(), Box<dyn Error>>;

/// Open the configured database and bring a running timer up to date.
/// Returns the completion event if the timer finished a phase while no
/// command was running.
pub fn open_context() -> Result<(Context, Option<Event>), Box<dyn Error>> {
    let dir = data_dir()?;
    let config = Config::load_from(&dir)?;
    let store = SqliteStore::open(&config.database_path(&dir))?;
    let mut ctx = StudyContext::load_with(store, SystemClock, config.timer_durations());
    let caught_up = ctx.catch_up();
    Ok((ctx, caught_up))
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn not_found(kind: &str, id: &str) -> Box<dyn Error> {
    format!("no {kind} with id {id}").into()
}
