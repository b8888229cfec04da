use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "studydock", version, about = "StudyDock CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pomodoro timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Calendar events
    Event {
        #[command(subcommand)]
        action: commands::event::EventAction,
    },
    /// Flashcards and review
    Card {
        #[command(subcommand)]
        action: commands::card::CardAction,
    },
    /// Subject management
    Subject {
        #[command(subcommand)]
        action: commands::subject::SubjectAction,
    },
    /// Points and study statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Bulk data operations
    Data {
        #[command(subcommand)]
        action: commands::data::DataAction,
    },
    /// Signed-in user
    User {
        #[command(subcommand)]
        action: commands::user::UserAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("STUDYDOCK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Task { action } => commands::task::run(action),
        Commands::Event { action } => commands::event::run(action),
        Commands::Card { action } => commands::card::run(action),
        Commands::Subject { action } => commands::subject::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Data { action } => commands::data::run(action),
        Commands::User { action } => commands::user::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
