pub mod alarm;
pub mod history;
pub mod settings;
pub mod timer;
pub mod todo;
pub mod weight;

use std::{
    fmt::Display,
    io::{self, Write},
    path::PathBuf,
};

use ansi_term::Colour;
use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;

use crate::utils::{
    dir::create_application_default_path,
    logging::{enable_logging, CLI_PREFIX, WATCH_PREFIX},
};

#[derive(Parser, Debug)]
#[command(name = "Deskmate", version, long_about = None)]
#[command(
    about = "Personal desktop companion: stopwatch, todos, weight journal, and alarms",
    long_about = None
)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(
        long,
        help = "Data directory. By default saves into the per-user application-data directory"
    )]
    dir: Option<PathBuf>,
    #[arg(long, help = "Enable logging")]
    log: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Run the interactive stopwatch")]
    Timer,
    #[command(about = "Browse and edit recorded stopwatch sessions")]
    History {
        #[command(subcommand)]
        command: history::HistoryCommand,
    },
    #[command(about = "Manage the todo list")]
    Todo {
        #[command(subcommand)]
        command: todo::TodoCommand,
    },
    #[command(about = "Track weight records and the goal line")]
    Weight {
        #[command(subcommand)]
        command: weight::WeightCommand,
    },
    #[command(about = "Manage alarms. `alarm watch` keeps them ringing")]
    Alarm {
        #[command(subcommand)]
        command: alarm::AlarmCommand,
    },
    #[command(about = "Show or change widget settings")]
    Settings {
        #[command(subcommand)]
        command: settings::SettingsCommand,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let dir = match &args.dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            dir.clone()
        }
        None => create_application_default_path()?,
    };

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    let prefix = match &args.commands {
        Commands::Alarm {
            command: alarm::AlarmCommand::Watch,
        } => WATCH_PREFIX,
        _ => CLI_PREFIX,
    };
    enable_logging(prefix, &dir, logging_level, args.log)?;

    match args.commands {
        Commands::Timer => timer::process_timer_command(dir).await,
        Commands::History { command } => history::process_history_command(dir, command).await,
        Commands::Todo { command } => todo::process_todo_command(dir, command).await,
        Commands::Weight { command } => weight::process_weight_command(dir, command).await,
        Commands::Alarm { command } => alarm::process_alarm_command(dir, command).await,
        Commands::Settings { command } => settings::process_settings_command(dir, command).await,
    }
}

/// Asks before a destructive operation. `--yes` skips the question.
pub(crate) fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}

/// Non-fatal warning for rejected input. Nothing was mutated when this prints.
pub(crate) fn warn_user(message: impl Display) {
    println!("{}", Colour::Yellow.paint(format!("warning: {message}")));
}

/// Collaborator failure. The triggering setting keeps its previous state.
pub(crate) fn report_platform_error(message: impl Display) {
    println!("{}", Colour::Red.paint(format!("error: {message}")));
}
