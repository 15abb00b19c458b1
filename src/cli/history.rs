use std::path::PathBuf;

use ansi_term::Style;
use anyhow::Result;
use chrono::{DateTime, Local};
use chrono_english::{parse_date_string, Dialect};
use clap::Subcommand;
use now::DateTimeNow;

use crate::{
    store::{entities::Session, json_store::JsonStore},
    utils::{
        clock::{Clock, DefaultClock},
        time::{date_heading, format_elapsed},
    },
};

use super::{confirm, warn_user};

#[derive(Debug, Subcommand)]
pub enum HistoryCommand {
    #[command(about = "List recorded sessions, newest first, grouped by day")]
    List {
        #[arg(
            short,
            long,
            help = "Only show sessions since this moment. Examples are \"yesterday\", \"1 hour ago\", \"15/03/2025\""
        )]
        since: Option<String>,
    },
    #[command(about = "Rename a session")]
    Rename { index: usize, name: String },
    #[command(about = "Delete a session")]
    Rm {
        index: usize,
        #[arg(long, help = "Skip the confirmation question")]
        yes: bool,
    },
}

pub async fn process_history_command(dir: PathBuf, command: HistoryCommand) -> Result<()> {
    let mut history = JsonStore::<Session>::open(&dir).await;

    match command {
        HistoryCommand::List { since } => {
            let since = match since.as_deref() {
                None => None,
                Some(text) => match parse_date_string(text, Local::now(), Dialect::Uk) {
                    Ok(parsed) => Some(parsed),
                    Err(_) => {
                        warn_user(format!("could not understand the date {text:?}"));
                        return Ok(());
                    }
                },
            };
            print_grouped(&history, since);
        }
        HistoryCommand::Rename { index, name } => {
            let Some(session) = history.get(index) else {
                warn_user(format!("no session #{index}"));
                return Ok(());
            };
            let mut renamed = session.clone();
            renamed.name = name;
            if let Err(e) = history.update(index, renamed, DefaultClock.time()).await {
                warn_user(e);
            }
        }
        HistoryCommand::Rm { index, yes } => {
            if confirm(&format!("Delete session #{index}?"), yes)?
                && history.remove(Some(index)).await.is_none()
            {
                warn_user(format!("no session #{index}"));
            }
        }
    }
    Ok(())
}

fn print_grouped(history: &JsonStore<Session>, since: Option<DateTime<Local>>) {
    if history.is_empty() {
        println!("No sessions recorded yet.");
        return;
    }

    let today_start = Local::now().beginning_of_day();
    let today_total: f64 = history
        .records()
        .iter()
        .filter(|session| session.start_time.with_timezone(&Local) >= today_start)
        .map(|session| session.duration)
        .sum();
    println!(
        "Today: {}",
        format_elapsed(chrono::Duration::milliseconds((today_total * 1000.0) as i64))
    );

    // Insertion order is chronological, so walking backwards gives newest-first; the day
    // heading changes whenever the calendar date does.
    let mut current_day = None;
    for (index, session) in history.records().iter().enumerate().rev() {
        if let Some(since) = since {
            if session.start_time.with_timezone(&Local) < since {
                continue;
            }
        }
        let day = session.day();
        if current_day != Some(day) {
            println!("{}", Style::new().bold().paint(date_heading(day)));
            current_day = Some(day);
        }
        println!(
            "  #{index} {}  {} - {}  ({})",
            session.name,
            session.start_time.with_timezone(&Local).format("%H:%M:%S"),
            session.end_time.with_timezone(&Local).format("%H:%M:%S"),
            format_elapsed(chrono::Duration::milliseconds(
                (session.duration * 1000.0) as i64
            )),
        );
    }
}
