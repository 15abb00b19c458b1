use std::path::PathBuf;

use ansi_term::Style;
use anyhow::Result;
use chrono::{Local, NaiveDate};
use chrono_english::{parse_date_string, Dialect};
use clap::Subcommand;

use crate::{
    store::{
        chart::{target_label, weight_series},
        entities::WeightRecord,
        json_store::JsonStore,
        target::TargetStore,
    },
    utils::{
        clock::{Clock, DefaultClock},
        time::date_heading,
    },
};

use super::{confirm, warn_user};

#[derive(Debug, Subcommand)]
pub enum WeightCommand {
    #[command(about = "Record a weight")]
    Add {
        weight: String,
        #[arg(
            short,
            long,
            help = "Day of the record. Examples are \"yesterday\", \"15/03/2025\". Defaults to today"
        )]
        date: Option<String>,
        #[arg(short, long, default_value = "")]
        note: String,
    },
    #[command(about = "List records, newest first")]
    List,
    #[command(about = "Delete a record")]
    Rm {
        index: usize,
        #[arg(long, help = "Skip the confirmation question")]
        yes: bool,
    },
    #[command(about = "Print the series handed to the chart renderer")]
    Chart,
    #[command(subcommand, about = "Manage the goal value")]
    Target(TargetCommand),
}

#[derive(Debug, Subcommand)]
pub enum TargetCommand {
    #[command(about = "Set the goal value")]
    Set { value: String },
    #[command(about = "Remove the goal value")]
    Clear {
        #[arg(long, help = "Skip the confirmation question")]
        yes: bool,
    },
    #[command(about = "Show the goal value")]
    Show,
}

pub async fn process_weight_command(dir: PathBuf, command: WeightCommand) -> Result<()> {
    let mut records = JsonStore::<WeightRecord>::open(&dir).await;
    let mut target = TargetStore::open(&dir).await;
    let clock = DefaultClock;

    match command {
        WeightCommand::Add { weight, date, note } => {
            let value = match WeightRecord::parse_weight(&weight) {
                Ok(value) => value,
                Err(e) => {
                    warn_user(e);
                    return Ok(());
                }
            };
            let date = match parse_day(date.as_deref()) {
                Ok(date) => date,
                Err(message) => {
                    warn_user(message);
                    return Ok(());
                }
            };
            let now = clock.time();
            let record = WeightRecord {
                date,
                weight: value,
                note,
                created_time: now,
                updated_time: now,
            };
            if let Err(e) = records.create(record, now).await {
                warn_user(e);
            }
        }
        WeightCommand::List => print_list(&records, target.get()),
        WeightCommand::Rm { index, yes } => {
            if confirm(&format!("Delete weight record #{index}?"), yes)?
                && records.remove(Some(index)).await.is_none()
            {
                warn_user(format!("no weight record #{index}"));
            }
        }
        WeightCommand::Chart => {
            // Rendering is the window's job; this prints exactly what the renderer receives.
            let series = weight_series(records.records(), target.get());
            println!("{}", target_label(series.target));
            if series.points.is_empty() {
                println!("No points.");
            }
            for (date, weight) in &series.points {
                println!("{} {weight}", date_heading(*date));
            }
        }
        WeightCommand::Target(TargetCommand::Set { value }) => {
            let parsed = match value.parse::<f64>() {
                Ok(parsed) => parsed,
                Err(_) => {
                    warn_user(format!("target must be a number, got {value:?}"));
                    return Ok(());
                }
            };
            if let Err(e) = target.set(parsed).await {
                warn_user(e);
            }
        }
        WeightCommand::Target(TargetCommand::Clear { yes }) => {
            if confirm("Remove the weight target?", yes)? {
                target.clear().await;
            }
        }
        WeightCommand::Target(TargetCommand::Show) => {
            println!("{}", target_label(target.get()));
        }
    }
    Ok(())
}

fn parse_day(input: Option<&str>) -> Result<NaiveDate, String> {
    match input {
        None => Ok(Local::now().date_naive()),
        Some(text) => parse_date_string(text, Local::now(), Dialect::Uk)
            .map(|parsed| parsed.date_naive())
            .map_err(|_| format!("could not understand the date {text:?}")),
    }
}

fn print_list(records: &JsonStore<WeightRecord>, target: Option<f64>) {
    println!("{}", Style::new().bold().paint(target_label(target)));
    if records.is_empty() {
        println!("No weight records yet.");
        return;
    }

    // Newest first. The sort is stable, so same-day records keep insertion order.
    let mut ordered: Vec<(usize, &WeightRecord)> = records.records().iter().enumerate().collect();
    ordered.sort_by(|(_, a), (_, b)| b.date.cmp(&a.date));

    for (index, record) in ordered {
        let note = if record.note.is_empty() {
            String::new()
        } else {
            format!("  {}", record.note)
        };
        println!(
            "  #{index} {} {}kg{note}",
            date_heading(record.date),
            record.weight
        );
    }
}
