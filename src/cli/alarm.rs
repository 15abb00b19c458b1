use std::path::PathBuf;

use ansi_term::Colour;
use anyhow::Result;
use clap::Subcommand;
use tokio_util::sync::CancellationToken;

use crate::{
    engine::{
        scheduler::{AlarmScheduler, ALARM_CHECK_INTERVAL},
        shutdown::detect_shutdown,
    },
    platform::notify::DesktopNotifier,
    store::{
        entities::{Alarm, Repeat},
        json_store::JsonStore,
    },
    utils::{
        clock::{Clock, DefaultClock},
        time::{parse_clock, CLOCK_FMT},
    },
};

use super::{confirm, warn_user};

#[derive(Debug, Subcommand)]
pub enum AlarmCommand {
    #[command(about = "Add an alarm")]
    Add {
        #[arg(help = "24-hour HH:MM value, for example 07:30")]
        time: String,
        label: String,
        #[arg(short, long, value_enum, default_value_t = Repeat::None)]
        repeat: Repeat,
    },
    #[command(about = "List alarms")]
    List,
    #[command(about = "Enable an alarm")]
    Enable { index: usize },
    #[command(about = "Disable an alarm")]
    Disable { index: usize },
    #[command(about = "Delete an alarm")]
    Rm {
        index: usize,
        #[arg(long, help = "Skip the confirmation question")]
        yes: bool,
    },
    #[command(about = "Run the alarm loop in the foreground until Ctrl-C")]
    Watch,
}

pub async fn process_alarm_command(dir: PathBuf, command: AlarmCommand) -> Result<()> {
    let mut alarms = JsonStore::<Alarm>::open(&dir).await;
    let clock = DefaultClock;

    match command {
        AlarmCommand::Add {
            time,
            label,
            repeat,
        } => {
            let time = match parse_clock(&time) {
                Ok(time) => time,
                Err(e) => {
                    warn_user(e);
                    return Ok(());
                }
            };
            let now = clock.time();
            let alarm = Alarm {
                time,
                repeat,
                label,
                enabled: true,
                created_time: now,
                updated_time: now,
            };
            if let Err(e) = alarms.create(alarm, now).await {
                warn_user(e);
            }
        }
        AlarmCommand::List => print_list(&alarms),
        AlarmCommand::Enable { index } => set_enabled(&mut alarms, index, true).await,
        AlarmCommand::Disable { index } => set_enabled(&mut alarms, index, false).await,
        AlarmCommand::Rm { index, yes } => {
            if confirm(&format!("Delete alarm #{index}?"), yes)?
                && alarms.remove(Some(index)).await.is_none()
            {
                warn_user(format!("no alarm #{index}"));
            }
        }
        AlarmCommand::Watch => {
            println!("Watching {} alarm(s). Ctrl-C stops.", alarms.len());
            let shutdown = CancellationToken::new();
            let scheduler = AlarmScheduler::new(
                alarms,
                DesktopNotifier,
                shutdown.clone(),
                ALARM_CHECK_INTERVAL,
                Box::new(DefaultClock),
            );
            let (_, run_result) = tokio::join!(detect_shutdown(shutdown), scheduler.run());
            run_result?;
        }
    }
    Ok(())
}

async fn set_enabled(alarms: &mut JsonStore<Alarm>, index: usize, enabled: bool) {
    let Some(alarm) = alarms.get(index) else {
        warn_user(format!("no alarm #{index}"));
        return;
    };
    let mut toggled = alarm.clone();
    toggled.enabled = enabled;
    if let Err(e) = alarms.update(index, toggled, DefaultClock.time()).await {
        warn_user(e);
    }
}

fn print_list(alarms: &JsonStore<Alarm>) {
    if alarms.is_empty() {
        println!("No alarms set.");
        return;
    }
    for (index, alarm) in alarms.records().iter().enumerate() {
        let state = if alarm.enabled {
            Colour::Green.paint("on")
        } else {
            Colour::Red.paint("off")
        };
        println!(
            "  #{index} {} {} [{}] ({state})",
            alarm.time.format(CLOCK_FMT),
            alarm.label,
            alarm.repeat,
        );
    }
}
