use std::{io::Write, path::PathBuf, time::Duration};

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{
    engine::stopwatch::{Stopwatch, StopwatchStatus},
    store::{entities::Session, json_store::JsonStore},
    utils::{
        clock::{Clock, DefaultClock},
        time::format_elapsed,
    },
};

use super::warn_user;

const DISPLAY_TICK: Duration = Duration::from_secs(1);

/// Interactive stopwatch session. Line commands control the run; while running, the elapsed
/// display refreshes once a second. Only a `stop` turns the run into a history record.
pub async fn process_timer_command(dir: PathBuf) -> Result<()> {
    let mut history = JsonStore::<Session>::open(&dir).await;
    let clock = DefaultClock;
    let mut watch = Stopwatch::new(Box::new(DefaultClock));

    println!("Stopwatch ready. Commands: start, pause, resume, stop, quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut tick_point = clock.instant() + DISPLAY_TICK;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.trim() {
                    "start" | "resume" => watch.start(),
                    "pause" => watch.pause(),
                    "stop" => stop_and_record(&mut watch, &mut history, &clock).await,
                    "quit" | "exit" => break,
                    "" => {}
                    other => println!("Unknown command {other:?}"),
                }
            }
            _ = clock.sleep_until(tick_point) => {
                tick_point += DISPLAY_TICK;
                if watch.status() == StopwatchStatus::Running {
                    print!("\r{}  ", format_elapsed(watch.elapsed()));
                    let _ = std::io::stdout().flush();
                }
            }
        }
    }

    if watch.status() != StopwatchStatus::Idle {
        println!("\nLeaving without stop; the unfinished run is discarded.");
    }
    Ok(())
}

async fn stop_and_record(
    watch: &mut Stopwatch,
    history: &mut JsonStore<Session>,
    clock: &DefaultClock,
) {
    let Some(session) = watch.stop(history.len()) else {
        println!("Nothing to stop.");
        return;
    };
    println!(
        "\nRecorded {} at {}",
        session.name,
        format_elapsed(chrono::Duration::milliseconds(
            (session.duration * 1000.0) as i64
        ))
    );
    if let Err(e) = history.create(session, clock.time()).await {
        warn_user(e);
    }
}
