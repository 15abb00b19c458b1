use std::time::Duration;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::{
    platform::notify::Notifier,
    store::{
        entities::{Alarm, Repeat},
        json_store::JsonStore,
    },
    utils::clock::Clock,
};

pub const ALARM_CHECK_INTERVAL: Duration = Duration::from_secs(60);

/// Minute-granular alarm loop.
///
/// Checks once at startup and then every minute. A tick fires every enabled
/// alarm whose "HH:MM" matches the current wall clock and whose recurrence
/// rule covers the weekday, in list order. Because ticks are a minute apart,
/// an alarm fires at most once per matching minute.
pub struct AlarmScheduler<N> {
    alarms: JsonStore<Alarm>,
    notifier: N,
    shutdown: CancellationToken,
    check_interval: Duration,
    clock: Box<dyn Clock>,
}

impl<N: Notifier> AlarmScheduler<N> {
    pub fn new(
        alarms: JsonStore<Alarm>,
        notifier: N,
        shutdown: CancellationToken,
        check_interval: Duration,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            alarms,
            notifier,
            shutdown,
            check_interval,
            clock,
        }
    }

    /// Executes the scheduler event loop.
    pub async fn run(mut self) -> Result<()> {
        let mut check_point = self.clock.instant();
        loop {
            self.check_due().await;

            check_point += self.check_interval;
            tokio::select! {
                // Cancellation means we stop the event loop. Pending alarms simply fire on the
                // next launch if their minute still matches.
                _ = self.shutdown.cancelled() => {
                    return Ok(())
                }
                _ = self.clock.sleep_until(check_point) => ()
            }
        }
    }

    /// One tick: fire everything due for the current minute.
    async fn check_due(&mut self) {
        let wall = self.clock.wall();
        debug!("Checking alarms at {}", wall.format("%H:%M"));

        let due: Vec<usize> = self
            .alarms
            .records()
            .iter()
            .enumerate()
            .filter(|(_, alarm)| alarm.is_due(wall))
            .map(|(index, _)| index)
            .collect();

        for index in due {
            let alarm = self.alarms.records()[index].clone();
            info!("Alarm {:?} due at {}", alarm.label, wall.format("%H:%M"));

            // Delivery is awaited before anything else happens, so a notification that is
            // being shown also holds back subsequent ticks.
            let summary = format!("Alarm {}", alarm.time.format("%H:%M"));
            if let Err(e) = self.notifier.notify(&summary, &alarm.label) {
                error!("Failed to deliver alarm notification: {e}");
            }

            if alarm.repeat == Repeat::None {
                let mut fired = alarm;
                fired.enabled = false;
                if let Err(e) = self.alarms.update(index, fired, self.clock.time()).await {
                    error!("Failed to disable one-shot alarm: {e}");
                }
            }
        }
    }
}
