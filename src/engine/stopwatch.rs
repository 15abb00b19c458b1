use chrono::{DateTime, Duration, Utc};

use crate::{store::entities::Session, utils::clock::Clock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopwatchStatus {
    #[default]
    Idle,
    Running,
    Paused,
}

/// Elapsed-time accounting for the stopwatch.
///
/// Tracks one run at a time: `Idle → Running ⇄ Paused → Idle`. Elapsed time is
/// wall-clock time net of every paused interval. Invalid transitions are
/// no-ops, not errors. The state is transient; only the [Session] emitted by
/// [stop](Self::stop) is ever persisted.
pub struct Stopwatch {
    status: StopwatchStatus,
    start_time: Option<DateTime<Utc>>,
    pause_time: Option<DateTime<Utc>>,
    total_paused: Duration,
    clock: Box<dyn Clock>,
}

impl Stopwatch {
    pub fn new(clock: Box<dyn Clock>) -> Self {
        Self {
            status: StopwatchStatus::Idle,
            start_time: None,
            pause_time: None,
            total_paused: Duration::zero(),
            clock,
        }
    }

    pub fn status(&self) -> StopwatchStatus {
        self.status
    }

    /// Starts a fresh run, or resumes a paused one by folding the pause gap into the paused
    /// total. Already running is a no-op.
    pub fn start(&mut self) {
        match self.status {
            StopwatchStatus::Idle => {
                self.start_time = Some(self.clock.time());
                self.total_paused = Duration::zero();
                self.status = StopwatchStatus::Running;
            }
            StopwatchStatus::Paused => {
                if let Some(paused_at) = self.pause_time.take() {
                    self.total_paused += self.clock.time() - paused_at;
                }
                self.status = StopwatchStatus::Running;
            }
            StopwatchStatus::Running => {}
        }
    }

    /// Only valid while running; anything else is a no-op.
    pub fn pause(&mut self) {
        if self.status == StopwatchStatus::Running {
            self.pause_time = Some(self.clock.time());
            self.status = StopwatchStatus::Paused;
        }
    }

    /// Finishes the run and emits the completed session record. `existing` is the number of
    /// sessions already in the history, used for the default name. Returns `None` when idle.
    pub fn stop(&mut self, existing: usize) -> Option<Session> {
        if self.status == StopwatchStatus::Idle {
            return None;
        }
        let start = self.start_time?;
        // A stop while paused ends the run at the pause moment, not at "now".
        let end = self.pause_time.unwrap_or_else(|| self.clock.time());
        let net = ((end - start) - self.total_paused).max(Duration::zero());

        let session = Session {
            name: format!("Segment {}", existing + 1),
            start_time: start,
            end_time: end,
            duration: net.num_milliseconds() as f64 / 1000.0,
        };

        self.status = StopwatchStatus::Idle;
        self.start_time = None;
        self.pause_time = None;
        self.total_paused = Duration::zero();

        Some(session)
    }

    /// Net elapsed time for the 1-second display tick. Zero while idle, frozen while paused.
    pub fn elapsed(&self) -> Duration {
        let Some(start) = self.start_time else {
            return Duration::zero();
        };
        let reference = match self.status {
            StopwatchStatus::Idle => return Duration::zero(),
            StopwatchStatus::Running => self.clock.time(),
            StopwatchStatus::Paused => match self.pause_time {
                Some(paused_at) => paused_at,
                None => self.clock.time(),
            },
        };
        ((reference - start) - self.total_paused).max(Duration::zero())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use crate::utils::clock::testing::ManualClock;

    use super::{Stopwatch, StopwatchStatus};

    fn watch() -> (Stopwatch, ManualClock) {
        let start = NaiveDate::from_ymd_opt(2018, 7, 4)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let clock = ManualClock::starting_at(start);
        (Stopwatch::new(Box::new(clock.clone())), clock)
    }

    #[test]
    fn pause_interval_is_excluded_from_the_recorded_duration() {
        let (mut watch, clock) = watch();

        watch.start();
        clock.advance(Duration::seconds(10));
        watch.pause();
        clock.advance(Duration::seconds(30));
        watch.start();
        clock.advance(Duration::seconds(10));

        let session = watch.stop(0).unwrap();
        assert_eq!(session.duration, 20.0);
        assert_eq!(session.end_time - session.start_time, Duration::seconds(50));
        assert_eq!(session.name, "Segment 1");
        assert_eq!(watch.status(), StopwatchStatus::Idle);
    }

    #[test]
    fn stopping_while_paused_ends_at_the_pause_moment() {
        let (mut watch, clock) = watch();

        watch.start();
        clock.advance(Duration::seconds(25));
        watch.pause();
        clock.advance(Duration::seconds(300));

        let session = watch.stop(3).unwrap();
        assert_eq!(session.duration, 25.0);
        assert_eq!(session.end_time - session.start_time, Duration::seconds(25));
        assert_eq!(session.name, "Segment 4");
    }

    #[test]
    fn redundant_transitions_change_nothing() {
        let (mut watch, clock) = watch();

        // Pausing and stopping while idle are no-ops.
        watch.pause();
        assert_eq!(watch.status(), StopwatchStatus::Idle);
        assert!(watch.stop(0).is_none());

        watch.start();
        clock.advance(Duration::seconds(5));
        watch.start();
        assert_eq!(watch.elapsed(), Duration::seconds(5));

        watch.pause();
        let frozen = watch.elapsed();
        clock.advance(Duration::seconds(60));
        watch.pause();
        assert_eq!(watch.elapsed(), frozen);
    }

    #[test]
    fn elapsed_freezes_while_paused_and_resumes_cleanly() {
        let (mut watch, clock) = watch();

        watch.start();
        clock.advance(Duration::seconds(12));
        assert_eq!(watch.elapsed(), Duration::seconds(12));

        watch.pause();
        clock.advance(Duration::seconds(100));
        assert_eq!(watch.elapsed(), Duration::seconds(12));

        watch.start();
        clock.advance(Duration::seconds(3));
        assert_eq!(watch.elapsed(), Duration::seconds(15));
    }

    #[test]
    fn back_to_back_runs_reset_the_paused_total() {
        let (mut watch, clock) = watch();

        watch.start();
        clock.advance(Duration::seconds(10));
        watch.pause();
        clock.advance(Duration::seconds(10));
        watch.stop(0).unwrap();

        watch.start();
        clock.advance(Duration::seconds(7));
        let session = watch.stop(1).unwrap();
        assert_eq!(session.duration, 7.0);
        assert_eq!(session.name, "Segment 2");
    }

    #[test]
    fn durations_are_never_negative() {
        let (mut watch, _clock) = watch();
        watch.start();
        let session = watch.stop(0).unwrap();
        assert!(session.duration >= 0.0);
    }
}
