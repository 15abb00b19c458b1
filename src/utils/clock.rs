use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDateTime, Utc};
use tokio::time::Instant;

/// Represents an entity responsible for providing dates across the application. This can allow it
/// to be used for testing
#[async_trait]
pub trait Clock: Sync + Send + 'static {
    fn time(&self) -> DateTime<Utc>;

    /// Local wall-clock time. Alarms match against what the user's clock shows, so this is the
    /// only place a timezone conversion happens.
    fn wall(&self) -> NaiveDateTime {
        self.time().with_timezone(&Local).naive_local()
    }

    fn instant(&self) -> Instant;

    async fn sleep(&self, duration: Duration);

    async fn sleep_until(&self, instant: tokio::time::Instant);
}

pub struct DefaultClock;

#[async_trait]
impl Clock for DefaultClock {
    fn time(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn instant(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    async fn sleep_until(&self, instant: tokio::time::Instant) {
        tokio::time::sleep_until(instant).await;
    }
}

/// Clock for tests that only moves when the test says so.
#[cfg(test)]
pub mod testing {
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use async_trait::async_trait;
    use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
    use tokio::time::Instant;

    use super::Clock;

    #[derive(Clone)]
    pub struct ManualClock {
        now: Arc<Mutex<DateTime<Utc>>>,
    }

    impl ManualClock {
        pub fn starting_at(start: NaiveDateTime) -> Self {
            Self {
                now: Arc::new(Mutex::new(Utc.from_utc_datetime(&start))),
            }
        }

        pub fn advance(&self, duration: chrono::Duration) {
            let mut guard = self.now.lock().unwrap();
            *guard += duration;
        }
    }

    #[async_trait]
    impl Clock for ManualClock {
        fn time(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }

        // Wall time is pinned to the manual value so tests stay independent of the machine's
        // timezone.
        fn wall(&self) -> NaiveDateTime {
            self.time().naive_utc()
        }

        fn instant(&self) -> Instant {
            Instant::now()
        }

        async fn sleep(&self, duration: Duration) {
            tokio::time::sleep(duration).await;
        }

        async fn sleep_until(&self, instant: tokio::time::Instant) {
            tokio::time::sleep_until(instant).await;
        }
    }
}
