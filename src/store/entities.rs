use std::fmt::Display;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc, Weekday};
use clap::ValueEnum;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::ValidationError;

/// Contract every persisted record type fulfills for
/// [JsonStore](super::json_store::JsonStore).
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// File the record list is kept in, under the application-data directory.
    const FILE_NAME: &'static str;

    fn validate(&self) -> Result<(), ValidationError>;

    /// Called once when the record enters the store.
    fn stamp_created(&mut self, _now: DateTime<Utc>) {}

    /// Called on every successful replacement of the record.
    fn stamp_updated(&mut self, _now: DateTime<Utc>) {}
}

/// One completed stopwatch run.
///
/// Sessions are append-only. Renaming is the only mutation, so there are no
/// created/updated stamps beyond the run's own timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Net running time in seconds, paused intervals excluded.
    pub duration: f64,
}

impl Session {
    /// Calendar day the run started on. The history view groups by this.
    pub fn day(&self) -> NaiveDate {
        self.start_time.with_timezone(&chrono::Local).date_naive()
    }
}

impl Record for Session {
    const FILE_NAME: &'static str = "timer_history.json";

    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "session name" });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    Pending,
    InProgress,
    Done,
}

impl Display for TodoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TodoStatus::Pending => write!(f, "pending"),
            TodoStatus::InProgress => write!(f, "in progress"),
            TodoStatus::Done => write!(f, "done"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub priority: Priority,
    pub status: TodoStatus,
    pub created_time: DateTime<Utc>,
    pub updated_time: DateTime<Utc>,
}

impl Record for Todo {
    const FILE_NAME: &'static str = "todo_list.json";

    fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "todo title" });
        }
        Ok(())
    }

    fn stamp_created(&mut self, now: DateTime<Utc>) {
        self.created_time = now;
        self.updated_time = now;
    }

    fn stamp_updated(&mut self, now: DateTime<Utc>) {
        self.updated_time = now;
    }
}

/// One journal entry. Several entries may share a date; they are all retained
/// and the display sorts by date without merging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightRecord {
    pub date: NaiveDate,
    pub weight: f64,
    #[serde(default)]
    pub note: String,
    pub created_time: DateTime<Utc>,
    pub updated_time: DateTime<Utc>,
}

impl WeightRecord {
    /// Parses user-typed weight input. Rejects non-numbers and non-positive values.
    pub fn parse_weight(input: &str) -> Result<f64, ValidationError> {
        match input.trim().parse::<f64>() {
            Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
            _ => Err(ValidationError::InvalidWeight(input.to_string())),
        }
    }
}

impl Record for WeightRecord {
    const FILE_NAME: &'static str = "weight_records.json";

    fn validate(&self) -> Result<(), ValidationError> {
        if !(self.weight.is_finite() && self.weight > 0.0) {
            return Err(ValidationError::InvalidWeight(self.weight.to_string()));
        }
        Ok(())
    }

    fn stamp_created(&mut self, now: DateTime<Utc>) {
        self.created_time = now;
        self.updated_time = now;
    }

    fn stamp_updated(&mut self, now: DateTime<Utc>) {
        self.updated_time = now;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Repeat {
    None,
    Daily,
    Weekdays,
    Weekends,
}

impl Repeat {
    /// Whether an alarm with this rule goes off on the given weekday.
    pub fn applies_on(self, weekday: Weekday) -> bool {
        match self {
            Repeat::None | Repeat::Daily => true,
            Repeat::Weekdays => !matches!(weekday, Weekday::Sat | Weekday::Sun),
            Repeat::Weekends => matches!(weekday, Weekday::Sat | Weekday::Sun),
        }
    }
}

impl Display for Repeat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Repeat::None => write!(f, "none"),
            Repeat::Daily => write!(f, "daily"),
            Repeat::Weekdays => write!(f, "weekdays"),
            Repeat::Weekends => write!(f, "weekends"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alarm {
    #[serde(with = "clock_time")]
    pub time: NaiveTime,
    pub repeat: Repeat,
    pub label: String,
    pub enabled: bool,
    pub created_time: DateTime<Utc>,
    pub updated_time: DateTime<Utc>,
}

impl Alarm {
    /// An alarm goes off when its minute matches the wall clock and its rule covers the weekday.
    /// The check is minute-granular; seconds are ignored.
    pub fn is_due(&self, wall: NaiveDateTime) -> bool {
        self.enabled
            && self.time.hour() == wall.hour()
            && self.time.minute() == wall.minute()
            && self.repeat.applies_on(wall.weekday())
    }
}

impl Record for Alarm {
    const FILE_NAME: &'static str = "alarms.json";

    fn validate(&self) -> Result<(), ValidationError> {
        if self.label.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "alarm label" });
        }
        Ok(())
    }

    fn stamp_created(&mut self, now: DateTime<Utc>) {
        self.created_time = now;
        self.updated_time = now;
    }

    fn stamp_updated(&mut self, now: DateTime<Utc>) {
        self.updated_time = now;
    }
}

/// Alarms are stored as the "HH:MM" string the user typed, not a full time value.
mod clock_time {
    use chrono::NaiveTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    use crate::utils::time::CLOCK_FMT;

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(CLOCK_FMT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, CLOCK_FMT).map_err(serde::de::Error::custom)
    }
}
