use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::error::{PersistenceError, StoreError};

use super::{entities::Record, file_io};

/// In-memory record list backed by one pretty-printed JSON array file.
///
/// The store owns its list and its file. Mutations validate first, touch memory second, and
/// persist last; a failed write is logged and the in-memory list stays authoritative.
pub struct JsonStore<T> {
    path: PathBuf,
    records: Vec<T>,
}

impl<T: Record> JsonStore<T> {
    /// Opens the store for `dir`, reading the backing file when present. A missing file or
    /// unreadable contents start an empty list rather than failing.
    pub async fn open(dir: &Path) -> Self {
        let path = dir.join(T::FILE_NAME);
        let records = match file_io::read_locked(&path).await {
            Ok(None) => Vec::new(),
            Ok(Some(contents)) if contents.trim().is_empty() => Vec::new(),
            Ok(Some(contents)) => match serde_json::from_str(&contents) {
                Ok(records) => records,
                Err(e) => {
                    // Corrupt files are abandoned, not repaired. Might happen after shutdowns.
                    warn!("Discarding unreadable {}: {e}", T::FILE_NAME);
                    Vec::new()
                }
            },
            Err(e) => {
                warn!("Starting {} with an empty list: {e}", T::FILE_NAME);
                Vec::new()
            }
        };
        Self { path, records }
    }

    /// All records in insertion order. Display layers apply their own sort.
    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.records.get(index)
    }

    /// Validates and appends, stamping creation times. Returns the new record's index. The list
    /// is untouched when validation fails.
    pub async fn create(&mut self, mut record: T, now: DateTime<Utc>) -> Result<usize, StoreError> {
        record.validate()?;
        record.stamp_created(now);
        self.records.push(record);
        self.persist_best_effort().await;
        Ok(self.records.len() - 1)
    }

    /// Replaces the record at `index` wholesale, refreshing its update stamp.
    pub async fn update(
        &mut self,
        index: usize,
        mut record: T,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        if index >= self.records.len() {
            return Err(StoreError::OutOfBounds {
                index,
                len: self.records.len(),
            });
        }
        record.validate()?;
        record.stamp_updated(now);
        self.records[index] = record;
        self.persist_best_effort().await;
        Ok(())
    }

    /// Removes and returns the record at `index`. `None` or an out-of-range index is a no-op;
    /// confirmation happens before the call, at the presentation layer.
    pub async fn remove(&mut self, index: Option<usize>) -> Option<T> {
        let index = index?;
        if index >= self.records.len() {
            return None;
        }
        let removed = self.records.remove(index);
        self.persist_best_effort().await;
        Some(removed)
    }

    /// Serializes the whole list to the backing file.
    pub async fn persist(&self) -> Result<(), PersistenceError> {
        let json =
            serde_json::to_vec_pretty(&self.records).map_err(|e| PersistenceError::Encode {
                path: self.path.clone(),
                source: e,
            })?;
        file_io::write_locked(&self.path, &json).await
    }

    async fn persist_best_effort(&self) {
        if let Err(e) = self.persist().await {
            warn!("Failed to persist {}: {e}", T::FILE_NAME);
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
    use tempfile::tempdir;

    use crate::{
        error::StoreError,
        store::entities::{
            Alarm, Priority, Record, Repeat, Session, Todo, TodoStatus, WeightRecord,
        },
    };

    use super::JsonStore;

    fn test_now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2018, 7, 4, 12, 0, 0).unwrap()
    }

    fn session(name: &str) -> Session {
        let start = test_now();
        Session {
            name: name.into(),
            start_time: start,
            end_time: start + chrono::Duration::seconds(90),
            duration: 90.0,
        }
    }

    fn todo(title: &str) -> Todo {
        Todo {
            title: title.into(),
            description: "write the report".into(),
            priority: Priority::High,
            status: TodoStatus::Pending,
            created_time: test_now(),
            updated_time: test_now(),
        }
    }

    fn weight(date: NaiveDate, value: f64) -> WeightRecord {
        WeightRecord {
            date,
            weight: value,
            note: String::new(),
            created_time: test_now(),
            updated_time: test_now(),
        }
    }

    fn alarm(label: &str) -> Alarm {
        Alarm {
            time: NaiveTime::from_hms_opt(7, 30, 0).unwrap(),
            repeat: Repeat::Weekdays,
            label: label.into(),
            enabled: true,
            created_time: test_now(),
            updated_time: test_now(),
        }
    }

    async fn assert_round_trip<T: Record + PartialEq + std::fmt::Debug>(records: Vec<T>) {
        let dir = tempdir().unwrap();
        let mut store = JsonStore::<T>::open(dir.path()).await;
        for record in records {
            store.create(record, test_now()).await.unwrap();
        }
        let written = store.records().to_vec();

        let reloaded = JsonStore::<T>::open(dir.path()).await;
        assert_eq!(reloaded.records(), written.as_slice());
    }

    #[tokio::test]
    async fn all_four_stores_round_trip() {
        assert_round_trip(vec![session("Segment 1"), session("Morning run")]).await;
        assert_round_trip(vec![todo("groceries"), todo("report")]).await;
        let date = NaiveDate::from_ymd_opt(2018, 7, 4).unwrap();
        assert_round_trip(vec![weight(date, 72.5), weight(date, 72.1)]).await;
        assert_round_trip(vec![alarm("standup"), alarm("lunch")]).await;
    }

    #[tokio::test]
    async fn missing_file_starts_empty() {
        let dir = tempdir().unwrap();
        let store = JsonStore::<Todo>::open(dir.path()).await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_starts_empty() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(Todo::FILE_NAME), "{not json").unwrap();
        let store = JsonStore::<Todo>::open(dir.path()).await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn rejected_records_leave_the_list_unchanged() {
        let dir = tempdir().unwrap();
        let mut store = JsonStore::<WeightRecord>::open(dir.path()).await;
        let date = NaiveDate::from_ymd_opt(2018, 7, 4).unwrap();
        store.create(weight(date, 80.0), test_now()).await.unwrap();

        let result = store.create(weight(date, -5.0), test_now()).await;
        assert!(matches!(result, Err(StoreError::Validation(_))));
        assert_eq!(store.len(), 1);

        // The rejected record never reached the file either.
        let reloaded = JsonStore::<WeightRecord>::open(dir.path()).await;
        assert_eq!(reloaded.len(), 1);
    }

    #[tokio::test]
    async fn update_replaces_wholesale_and_guards_bounds() {
        let dir = tempdir().unwrap();
        let mut store = JsonStore::<Todo>::open(dir.path()).await;
        store.create(todo("groceries"), test_now()).await.unwrap();

        let mut edited = store.records()[0].clone();
        edited.title = "groceries and pharmacy".into();
        edited.status = TodoStatus::InProgress;
        let later = test_now() + chrono::Duration::minutes(10);
        store.update(0, edited, later).await.unwrap();

        assert_eq!(store.records()[0].title, "groceries and pharmacy");
        assert_eq!(store.records()[0].updated_time, later);
        // Creation stamp survives the replacement untouched.
        assert_eq!(store.records()[0].created_time, test_now());

        let result = store.update(5, todo("oops"), test_now()).await;
        assert!(matches!(
            result,
            Err(StoreError::OutOfBounds { index: 5, len: 1 })
        ));
    }

    #[tokio::test]
    async fn remove_is_silent_on_bad_indices() {
        let dir = tempdir().unwrap();
        let mut store = JsonStore::<Session>::open(dir.path()).await;
        store.create(session("Segment 1"), test_now()).await.unwrap();

        assert!(store.remove(None).await.is_none());
        assert!(store.remove(Some(7)).await.is_none());
        assert_eq!(store.len(), 1);

        let removed = store.remove(Some(0)).await;
        assert_eq!(removed.unwrap().name, "Segment 1");
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn create_stamps_both_times() {
        let dir = tempdir().unwrap();
        let mut store = JsonStore::<Todo>::open(dir.path()).await;
        let mut record = todo("groceries");
        record.created_time = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        record.updated_time = record.created_time;

        store.create(record, test_now()).await.unwrap();
        assert_eq!(store.records()[0].created_time, test_now());
        assert_eq!(store.records()[0].updated_time, test_now());
    }
}
