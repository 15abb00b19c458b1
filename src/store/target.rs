use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{PersistenceError, ValidationError};

use super::file_io;

/// The single optional goal value, drawn as a reference line on the weight chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightTarget {
    pub target: Option<f64>,
}

/// Store for `weight_target.json`. Unlike the record stores this holds one value, not a list.
pub struct TargetStore {
    path: PathBuf,
    value: WeightTarget,
}

impl TargetStore {
    pub const FILE_NAME: &'static str = "weight_target.json";

    pub async fn open(dir: &Path) -> Self {
        let path = dir.join(Self::FILE_NAME);
        let value = match file_io::read_locked(&path).await {
            Ok(Some(contents)) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!("Discarding unreadable {}: {e}", Self::FILE_NAME);
                WeightTarget::default()
            }),
            Ok(None) => WeightTarget::default(),
            Err(e) => {
                warn!("Starting {} without a target: {e}", Self::FILE_NAME);
                WeightTarget::default()
            }
        };
        Self { path, value }
    }

    pub fn get(&self) -> Option<f64> {
        self.value.target
    }

    /// Sets the goal. Non-positive and non-finite values are rejected without touching the
    /// stored one.
    pub async fn set(&mut self, value: f64) -> Result<(), ValidationError> {
        if !(value.is_finite() && value > 0.0) {
            return Err(ValidationError::InvalidTarget(value.to_string()));
        }
        self.value.target = Some(value);
        self.persist_best_effort().await;
        Ok(())
    }

    /// Removes the goal. Confirmation happens at the presentation layer.
    pub async fn clear(&mut self) {
        self.value.target = None;
        self.persist_best_effort().await;
    }

    pub async fn persist(&self) -> Result<(), PersistenceError> {
        let json = serde_json::to_vec_pretty(&self.value).map_err(|e| PersistenceError::Encode {
            path: self.path.clone(),
            source: e,
        })?;
        file_io::write_locked(&self.path, &json).await
    }

    async fn persist_best_effort(&self) {
        if let Err(e) = self.persist().await {
            warn!("Failed to persist {}: {e}", Self::FILE_NAME);
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use crate::error::ValidationError;

    use super::TargetStore;

    #[tokio::test]
    async fn target_round_trips_and_clears() {
        let dir = tempdir().unwrap();
        let mut store = TargetStore::open(dir.path()).await;
        assert_eq!(store.get(), None);

        store.set(72.5).await.unwrap();
        assert_eq!(TargetStore::open(dir.path()).await.get(), Some(72.5));

        store.clear().await;
        assert_eq!(TargetStore::open(dir.path()).await.get(), None);
    }

    #[tokio::test]
    async fn bad_targets_are_rejected_and_keep_the_old_value() {
        let dir = tempdir().unwrap();
        let mut store = TargetStore::open(dir.path()).await;
        store.set(80.0).await.unwrap();

        for bad in [0.0, -3.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                store.set(bad).await,
                Err(ValidationError::InvalidTarget(_))
            ));
        }
        assert_eq!(store.get(), Some(80.0));
    }
}
