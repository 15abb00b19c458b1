use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    error::{PersistenceError, PlatformError, ValidationError},
    platform::Autostart,
};

use super::file_io;

pub const OPACITY_MIN: f64 = 0.1;
pub const OPACITY_MAX: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub width: u32,
    pub height: u32,
    pub x: i32,
    pub y: i32,
}

impl Default for WindowGeometry {
    fn default() -> Self {
        Self {
            width: 360,
            height: 540,
            x: 80,
            y: 80,
        }
    }
}

/// Window-level preferences. The window chrome itself lives outside this crate; these are the
/// values it reads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub opacity: f64,
    pub autostart: bool,
    pub always_on_top: bool,
    pub window_geometry: WindowGeometry,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            opacity: 0.95,
            autostart: false,
            always_on_top: true,
            window_geometry: WindowGeometry::default(),
        }
    }
}

/// Store for `settings.json`.
pub struct SettingsStore {
    path: PathBuf,
    data: Settings,
}

impl SettingsStore {
    pub const FILE_NAME: &'static str = "settings.json";

    pub async fn open(dir: &Path) -> Self {
        let path = dir.join(Self::FILE_NAME);
        let data = match file_io::read_locked(&path).await {
            Ok(Some(contents)) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!("Discarding unreadable {}: {e}", Self::FILE_NAME);
                Settings::default()
            }),
            Ok(None) => Settings::default(),
            Err(e) => {
                warn!("Starting {} with defaults: {e}", Self::FILE_NAME);
                Settings::default()
            }
        };
        Self { path, data }
    }

    pub fn get(&self) -> &Settings {
        &self.data
    }

    pub async fn set_opacity(&mut self, value: f64) -> Result<(), ValidationError> {
        if !(value.is_finite() && (OPACITY_MIN..=OPACITY_MAX).contains(&value)) {
            return Err(ValidationError::OpacityOutOfRange(value));
        }
        self.data.opacity = value;
        self.persist_best_effort().await;
        Ok(())
    }

    pub async fn set_always_on_top(&mut self, value: bool) {
        self.data.always_on_top = value;
        self.persist_best_effort().await;
    }

    pub async fn set_geometry(&mut self, geometry: WindowGeometry) {
        self.data.window_geometry = geometry;
        self.persist_best_effort().await;
    }

    /// Flips the autostart flag through the platform registration. The flag is only persisted
    /// once the registration call succeeded, so a platform failure leaves the stored state
    /// matching reality.
    pub async fn apply_autostart(
        &mut self,
        registration: &dyn Autostart,
        enabled: bool,
    ) -> Result<(), PlatformError> {
        if enabled {
            registration.enable()?;
        } else {
            registration.disable()?;
        }
        self.data.autostart = enabled;
        self.persist_best_effort().await;
        Ok(())
    }

    pub async fn persist(&self) -> Result<(), PersistenceError> {
        let json = serde_json::to_vec_pretty(&self.data).map_err(|e| PersistenceError::Encode {
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

    use crate::{
        error::{PlatformError, ValidationError},
        platform::MockAutostart,
    };

    use super::{Settings, SettingsStore, WindowGeometry};

    #[tokio::test]
    async fn settings_round_trip() {
        let dir = tempdir().unwrap();
        let mut store = SettingsStore::open(dir.path()).await;
        assert_eq!(*store.get(), Settings::default());

        store.set_opacity(0.5).await.unwrap();
        store.set_always_on_top(false).await;
        store
            .set_geometry(WindowGeometry {
                width: 400,
                height: 600,
                x: 10,
                y: 20,
            })
            .await;

        let reloaded = SettingsStore::open(dir.path()).await;
        assert_eq!(reloaded.get().opacity, 0.5);
        assert!(!reloaded.get().always_on_top);
        assert_eq!(reloaded.get().window_geometry.width, 400);
    }

    #[tokio::test]
    async fn opacity_outside_range_is_rejected() {
        let dir = tempdir().unwrap();
        let mut store = SettingsStore::open(dir.path()).await;

        for bad in [0.0, 0.05, 1.2, f64::NAN] {
            assert!(matches!(
                store.set_opacity(bad).await,
                Err(ValidationError::OpacityOutOfRange(_))
            ));
        }
        assert_eq!(store.get().opacity, Settings::default().opacity);
    }

    #[tokio::test]
    async fn autostart_flag_follows_successful_registration() {
        let dir = tempdir().unwrap();
        let mut store = SettingsStore::open(dir.path()).await;

        let mut registration = MockAutostart::new();
        registration.expect_enable().times(1).returning(|| Ok(()));
        store.apply_autostart(&registration, true).await.unwrap();
        assert!(store.get().autostart);
        assert!(SettingsStore::open(dir.path()).await.get().autostart);
    }

    #[tokio::test]
    async fn autostart_flag_is_untouched_when_registration_fails() {
        let dir = tempdir().unwrap();
        let mut store = SettingsStore::open(dir.path()).await;

        let mut registration = MockAutostart::new();
        registration
            .expect_enable()
            .times(1)
            .returning(|| Err(PlatformError::Autostart("registry says no".into())));

        let result = store.apply_autostart(&registration, true).await;
        assert!(result.is_err());
        assert!(!store.get().autostart);
        assert!(!SettingsStore::open(dir.path()).await.get().autostart);
    }
}
