use std::{env, fs, io::ErrorKind, path::PathBuf};

use crate::error::PlatformError;

use super::{Autostart, AUTOSTART_APP_NAME};

/// Registers the widget through a freedesktop autostart entry in the user's config directory.
pub struct XdgAutostart {
    entry_path: PathBuf,
}

impl XdgAutostart {
    pub fn new() -> Result<Self, PlatformError> {
        let config = env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|_| env::var("HOME").map(|home| PathBuf::from(home).join(".config")))
            .map_err(|_| {
                PlatformError::Autostart("neither XDG_CONFIG_HOME nor HOME is set".into())
            })?;
        Ok(Self::rooted(config))
    }

    /// Builds the registration against an explicit config directory.
    pub fn rooted(config_dir: PathBuf) -> Self {
        Self {
            entry_path: config_dir
                .join("autostart")
                .join("deskmate.desktop"),
        }
    }

    fn desktop_entry() -> Result<String, PlatformError> {
        let exe = env::current_exe().map_err(|e| {
            PlatformError::Autostart(format!("cannot resolve own executable path: {e}"))
        })?;
        Ok(format!(
            "[Desktop Entry]\n\
             Type=Application\n\
             Name={AUTOSTART_APP_NAME}\n\
             Exec={}\n\
             X-GNOME-Autostart-enabled=true\n",
            exe.display()
        ))
    }
}

impl Autostart for XdgAutostart {
    fn enable(&self) -> Result<(), PlatformError> {
        if let Some(parent) = self.entry_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                PlatformError::Autostart(format!("cannot create {}: {e}", parent.display()))
            })?;
        }
        fs::write(&self.entry_path, Self::desktop_entry()?).map_err(|e| {
            PlatformError::Autostart(format!("cannot write {}: {e}", self.entry_path.display()))
        })
    }

    fn disable(&self) -> Result<(), PlatformError> {
        match fs::remove_file(&self.entry_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PlatformError::Autostart(format!(
                "cannot remove {}: {e}",
                self.entry_path.display()
            ))),
        }
    }

    fn status(&self) -> Result<bool, PlatformError> {
        Ok(self.entry_path.exists())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use crate::platform::Autostart;

    use super::XdgAutostart;

    #[test]
    fn enable_disable_cycle_tracks_the_entry_file() {
        let dir = tempdir().unwrap();
        let registration = XdgAutostart::rooted(dir.path().to_path_buf());

        assert!(!registration.status().unwrap());

        registration.enable().unwrap();
        assert!(registration.status().unwrap());
        let entry =
            std::fs::read_to_string(dir.path().join("autostart/deskmate.desktop")).unwrap();
        assert!(entry.starts_with("[Desktop Entry]"));
        assert!(entry.contains("Name=Deskmate"));

        registration.disable().unwrap();
        assert!(!registration.status().unwrap());

        // Disabling an absent registration stays quiet.
        registration.disable().unwrap();
    }
}
