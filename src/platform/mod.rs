//! OS collaborators: startup-program registration and desktop notifications.
//! [GenericAutostart] is the main artifact of this module, abstracting the
//! per-platform registration behind one front.

#[cfg(windows)]
pub mod win;
#[cfg(target_os = "linux")]
pub mod xdg;

pub mod notify;

use crate::error::PlatformError;

/// Name the startup registration is filed under on every platform.
pub const AUTOSTART_APP_NAME: &str = "Deskmate";

/// Intended to serve as a contract windows and linux systems must implement.
#[cfg_attr(test, mockall::automock)]
pub trait Autostart {
    /// Registers the application's own executable to launch at login.
    fn enable(&self) -> Result<(), PlatformError>;

    /// Removes the registration. Already absent is not an error.
    fn disable(&self) -> Result<(), PlatformError>;

    fn status(&self) -> Result<bool, PlatformError>;
}

/// Serves as a cross-compatible Autostart implementation.
pub struct GenericAutostart {
    inner: Box<dyn Autostart>,
}

impl GenericAutostart {
    pub fn new() -> Result<Self, PlatformError> {
        cfg_if::cfg_if! {
            if #[cfg(windows)] {
                Ok(Self {
                    inner: Box::new(win::RegistryAutostart),
                })
            }
            else if #[cfg(target_os = "linux")] {
                Ok(Self {
                    inner: Box::new(xdg::XdgAutostart::new()?),
                })
            }
            else {
                // This runtime error is needed to allow the project to be compiled for during testing.
                unimplemented!("No autostart registration was specified")
            }
        }
    }
}

impl Autostart for GenericAutostart {
    fn enable(&self) -> Result<(), PlatformError> {
        self.inner.enable()
    }

    fn disable(&self) -> Result<(), PlatformError> {
        self.inner.disable()
    }

    fn status(&self) -> Result<bool, PlatformError> {
        self.inner.status()
    }
}
