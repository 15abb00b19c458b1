use notify_rust::{Notification, Urgency};

use crate::error::PlatformError;

/// Delivery seam for alarm pop-ups. The scheduler only knows this trait, so tests swap in a
/// mock and the core never assumes a desktop session exists.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send {
    fn notify(&self, summary: &str, body: &str) -> Result<(), PlatformError>;
}

/// Shows alarms through the desktop notification service. Critical urgency keeps the pop-up
/// on screen until the user dismisses it, which is what stands in for the original modal
/// alarm dialog.
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, summary: &str, body: &str) -> Result<(), PlatformError> {
        Notification::new()
            .summary(summary)
            .body(body)
            .urgency(Urgency::Critical)
            .show()
            .map(|_| ())
            .map_err(|e| PlatformError::Notification(e.to_string()))
    }
}
