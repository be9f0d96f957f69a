//! Desktop backend - native notifications via notify-rust
//!
//! Works on Windows, macOS, and Linux. Extra actions and button titles are
//! wired up where the platform notification server supports them (XDG) and
//! ignored elsewhere.

use anyhow::{Context, Result};
use tracing::debug;

use crate::notification::backend::{NativeNotification, NotificationBackend};

/// Delivers through the operating system's notification center.
pub struct DesktopBackend;

impl DesktopBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DesktopBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationBackend for DesktopBackend {
    fn name(&self) -> &str {
        "desktop"
    }

    fn deliver(&self, notification: &NativeNotification) -> Result<()> {
        let mut toast = notify_rust::Notification::new();
        toast
            .appname(&notification.app_name)
            .summary(&notification.title)
            .body(&notification.body);

        if let Some(icon) = &notification.icon {
            toast.icon(&icon.resolve());
        }

        #[cfg(all(unix, not(target_os = "macos")))]
        {
            if let Some(title) = &notification.action_button {
                toast.action("default", title);
            }
            for action in &notification.actions {
                toast.action(&action.id, &action.label);
            }
        }

        toast
            .show()
            .with_context(|| format!("failed to deliver notification {}", notification.identifier))?;

        debug!(
            backend = "desktop",
            identifier = %notification.identifier,
            "Notification handed to the OS"
        );
        Ok(())
    }
}
