//! Notification center - owns the registry and the send pipeline
//!
//! The center is an explicitly owned context object: registry, suppression
//! flag, backend and journal all live on it, and callers pass it around
//! instead of reaching for process globals. `create` resolves the delivery
//! identifier and transcribes the message onto the native payload; `send`
//! additionally hands the payload to the backend, immediately or at the
//! scheduled time.

use anyhow::Result;
use chrono::Utc;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::backend::{NativeNotification, NotificationBackend};
use super::backends::DesktopBackend;
use super::descriptor::Descriptor;
use super::journal::{DeliveryRecord, Journal};
use super::message::Notification;
use super::registry::{ExpiryPolicy, Registry};

/// Shared handle gating all sends.
///
/// While active, `send` skips delivery entirely and leaves the registry
/// untouched. Clone the handle and hand it to whatever part of the program
/// decides when the machine is in a state where notifications would be noise.
#[derive(Debug, Clone, Default)]
pub struct SuppressionFlag(Arc<AtomicBool>);

impl SuppressionFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, suppressed: bool) {
        self.0.store(suppressed, Ordering::Relaxed);
    }

    pub fn is_active(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Optional on-disk configuration, `~/.config/herald/config.json`.
#[derive(Debug, Clone, Default, Deserialize)]
struct CenterConfig {
    app_name: Option<String>,
    journal: Option<bool>,
    retention_secs: Option<u64>,
}

fn detect_config() -> Option<CenterConfig> {
    let path = dirs::home_dir()?.join(".config/herald/config.json");
    if !path.exists() {
        return None;
    }
    let content = std::fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Ignoring unreadable config file");
            None
        }
    }
}

/// Builder for [`NotificationCenter`].
pub struct CenterBuilder {
    app_name: Option<String>,
    retention: Option<Duration>,
    expiry: ExpiryPolicy,
    suppression: SuppressionFlag,
    backend: Option<Arc<dyn NotificationBackend>>,
    journal: Option<bool>,
    journal_dir: Option<PathBuf>,
    dry_run: bool,
    read_config: bool,
}

impl CenterBuilder {
    pub fn new() -> Self {
        Self {
            app_name: None,
            retention: None,
            expiry: ExpiryPolicy::Elapsed,
            suppression: SuppressionFlag::new(),
            backend: None,
            journal: None,
            journal_dir: None,
            dry_run: false,
            read_config: true,
        }
    }

    /// Application name used as the identifier prefix and backend app name.
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }

    /// Registry retention window.
    pub fn retention(mut self, retention: Duration) -> Self {
        self.retention = Some(retention);
        self
    }

    /// Registry expiry policy.
    pub fn expiry(mut self, policy: ExpiryPolicy) -> Self {
        self.expiry = policy;
        self
    }

    /// Share an externally owned suppression flag.
    pub fn suppression(mut self, flag: SuppressionFlag) -> Self {
        self.suppression = flag;
        self
    }

    /// Replace the default desktop backend.
    pub fn backend(mut self, backend: Arc<dyn NotificationBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Journal deliveries to the local JSONL file.
    pub fn journal(mut self, enable: bool) -> Self {
        self.journal = Some(enable);
        self
    }

    /// Root directory for the journal (defaults to the user config dir).
    pub fn journal_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.journal_dir = Some(dir.into());
        self
    }

    /// Log deliveries instead of performing them.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Skip the on-disk config file.
    pub fn without_config_file(mut self) -> Self {
        self.read_config = false;
        self
    }

    pub fn build(self) -> NotificationCenter {
        let config = if self.read_config {
            detect_config().unwrap_or_default()
        } else {
            CenterConfig::default()
        };

        let app_name = self
            .app_name
            .or(config.app_name)
            .unwrap_or_else(|| "herald".to_string());
        let retention = self
            .retention
            .or(config.retention_secs.map(Duration::from_secs))
            .unwrap_or(super::registry::DEFAULT_RETENTION);
        let journal_enabled = self.journal.or(config.journal).unwrap_or(false);

        let journal = journal_enabled.then(|| match self.journal_dir {
            Some(dir) => Journal::at(dir),
            None => Journal::new(),
        });

        let registry = Registry::new(format!("{app_name}."))
            .with_retention(retention)
            .with_expiry(self.expiry);

        let backend = self
            .backend
            .unwrap_or_else(|| Arc::new(DesktopBackend::new()));

        info!(
            app_name = %app_name,
            backend = backend.name(),
            retention_secs = retention.as_secs(),
            "Notification center ready"
        );

        NotificationCenter {
            app_name,
            registry,
            backend,
            suppression: self.suppression,
            journal,
            dry_run: self.dry_run,
        }
    }
}

impl Default for CenterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Deduplicating front door to the OS notification surface.
pub struct NotificationCenter {
    app_name: String,
    registry: Registry,
    backend: Arc<dyn NotificationBackend>,
    suppression: SuppressionFlag,
    journal: Option<Journal>,
    dry_run: bool,
}

impl NotificationCenter {
    pub fn builder() -> CenterBuilder {
        CenterBuilder::new()
    }

    /// Center with default settings.
    pub fn new() -> Self {
        CenterBuilder::new().build()
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn suppression(&self) -> &SuppressionFlag {
        &self.suppression
    }

    /// Resolve the delivery identifier and transcribe the message onto the
    /// native payload. Registers the logical id as a side effect.
    pub fn create(&self, notification: &Notification) -> NativeNotification {
        let identifier = self.registry.register_with(
            &notification.id,
            notification.allows_spam,
            notification.randomize_id,
        );

        NativeNotification {
            identifier,
            app_name: self.app_name.clone(),
            title: notification.title.clone(),
            body: notification.body.clone(),
            icon: notification.icon.clone(),
            scheduled_time: notification.scheduled_time,
            action_button: notification.action_button.clone(),
            close_button: notification.close_button.clone(),
            actions: notification.actions.clone(),
            reply_placeholder: notification.reply_placeholder.clone(),
            tags: notification.tags.clone(),
        }
    }

    /// Create and hand off. Returns the payload the OS received, or `None`
    /// when suppression is active. A future scheduled time goes through the
    /// deferred path and the call returns immediately; nothing tracks
    /// whether the deferred delivery later fires.
    pub fn send(&self, notification: &Notification) -> Result<Option<NativeNotification>> {
        if self.suppression.is_active() {
            info!(id = %notification.id, "Suppression active, notification not sent");
            return Ok(None);
        }

        let native = self.create(notification);

        if self.dry_run {
            info!(
                identifier = %native.identifier,
                backend = self.backend.name(),
                "[dry-run] Would deliver notification"
            );
            return Ok(Some(native));
        }

        match native.scheduled_time {
            Some(at) if at > Utc::now() => self.deliver_later(native.clone(), at),
            _ => self.backend.deliver(&native)?,
        }

        if let Some(journal) = &self.journal {
            if let Err(e) = journal.append(&DeliveryRecord::from_native(&notification.id, &native)) {
                warn!(error = %e, "Failed to journal delivery");
            }
        }

        Ok(Some(native))
    }

    /// Send and discard the payload, logging failures instead of returning
    /// them.
    pub fn just_send(&self, notification: &Notification) {
        if let Err(e) = self.send(notification) {
            warn!(id = %notification.id, error = %e, "Notification delivery failed");
        }
    }

    /// Send a descriptor through the same pipeline.
    pub fn send_descriptor(&self, descriptor: &Descriptor) -> Result<Option<NativeNotification>> {
        self.send(&descriptor.to_notification())
    }

    /// Cancel the sweep task and drop all registry entries.
    pub fn dispose(&self) {
        self.registry.dispose();
    }

    fn deliver_later(&self, native: NativeNotification, at: chrono::DateTime<Utc>) {
        let backend = Arc::clone(&self.backend);
        let delay = (at - Utc::now()).to_std().unwrap_or(Duration::ZERO);
        debug!(
            identifier = %native.identifier,
            delay_secs = delay.as_secs(),
            "Deferring notification delivery"
        );

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let identifier = native.identifier.clone();
            // The backend call can block on the OS, keep it off the runtime.
            let outcome = tokio::task::spawn_blocking(move || backend.deliver(&native)).await;
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(identifier = %identifier, error = %e, "Deferred delivery failed"),
                Err(e) => warn!(identifier = %identifier, error = %e, "Deferred delivery task failed"),
            }
        });
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}
