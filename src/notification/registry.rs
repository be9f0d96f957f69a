//! Notification identity registry - deduplicates delivery identifiers
//!
//! Tracks, per logical notification id, the delivery identifier handed to the
//! OS and when it was minted. Repeated sends of the same logical id reuse the
//! stored identifier so the notification center coalesces them; spam-allowed
//! sends mint a fresh counter-suffixed identifier instead. Stale entries are
//! removed by a periodic sweep task that starts on first registration and
//! cancels itself once the registry drains.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;

/// How long a delivery identifier is tracked after it was minted.
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(120);

const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// How entry age is compared against the retention threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryPolicy {
    /// Entry expires once its age reaches the retention threshold.
    Elapsed,
    /// Compares the minute-of-hour of the entry age against the retention
    /// threshold in whole minutes: `(age_secs / 60) % 60 >= retention_min`.
    /// The computation wraps every hour, so entries aged just past a whole
    /// hour (e.g. 60-61 minutes with the default threshold) read as fresh
    /// again and are retained until the wrapped minute count catches up.
    /// Only useful as a compatibility mode for callers that depend on that
    /// wrap-around; `Elapsed` is the default.
    MinuteOfHour,
}

impl ExpiryPolicy {
    fn is_expired(&self, age: Duration, retention: Duration) -> bool {
        match self {
            ExpiryPolicy::Elapsed => age >= retention,
            ExpiryPolicy::MinuteOfHour => {
                let retention_minutes = retention.as_secs() / 60;
                (age.as_secs() / 60) % 60 >= retention_minutes
            }
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    /// Set when the identifier was minted; not refreshed by non-spam reuse.
    last_seen: Instant,
    /// Immutable for the lifetime of the entry.
    identifier: String,
}

struct RegistryInner {
    entries: HashMap<String, Entry>,
    counter: u64,
    sweeper: Option<JoinHandle<()>>,
}

/// Identifier registry with a self-cancelling periodic sweep.
///
/// Expects a Tokio runtime: the sweep task is spawned on first registration.
pub struct Registry {
    inner: Arc<Mutex<RegistryInner>>,
    prefix: String,
    retention: Duration,
    sweep_interval: Duration,
    policy: ExpiryPolicy,
}

fn lock(inner: &Mutex<RegistryInner>) -> MutexGuard<'_, RegistryInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Registry {
    /// Create a registry whose identifiers start with `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RegistryInner {
                entries: HashMap::new(),
                counter: 0,
                sweeper: None,
            })),
            prefix: prefix.into(),
            retention: DEFAULT_RETENTION,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            policy: ExpiryPolicy::Elapsed,
        }
    }

    /// Set how long entries are tracked before the sweep removes them.
    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    /// Set how often the sweep task ticks.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Select the expiry policy.
    pub fn with_expiry(mut self, policy: ExpiryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Resolve the delivery identifier for `logical_id`.
    ///
    /// Non-spam requests reuse a stored identifier whatever its origin;
    /// spam requests always mint a fresh counter-suffixed identifier and
    /// overwrite the entry, so only the latest identifier per logical id is
    /// tracked.
    pub fn register(&self, logical_id: &str, allows_spam: bool) -> String {
        self.register_with(logical_id, allows_spam, false)
    }

    /// Like [`register`](Self::register), optionally appending a random
    /// suffix to newly minted identifiers.
    pub fn register_with(&self, logical_id: &str, allows_spam: bool, randomize: bool) -> String {
        let mut inner = lock(&self.inner);

        if !allows_spam {
            if let Some(entry) = inner.entries.get(logical_id) {
                debug!(
                    id = %logical_id,
                    identifier = %entry.identifier,
                    "Reusing tracked delivery identifier"
                );
                return entry.identifier.clone();
            }
        }

        let mut identifier = format!("{}{}", self.prefix, logical_id);
        if randomize {
            identifier.push_str(&Uuid::new_v4().simple().to_string());
        }
        if allows_spam {
            identifier.push_str(&inner.counter.to_string());
        }

        inner.counter += 1;
        inner.entries.insert(
            logical_id.to_string(),
            Entry {
                last_seen: Instant::now(),
                identifier: identifier.clone(),
            },
        );
        debug!(id = %logical_id, identifier = %identifier, "Minted delivery identifier");

        self.ensure_sweeper(&mut inner);
        identifier
    }

    /// Stored identifier for `logical_id`, if still tracked.
    pub fn identifier_for(&self, logical_id: &str) -> Option<String> {
        lock(&self.inner)
            .entries
            .get(logical_id)
            .map(|e| e.identifier.clone())
    }

    /// Number of tracked entries.
    pub fn len(&self) -> usize {
        lock(&self.inner).entries.len()
    }

    /// True when no entries are tracked.
    pub fn is_empty(&self) -> bool {
        lock(&self.inner).entries.is_empty()
    }

    /// Total identifiers minted so far.
    pub fn counter(&self) -> u64 {
        lock(&self.inner).counter
    }

    /// True while the periodic sweep task is running.
    pub fn is_sweeping(&self) -> bool {
        lock(&self.inner).sweeper.is_some()
    }

    /// Run one expiry pass immediately.
    pub fn sweep(&self) {
        let mut inner = lock(&self.inner);
        Self::sweep_locked(&mut inner, self.policy, self.retention);
    }

    /// Cancel the sweep task and drop all entries.
    pub fn dispose(&self) {
        let mut inner = lock(&self.inner);
        if let Some(handle) = inner.sweeper.take() {
            handle.abort();
        }
        inner.entries.clear();
    }

    fn sweep_locked(inner: &mut RegistryInner, policy: ExpiryPolicy, retention: Duration) {
        let before = inner.entries.len();
        inner
            .entries
            .retain(|_, entry| !policy.is_expired(entry.last_seen.elapsed(), retention));
        let swept = before - inner.entries.len();
        if swept > 0 {
            debug!(swept, remaining = inner.entries.len(), "Swept stale notification entries");
        }
    }

    fn ensure_sweeper(&self, inner: &mut RegistryInner) {
        if inner.sweeper.is_some() {
            return;
        }

        let shared = Arc::clone(&self.inner);
        let policy = self.policy;
        let retention = self.retention;
        let interval = self.sweep_interval;

        inner.sweeper = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let mut inner = lock(&shared);
                Self::sweep_locked(&mut inner, policy, retention);
                if inner.entries.is_empty() {
                    // Registry drained: stop ticking and clear the handle so
                    // the next registration restarts the sweep.
                    inner.sweeper = None;
                    debug!("Registry empty, sweep task stopped");
                    break;
                }
            }
        }));
    }
}

impl Drop for Registry {
    fn drop(&mut self) {
        if let Some(handle) = lock(&self.inner).sweeper.take() {
            handle.abort();
        }
    }
}
