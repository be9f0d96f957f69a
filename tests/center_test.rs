//! Notification center integration tests - send pipeline end to end

use anyhow::Result;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use herald::{
    BaseDescriptor, CenterBuilder, Descriptor, NativeNotification, Notification,
    NotificationBackend, NotificationCenter, SuppressionFlag,
};

struct RecordingBackend {
    delivered: Mutex<Vec<NativeNotification>>,
}

impl RecordingBackend {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            delivered: Mutex::new(Vec::new()),
        })
    }

    fn identifiers(&self) -> Vec<String> {
        self.delivered
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.identifier.clone())
            .collect()
    }
}

impl NotificationBackend for RecordingBackend {
    fn name(&self) -> &str {
        "recording"
    }

    fn deliver(&self, notification: &NativeNotification) -> Result<()> {
        self.delivered.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

fn center_with(backend: Arc<RecordingBackend>) -> NotificationCenter {
    CenterBuilder::new()
        .app_name("itest")
        .backend(backend)
        .without_config_file()
        .build()
}

#[tokio::test]
async fn test_repeated_send_resolves_to_identical_identifier() {
    let backend = RecordingBackend::new();
    let center = center_with(Arc::clone(&backend));
    let note = Notification::new("build-finished", "Build", "Done");

    let first = center.send(&note).unwrap().unwrap();
    let second = center.send(&note).unwrap().unwrap();

    assert_eq!(first.identifier, second.identifier);
    assert_eq!(backend.identifiers().len(), 2);
}

#[tokio::test]
async fn test_spam_sends_differ_and_advance_counter_by_one() {
    let backend = RecordingBackend::new();
    let center = center_with(Arc::clone(&backend));
    let note = Notification::new("progress", "Progress", "Step done").allowing_spam(true);

    let first = center.send(&note).unwrap().unwrap();
    let counter_between = center.registry().counter();
    let second = center.send(&note).unwrap().unwrap();

    assert_ne!(first.identifier, second.identifier);
    assert_eq!(center.registry().counter(), counter_between + 1);
}

#[tokio::test]
async fn test_suppressed_send_produces_nothing_and_does_not_mutate_registry() {
    let backend = RecordingBackend::new();
    let flag = SuppressionFlag::new();
    let center = CenterBuilder::new()
        .app_name("itest")
        .backend(Arc::clone(&backend) as Arc<dyn NotificationBackend>)
        .suppression(flag.clone())
        .without_config_file()
        .build();

    flag.set(true);
    let sent = center
        .send(&Notification::new("quiet", "Quiet", "Nothing"))
        .unwrap();

    assert!(sent.is_none());
    assert!(backend.identifiers().is_empty());
    assert!(center.registry().is_empty());
    assert_eq!(center.registry().counter(), 0);
}

#[tokio::test]
async fn test_descriptor_send_uses_same_pipeline() {
    let backend = RecordingBackend::new();
    let center = center_with(Arc::clone(&backend));

    let descriptor = Descriptor::from(BaseDescriptor::new("sync-done", "Sync", "All synced"));
    let first = center.send_descriptor(&descriptor).unwrap().unwrap();
    let second = center.send_descriptor(&descriptor).unwrap().unwrap();

    assert_eq!(first.identifier, "itest.sync-done");
    assert_eq!(first.identifier, second.identifier);
}

#[tokio::test]
async fn test_scheduled_send_defers_delivery() {
    let backend = RecordingBackend::new();
    let center = center_with(Arc::clone(&backend));

    let at = chrono::Utc::now() + chrono::Duration::milliseconds(120);
    let note = Notification::new("reminder", "Reminder", "Time").adding_scheduled_time(at);

    center.send(&note).unwrap().unwrap();
    assert!(backend.identifiers().is_empty());

    tokio::time::sleep(Duration::from_millis(350)).await;
    assert_eq!(backend.identifiers().len(), 1);
}

#[tokio::test]
async fn test_journal_records_deliveries() {
    let tmp = tempfile::tempdir().unwrap();
    let backend = RecordingBackend::new();
    let center = CenterBuilder::new()
        .app_name("itest")
        .backend(Arc::clone(&backend) as Arc<dyn NotificationBackend>)
        .journal(true)
        .journal_dir(tmp.path())
        .without_config_file()
        .build();

    center
        .send(&Notification::new("logged", "Logged", "Body"))
        .unwrap();

    let journal = herald::Journal::at(tmp.path());
    let records = journal.read_recent(10);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].logical_id, "logged");
    assert_eq!(records[0].identifier, "itest.logged");
}
