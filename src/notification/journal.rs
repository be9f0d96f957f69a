//! Delivery journal - local JSONL record of handed-off notifications

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::backend::NativeNotification;

/// One journalled delivery (JSONL format).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryRecord {
    /// ISO8601 timestamp of the hand-off.
    pub ts: DateTime<Utc>,
    /// Caller-chosen logical id.
    pub logical_id: String,
    /// Identifier the OS received.
    pub identifier: String,
    /// Truncated title.
    pub title: String,
    /// Whether the delivery went through the deferred path.
    #[serde(default)]
    pub scheduled: bool,
}

impl DeliveryRecord {
    pub fn from_native(logical_id: &str, notification: &NativeNotification) -> Self {
        Self {
            ts: Utc::now(),
            logical_id: logical_id.to_string(),
            identifier: notification.identifier.clone(),
            title: truncate(&notification.title, 100),
            scheduled: notification.scheduled_time.is_some(),
        }
    }
}

const MAX_RECORDS: usize = 200;
const KEEP_AFTER_CLEANUP: usize = 100;
const CLEANUP_CHECK_INTERVAL: usize = 10;

/// Append-only JSONL journal with a size-bounded cleanup.
pub struct Journal {
    dir: PathBuf,
    write_count: AtomicUsize,
}

impl Journal {
    /// Journal under the user config directory.
    pub fn new() -> Self {
        let dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("herald");
        Self::at(dir)
    }

    /// Journal rooted at a specific directory.
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_count: AtomicUsize::new(0),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join("journal.jsonl")
    }

    /// Append one record, holding an exclusive file lock for the write.
    pub fn append(&self, record: &DeliveryRecord) -> Result<()> {
        use fs2::FileExt;

        let path = self.path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        file.lock_exclusive()?;
        let mut file = file;
        writeln!(file, "{}", serde_json::to_string(record)?)?;
        file.unlock()?;

        self.maybe_cleanup();
        Ok(())
    }

    /// Read the most recent `n` records, oldest first.
    pub fn read_recent(&self, n: usize) -> Vec<DeliveryRecord> {
        let path = self.path();
        if !path.exists() {
            return Vec::new();
        }

        let file = match File::open(&path) {
            Ok(f) => f,
            Err(_) => return Vec::new(),
        };

        let reader = BufReader::new(file);
        let records: Vec<DeliveryRecord> = reader
            .lines()
            .filter_map(|line| line.ok())
            .filter_map(|line| serde_json::from_str(&line).ok())
            .collect();

        let start = records.len().saturating_sub(n);
        let mut recent = records[start..].to_vec();
        recent.sort_by_key(|r| r.ts);
        recent
    }

    fn maybe_cleanup(&self) {
        let count = self.write_count.fetch_add(1, Ordering::Relaxed);
        if count % CLEANUP_CHECK_INTERVAL != 0 {
            return;
        }

        let path = self.path();
        if let Ok(metadata) = fs::metadata(&path) {
            // Rough line estimate: ~150 bytes per record.
            let estimated_lines = metadata.len() as usize / 150;
            if estimated_lines > MAX_RECORDS {
                let _ = self.cleanup();
            }
        }
    }

    fn cleanup(&self) -> Result<()> {
        use fs2::FileExt;

        let path = self.path();
        let file = File::open(&path)?;
        file.lock_exclusive()?;

        let reader = BufReader::new(&file);
        let records: Vec<DeliveryRecord> = reader
            .lines()
            .filter_map(|line| line.ok())
            .filter_map(|line| serde_json::from_str(&line).ok())
            .collect();

        if records.len() <= MAX_RECORDS {
            file.unlock()?;
            return Ok(());
        }

        let start = records.len().saturating_sub(KEEP_AFTER_CLEANUP);
        let to_keep = &records[start..];

        let temp_path = path.with_extension("tmp");
        {
            let mut temp_file = File::create(&temp_path)?;
            for record in to_keep {
                writeln!(temp_file, "{}", serde_json::to_string(record)?)?;
            }
        }
        fs::rename(&temp_path, &path)?;

        file.unlock()?;
        Ok(())
    }
}

impl Default for Journal {
    fn default() -> Self {
        Self::new()
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(logical_id: &str, identifier: &str) -> DeliveryRecord {
        DeliveryRecord {
            ts: Utc::now(),
            logical_id: logical_id.to_string(),
            identifier: identifier.to_string(),
            title: "title".to_string(),
            scheduled: false,
        }
    }

    #[test]
    fn test_append_then_read_recent() {
        let tmp = tempfile::tempdir().unwrap();
        let journal = Journal::at(tmp.path());

        journal.append(&record("a", "app.a")).unwrap();
        journal.append(&record("b", "app.b")).unwrap();

        let recent = journal.read_recent(10);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].logical_id, "a");
        assert_eq!(recent[1].identifier, "app.b");
    }

    #[test]
    fn test_read_recent_limits_count() {
        let tmp = tempfile::tempdir().unwrap();
        let journal = Journal::at(tmp.path());

        for i in 0..5 {
            journal.append(&record(&format!("id-{i}"), "x")).unwrap();
        }

        let recent = journal.read_recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].logical_id, "id-3");
        assert_eq!(recent[1].logical_id, "id-4");
    }

    #[test]
    fn test_read_recent_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let journal = Journal::at(tmp.path().join("nowhere"));
        assert!(journal.read_recent(10).is_empty());
    }

    #[test]
    fn test_record_serialization_backward_compat() {
        // Records without the scheduled flag still parse.
        let old_json = r#"{"ts":"2026-02-24T08:20:52Z","logical_id":"build","identifier":"app.build","title":"Build"}"#;
        let record: DeliveryRecord = serde_json::from_str(old_json).unwrap();
        assert_eq!(record.logical_id, "build");
        assert!(!record.scheduled);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long message", 10), "this is...");
    }
}
