//! Notification value type
//!
//! An immutable-style description of what to present. The `adding_*`
//! operations return a modified copy and leave the receiver unchanged, so a
//! base notification can be kept around and specialized per send.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Icon attached to a notification or alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    /// Freedesktop theme icon name (e.g. `dialog-information`).
    Named(String),
    /// Path to an image file on disk.
    Path(PathBuf),
}

impl Icon {
    pub fn info() -> Self {
        Icon::Named("dialog-information".to_string())
    }

    pub fn warning() -> Self {
        Icon::Named("dialog-warning".to_string())
    }

    pub fn error() -> Self {
        Icon::Named("dialog-error".to_string())
    }

    /// The string handed to the presentation layer.
    pub fn resolve(&self) -> String {
        match self {
            Icon::Named(name) => name.clone(),
            Icon::Path(path) => path.to_string_lossy().to_string(),
        }
    }
}

/// An extra action offered on a notification: action id plus display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub id: String,
    pub label: String,
}

impl Action {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Everything needed to present one notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Caller-chosen stable id naming "the same" notification across sends.
    pub id: String,
    /// Title line.
    pub title: String,
    /// Body text with the details.
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    /// Deliver at this moment instead of immediately.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_button: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_button: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<Action>,
    /// An empty placeholder shows a bare reply button.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_placeholder: Option<String>,
    /// Free-form data passed through to whoever handles the notification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
    /// Allow several concurrently visible deliveries of this logical id.
    #[serde(default)]
    pub allows_spam: bool,
    /// Append a random suffix to newly minted delivery identifiers.
    #[serde(default)]
    pub randomize_id: bool,
}

impl Notification {
    pub fn new(id: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body: body.into(),
            icon: None,
            scheduled_time: None,
            action_button: None,
            close_button: None,
            actions: Vec::new(),
            reply_placeholder: None,
            tags: None,
            allows_spam: false,
            randomize_id: false,
        }
    }

    /// Copy with the given icon.
    pub fn adding_icon(&self, icon: Icon) -> Self {
        let mut copy = self.clone();
        copy.icon = Some(icon);
        copy
    }

    /// Copy scheduled for a specific delivery time.
    pub fn adding_scheduled_time(&self, time: DateTime<Utc>) -> Self {
        let mut copy = self.clone();
        copy.scheduled_time = Some(time);
        copy
    }

    /// Copy with an action button carrying the given title.
    pub fn adding_action_button(&self, title: impl Into<String>) -> Self {
        let mut copy = self.clone();
        copy.action_button = Some(title.into());
        copy
    }

    /// Copy with a close button carrying the given title.
    pub fn adding_close_button(&self, title: impl Into<String>) -> Self {
        let mut copy = self.clone();
        copy.close_button = Some(title.into());
        copy
    }

    /// Copy with a reply button; the placeholder may be empty.
    pub fn adding_reply_placeholder(&self, text: impl Into<String>) -> Self {
        let mut copy = self.clone();
        copy.reply_placeholder = Some(text.into());
        copy
    }

    /// Copy with the given tag map, replacing any existing one.
    pub fn adding_tags(&self, tags: BTreeMap<String, String>) -> Self {
        let mut copy = self.clone();
        copy.tags = Some(tags);
        copy
    }

    /// Copy with one tag added.
    pub fn adding_tag(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut copy = self.clone();
        copy.tags
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        copy
    }

    /// Append an extra action in place.
    pub fn add_action(&mut self, action: Action) {
        self.actions.push(action);
    }

    /// Copy with an extra action appended.
    pub fn adding_action(&self, action: Action) -> Self {
        let mut copy = self.clone();
        copy.add_action(action);
        copy
    }

    /// Copy with an extra action built from id and display name.
    pub fn adding_action_with(&self, id: impl Into<String>, label: impl Into<String>) -> Self {
        self.adding_action(Action::new(id, label))
    }

    /// Copy with spam mode set.
    pub fn allowing_spam(&self, value: bool) -> Self {
        let mut copy = self.clone();
        copy.allows_spam = value;
        copy
    }

    /// Copy with identifier randomization set.
    pub fn randomizing_id(&self, value: bool) -> Self {
        let mut copy = self.clone();
        copy.randomize_id = value;
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adding_leaves_receiver_unchanged() {
        let base = Notification::new("build-finished", "Build finished", "All targets built");

        let specialized = base
            .adding_action_button("Open log")
            .adding_tag("target", "release")
            .allowing_spam(true);

        assert!(base.action_button.is_none());
        assert!(base.tags.is_none());
        assert!(!base.allows_spam);

        assert_eq!(specialized.action_button.as_deref(), Some("Open log"));
        assert_eq!(
            specialized.tags.as_ref().and_then(|t| t.get("target").cloned()),
            Some("release".to_string())
        );
        assert!(specialized.allows_spam);
    }

    #[test]
    fn test_adding_tag_extends_existing_map() {
        let note = Notification::new("n", "t", "b")
            .adding_tag("a", "1")
            .adding_tag("b", "2");

        let tags = note.tags.unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags.get("a"), Some(&"1".to_string()));
        assert_eq!(tags.get("b"), Some(&"2".to_string()));
    }

    #[test]
    fn test_adding_actions() {
        let note = Notification::new("n", "t", "b")
            .adding_action_with("open", "Open")
            .adding_action(Action::new("dismiss", "Dismiss"));

        assert_eq!(note.actions.len(), 2);
        assert_eq!(note.actions[0].id, "open");
        assert_eq!(note.actions[1].label, "Dismiss");
    }

    #[test]
    fn test_equality_covers_all_fields() {
        let a = Notification::new("n", "t", "b").adding_icon(Icon::info());
        let b = Notification::new("n", "t", "b").adding_icon(Icon::info());
        let c = b.adding_close_button("Close");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_icon_resolve() {
        assert_eq!(Icon::info().resolve(), "dialog-information");
        assert_eq!(
            Icon::Path(PathBuf::from("/tmp/icon.png")).resolve(),
            "/tmp/icon.png"
        );
    }

    #[test]
    fn test_serialization_skips_empty_fields() {
        let note = Notification::new("n", "t", "b");
        let json = serde_json::to_string(&note).unwrap();

        assert!(!json.contains("icon"));
        assert!(!json.contains("scheduled_time"));
        assert!(!json.contains("actions"));

        let parsed: Notification = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, note);
    }
}
