//! Descriptor variants - compact notification inputs
//!
//! A descriptor carries just enough to present a notification. The two
//! capability levels are modelled as a tagged variant rather than separate
//! downcast-checked types: `Base` for plain text notifications, `WithImage`
//! when an icon should be shown.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::message::{Icon, Notification};

/// Minimal notification input: text only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseDescriptor {
    pub id: String,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub allows_spam: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<DateTime<Utc>>,
}

impl BaseDescriptor {
    pub fn new(id: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body: body.into(),
            allows_spam: false,
            scheduled_time: None,
        }
    }
}

/// Notification input that also carries an icon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    pub id: String,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub allows_spam: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<DateTime<Utc>>,
    pub icon: Icon,
}

impl ImageDescriptor {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
        icon: Icon,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body: body.into(),
            allows_spam: false,
            scheduled_time: None,
            icon,
        }
    }
}

/// The two descriptor capability levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Descriptor {
    Base(BaseDescriptor),
    WithImage(ImageDescriptor),
}

impl Descriptor {
    pub fn id(&self) -> &str {
        match self {
            Descriptor::Base(d) => &d.id,
            Descriptor::WithImage(d) => &d.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Descriptor::Base(d) => &d.title,
            Descriptor::WithImage(d) => &d.title,
        }
    }

    pub fn body(&self) -> &str {
        match self {
            Descriptor::Base(d) => &d.body,
            Descriptor::WithImage(d) => &d.body,
        }
    }

    pub fn allows_spam(&self) -> bool {
        match self {
            Descriptor::Base(d) => d.allows_spam,
            Descriptor::WithImage(d) => d.allows_spam,
        }
    }

    pub fn scheduled_time(&self) -> Option<DateTime<Utc>> {
        match self {
            Descriptor::Base(d) => d.scheduled_time,
            Descriptor::WithImage(d) => d.scheduled_time,
        }
    }

    pub fn icon(&self) -> Option<&Icon> {
        match self {
            Descriptor::Base(_) => None,
            Descriptor::WithImage(d) => Some(&d.icon),
        }
    }

    /// Expand into a full [`Notification`] for the send pipeline.
    pub fn to_notification(&self) -> Notification {
        let mut note = Notification::new(self.id(), self.title(), self.body());
        note.allows_spam = self.allows_spam();
        note.scheduled_time = self.scheduled_time();
        note.icon = self.icon().cloned();
        note
    }
}

impl From<BaseDescriptor> for Descriptor {
    fn from(descriptor: BaseDescriptor) -> Self {
        Descriptor::Base(descriptor)
    }
}

impl From<ImageDescriptor> for Descriptor {
    fn from(descriptor: ImageDescriptor) -> Self {
        Descriptor::WithImage(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_descriptor_expands_without_icon() {
        let descriptor: Descriptor = BaseDescriptor::new("sync-done", "Sync", "All files synced").into();

        let note = descriptor.to_notification();
        assert_eq!(note.id, "sync-done");
        assert_eq!(note.title, "Sync");
        assert!(note.icon.is_none());
        assert!(!note.allows_spam);
    }

    #[test]
    fn test_image_descriptor_carries_icon() {
        let descriptor: Descriptor =
            ImageDescriptor::new("warn", "Careful", "Disk almost full", Icon::warning()).into();

        assert_eq!(descriptor.icon(), Some(&Icon::warning()));
        let note = descriptor.to_notification();
        assert_eq!(note.icon, Some(Icon::warning()));
    }

    #[test]
    fn test_spam_flag_flows_through() {
        let mut base = BaseDescriptor::new("dl", "Download", "Done");
        base.allows_spam = true;
        let descriptor = Descriptor::from(base);

        assert!(descriptor.allows_spam());
        assert!(descriptor.to_notification().allows_spam);
    }

    #[test]
    fn test_tagged_serialization() {
        let descriptor: Descriptor = BaseDescriptor::new("n", "t", "b").into();
        let json = serde_json::to_string(&descriptor).unwrap();

        assert!(json.contains(r#""kind":"base""#));

        let parsed: Descriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, descriptor);
    }
}
