//! Backend trait and the native presentation payload

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::message::{Action, Icon};

/// A fully resolved notification, ready to hand to the OS.
///
/// This is what [`NotificationCenter::create`](super::center::NotificationCenter::create)
/// produces: every message field transcribed verbatim plus the delivery
/// identifier resolved through the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeNotification {
    /// Registry-resolved identifier the OS coalesces on.
    pub identifier: String,
    pub app_name: String,
    pub title: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_button: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_button: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<Action>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
}

/// Presentation backend a notification center delivers through.
pub trait NotificationBackend: Send + Sync {
    /// Backend name, for logs.
    fn name(&self) -> &str;

    /// Hand the prepared notification to the presentation layer.
    fn deliver(&self, notification: &NativeNotification) -> Result<()>;
}
