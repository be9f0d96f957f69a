//! Modal alerts - blocking dialogs with a button row
//!
//! An [`Alert`] is a value type like a notification: builder-style copies,
//! no hidden state. Presenting one blocks until the user picks a button and
//! returns which one via [`AlertResponse`].

pub mod presenter;

pub use presenter::{AlertPresenter, DialogPresenter, TerminalPresenter};

use serde::{Deserialize, Serialize};

use crate::notification::message::Icon;

/// Visual severity of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    Informational,
    Warning,
    Critical,
}

impl Default for Style {
    fn default() -> Self {
        Style::Informational
    }
}

/// One alert button: label plus the keyboard key that triggers it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_equivalent: Option<String>,
}

impl Button {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            key_equivalent: None,
        }
    }

    pub fn with_key(label: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            key_equivalent: Some(key.into()),
        }
    }
}

/// Which button the user picked, by zero-based position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertResponse(usize);

impl AlertResponse {
    pub fn button(index: usize) -> Self {
        Self(index)
    }

    pub fn button_index(&self) -> usize {
        self.0
    }

    pub fn is_primary(&self) -> bool {
        self.0 == 0
    }

    pub fn is_secondary(&self) -> bool {
        self.0 == 1
    }

    pub fn is_tertiary(&self) -> bool {
        self.0 == 2
    }

    /// The first button confirms, whatever it is labelled.
    pub fn confirmed(&self) -> bool {
        self.is_primary()
    }

    pub fn dismissed(&self) -> bool {
        !self.is_primary()
    }
}

/// A modal alert message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub style: Style,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<Button>,
}

impl Alert {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            style: Style::Informational,
            icon: None,
            buttons: Vec::new(),
        }
    }

    /// Copy with the warning style.
    pub fn warning(&self) -> Self {
        let mut copy = self.clone();
        copy.style = Style::Warning;
        copy
    }

    /// Copy with the critical style.
    pub fn critical(&self) -> Self {
        let mut copy = self.clone();
        copy.style = Style::Critical;
        copy
    }

    /// Copy with "Yes" and "No" buttons appended; Return triggers "Yes".
    pub fn yes_no(&self) -> Self {
        self.adding(Button::with_key("Yes", "\r")).adding(Button::new("No"))
    }

    /// Copy with "Ok" and "Cancel" buttons appended; Return triggers "Ok".
    pub fn ok_cancel(&self) -> Self {
        self.adding(Button::with_key("Ok", "\r"))
            .adding(Button::new("Cancel"))
    }

    /// Append a button in place.
    pub fn add_button(&mut self, button: Button) {
        self.buttons.push(button);
    }

    /// Copy with the given button appended.
    pub fn adding(&self, button: Button) -> Self {
        let mut copy = self.clone();
        copy.add_button(button);
        copy
    }

    /// Copy with a plain labelled button appended.
    pub fn adding_button(&self, label: impl Into<String>) -> Self {
        self.adding(Button::new(label))
    }

    /// Copy with the given icon.
    pub fn adding_icon(&self, icon: Icon) -> Self {
        let mut copy = self.clone();
        copy.icon = Some(icon);
        copy
    }

    /// Present through the given presenter and block for the response.
    pub fn present_with(&self, presenter: &dyn AlertPresenter) -> anyhow::Result<AlertResponse> {
        presenter.present(self)
    }

    /// Present as a native dialog and block for the response.
    pub fn show(&self) -> anyhow::Result<AlertResponse> {
        self.present_with(&DialogPresenter::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_copies_leave_receiver_unchanged() {
        let base = Alert::new("Disk", "Disk is almost full");
        let warn = base.warning();
        let crit = base.critical();

        assert_eq!(base.style, Style::Informational);
        assert_eq!(warn.style, Style::Warning);
        assert_eq!(crit.style, Style::Critical);
    }

    #[test]
    fn test_yes_no_buttons() {
        let alert = Alert::new("Delete?", "This cannot be undone").yes_no();

        assert_eq!(alert.buttons.len(), 2);
        assert_eq!(alert.buttons[0].label, "Yes");
        assert_eq!(alert.buttons[0].key_equivalent.as_deref(), Some("\r"));
        assert_eq!(alert.buttons[1].label, "No");
        assert!(alert.buttons[1].key_equivalent.is_none());
    }

    #[test]
    fn test_ok_cancel_buttons() {
        let alert = Alert::new("Save?", "Unsaved changes").ok_cancel();

        assert_eq!(alert.buttons.len(), 2);
        assert_eq!(alert.buttons[0].label, "Ok");
        assert_eq!(alert.buttons[1].label, "Cancel");
    }

    #[test]
    fn test_adding_buttons_in_order() {
        let alert = Alert::new("Pick", "Pick one")
            .adding_button("First")
            .adding_button("Second")
            .adding(Button::with_key("Third", "3"));

        let labels: Vec<&str> = alert.buttons.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_response_helpers() {
        assert!(AlertResponse::button(0).is_primary());
        assert!(AlertResponse::button(0).confirmed());
        assert!(!AlertResponse::button(0).dismissed());

        assert!(AlertResponse::button(1).is_secondary());
        assert!(AlertResponse::button(1).dismissed());

        assert!(AlertResponse::button(2).is_tertiary());
        assert!(!AlertResponse::button(3).is_tertiary());
    }
}
