//! Alert presenters - native dialog and terminal fallback

use anyhow::{Context, Result};
use dialoguer::{Confirm, Select};
use tracing::warn;

use super::{Alert, AlertResponse, Style};

/// Blocking presentation seam for alerts.
pub trait AlertPresenter {
    /// Presenter name, for logs.
    fn name(&self) -> &str;

    /// Show the alert and block until the user picks a button.
    fn present(&self, alert: &Alert) -> Result<AlertResponse>;
}

/// Native message dialog.
///
/// The platform dialog fits at most three buttons; extra buttons are dropped
/// with a warning. An alert without buttons shows a plain "Ok" dialog.
pub struct DialogPresenter;

impl DialogPresenter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DialogPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertPresenter for DialogPresenter {
    fn name(&self) -> &str {
        "dialog"
    }

    fn present(&self, alert: &Alert) -> Result<AlertResponse> {
        use rfd::{MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

        let level = match alert.style {
            Style::Informational => MessageLevel::Info,
            Style::Warning => MessageLevel::Warning,
            Style::Critical => MessageLevel::Error,
        };

        if alert.buttons.len() > 3 {
            warn!(
                count = alert.buttons.len(),
                "Native dialogs fit three buttons, extra buttons dropped"
            );
        }

        let labels: Vec<&str> = alert.buttons.iter().map(|b| b.label.as_str()).collect();
        let buttons = match labels.as_slice() {
            [] => MessageButtons::Ok,
            [a] => MessageButtons::OkCustom(a.to_string()),
            [a, b] => MessageButtons::OkCancelCustom(a.to_string(), b.to_string()),
            [a, b, c, ..] => {
                MessageButtons::YesNoCancelCustom(a.to_string(), b.to_string(), c.to_string())
            }
        };

        let result = MessageDialog::new()
            .set_title(alert.title.as_str())
            .set_description(alert.body.as_str())
            .set_level(level)
            .set_buttons(buttons)
            .show();

        let index = match result {
            MessageDialogResult::Custom(label) => labels
                .iter()
                .position(|l| *l == label)
                .unwrap_or(0),
            MessageDialogResult::Ok | MessageDialogResult::Yes => 0,
            MessageDialogResult::No => 1,
            MessageDialogResult::Cancel => labels.len().saturating_sub(1),
        };

        Ok(AlertResponse::button(index))
    }
}

/// Terminal prompt for headless environments.
///
/// Buttons become a select list; an alert without buttons becomes a yes/no
/// confirmation where declining counts as a dismissal.
pub struct TerminalPresenter;

impl TerminalPresenter {
    pub fn new() -> Self {
        Self
    }

    fn prompt(alert: &Alert) -> String {
        let prefix = match alert.style {
            Style::Informational => "",
            Style::Warning => "warning: ",
            Style::Critical => "critical: ",
        };
        format!("{}{}\n{}", prefix, alert.title, alert.body)
    }
}

impl Default for TerminalPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertPresenter for TerminalPresenter {
    fn name(&self) -> &str {
        "terminal"
    }

    fn present(&self, alert: &Alert) -> Result<AlertResponse> {
        let prompt = Self::prompt(alert);

        if alert.buttons.is_empty() {
            let confirmed = Confirm::new()
                .with_prompt(prompt)
                .default(true)
                .interact()
                .context("terminal confirmation failed")?;
            return Ok(AlertResponse::button(if confirmed { 0 } else { 1 }));
        }

        let labels: Vec<&str> = alert.buttons.iter().map(|b| b.label.as_str()).collect();
        let index = Select::new()
            .with_prompt(prompt)
            .items(&labels)
            .default(0)
            .interact()
            .context("terminal selection failed")?;

        Ok(AlertResponse::button(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Presenter that answers with a fixed button, for pipeline tests.
    struct FixedPresenter(usize);

    impl AlertPresenter for FixedPresenter {
        fn name(&self) -> &str {
            "fixed"
        }

        fn present(&self, _alert: &Alert) -> Result<AlertResponse> {
            Ok(AlertResponse::button(self.0))
        }
    }

    #[test]
    fn test_present_with_custom_presenter() {
        let alert = Alert::new("Save?", "Unsaved changes").ok_cancel();

        let response = alert.present_with(&FixedPresenter(1)).unwrap();
        assert!(response.is_secondary());
        assert!(response.dismissed());

        let response = alert.present_with(&FixedPresenter(0)).unwrap();
        assert!(response.confirmed());
    }

    #[test]
    fn test_terminal_prompt_carries_style() {
        let alert = Alert::new("Disk", "Almost full");
        assert_eq!(TerminalPresenter::prompt(&alert), "Disk\nAlmost full");

        let alert = alert.critical();
        assert!(TerminalPresenter::prompt(&alert).starts_with("critical: "));

        let alert = Alert::new("Disk", "Almost full").warning();
        assert!(TerminalPresenter::prompt(&alert).starts_with("warning: "));
    }
}
