//! herald - deduplicated desktop notifications and alert dialogs

pub mod alert;
pub mod notification;

pub use alert::{Alert, AlertPresenter, AlertResponse, Button, DialogPresenter, Style, TerminalPresenter};
pub use notification::{
    Action, BaseDescriptor, CenterBuilder, DeliveryRecord, Descriptor, DesktopBackend,
    ExpiryPolicy, Icon, ImageDescriptor, Journal, NativeNotification, Notification,
    NotificationBackend, NotificationCenter, Registry, SuppressionFlag,
};
