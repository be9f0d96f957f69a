//! User notifications with identifier deduplication
//!
//! # Design
//! 1. Value types describe what to present; `adding_*` copies specialize them
//! 2. The [`NotificationCenter`] owns all state: registry, suppression, backend
//! 3. Repeated sends of one logical id reuse the same delivery identifier
//!    unless spam is explicitly allowed
//! 4. A periodic sweep forgets identifiers after the retention window
//!
//! # Example
//! ```ignore
//! use herald::{Notification, NotificationCenter};
//!
//! let center = NotificationCenter::builder().app_name("myapp").build();
//!
//! let note = Notification::new("build-finished", "Build finished", "All targets built");
//! center.send(&note)?;
//! center.send(&note)?; // coalesced onto the same delivery identifier
//! ```

pub mod backend;
pub mod backends;
pub mod center;
pub mod descriptor;
pub mod journal;
pub mod message;
pub mod registry;

pub use backend::{NativeNotification, NotificationBackend};
pub use backends::DesktopBackend;
pub use center::{CenterBuilder, NotificationCenter, SuppressionFlag};
pub use descriptor::{BaseDescriptor, Descriptor, ImageDescriptor};
pub use journal::{DeliveryRecord, Journal};
pub use message::{Action, Icon, Notification};
pub use registry::{ExpiryPolicy, Registry};
