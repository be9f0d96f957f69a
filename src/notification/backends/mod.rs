//! Presentation backend implementations

pub mod desktop;

pub use desktop::DesktopBackend;
