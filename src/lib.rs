//! # Perch - Desktop Shell Runtime Core
//!
//! The non-GUI core of the perch desktop shell:
//! - **Shell**: dynamic plugin host for service and face extensions
//! - **Session**: XDG autostart scanning and startup ordering
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use perch::shell::PluginRegistry;
//!
//! fn main() {
//!     let mut registry = PluginRegistry::default();
//!     registry.discover();
//!     if let Some(notifications) = registry.get_service("notifications") {
//!         notifications.start().unwrap();
//!     }
//! }
//! ```

pub mod core;
pub mod logging;
pub mod session;
pub mod shell;

pub use crate::core::error::{Error, Result};
