//! Session Module
//!
//! Session startup support:
//! - XDG autostart scanning
//! - Startup ordering for required shell components

pub mod autostart;
pub mod manager;

pub use autostart::{AutostartApp, AutostartScanner};
pub use manager::SessionManager;
