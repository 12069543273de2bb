//! Core utilities and common types for perch.

pub mod config;
pub mod error;
pub mod types;

pub use config::ShellConfig;
pub use error::{Error, Result};
pub use types::*;
