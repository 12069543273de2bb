//! Shell runtime configuration.
//!
//! All paths the runtime consults are carried here and injected into the
//! components that need them, so tests can point everything at synthetic
//! directories.

use crate::core::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Conventional system plugin root, holding `services/` and `faces/`.
pub const SYSTEM_PLUGIN_DIRECTORY: &str = "/usr/lib/perch/plugins";

/// System-wide autostart directories, in descending priority order.
pub const SYSTEM_AUTOSTART_DIRECTORIES: [&str; 2] =
    ["/etc/xdg/autostart", "/usr/share/xdg/autostart"];

/// Shell runtime configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Root directory holding the `services/` and `faces/` module subdirectories
    pub plugin_directory: PathBuf,
    /// Autostart directories in descending priority order
    pub autostart_directories: Vec<PathBuf>,
}

impl ShellConfig {
    /// Resolve the full configuration for a user session.
    ///
    /// Prepends the per-user autostart directory ahead of the system-wide
    /// ones. Fails only when no home directory can be resolved.
    pub fn for_session() -> Result<Self> {
        let mut config = Self::default();
        config
            .autostart_directories
            .insert(0, user_autostart_directory()?);
        Ok(config)
    }

    /// Load configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Set the plugin root directory.
    pub fn with_plugin_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.plugin_directory = directory.into();
        self
    }

    /// Append an autostart directory at the lowest priority so far.
    pub fn with_autostart_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.autostart_directories.push(directory.into());
        self
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            plugin_directory: PathBuf::from(SYSTEM_PLUGIN_DIRECTORY),
            autostart_directories: SYSTEM_AUTOSTART_DIRECTORIES
                .iter()
                .map(PathBuf::from)
                .collect(),
        }
    }
}

/// Per-user autostart directory.
///
/// `$XDG_CONFIG_HOME/autostart` when set, else `$HOME/.config/autostart`.
/// The session process runs early enough that neither variable being set is
/// a real condition, so it is surfaced as an error rather than guessed at.
pub fn user_autostart_directory() -> Result<PathBuf> {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        if !xdg.is_empty() {
            return Ok(PathBuf::from(xdg).join("autostart"));
        }
    }
    let home = env::var("HOME").map_err(|_| {
        Error::HomeResolutionFailed("neither XDG_CONFIG_HOME nor HOME is set".to_string())
    })?;
    Ok(PathBuf::from(home).join(".config").join("autostart"))
}
