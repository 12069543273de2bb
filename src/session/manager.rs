//! Session startup orchestration.
//!
//! Runs the autostart scan pass once at session start and records the
//! components the session must bring up ahead of scanned entries. Actually
//! launching processes belongs to the surrounding session binary, not here.

use crate::core::ShellConfig;
use crate::session::autostart::{AutostartApp, AutostartScanner};
use std::collections::BTreeMap;
use tracing::debug;

/// Desktop id of the shell itself, always launched first.
pub const SHELL_DESKTOP_ID: &str = "perch-shell.desktop";

/// Session-start state: scanned autostart entries plus required components.
pub struct SessionManager {
    autostarts: BTreeMap<String, AutostartApp>,
    required_components: Vec<String>,
}

impl SessionManager {
    /// Build a manager from configuration and run the scan pass.
    pub fn new(config: &ShellConfig) -> Self {
        let mut scanner = AutostartScanner::new();
        for directory in &config.autostart_directories {
            scanner.append_directory(directory.clone());
        }

        let mut manager = Self {
            autostarts: scanner.scan(),
            required_components: Vec::new(),
        };
        // Criticals go ahead of everything scanned.
        manager.push_session_component(SHELL_DESKTOP_ID);
        manager
    }

    /// Record a component that must launch before scanned autostarts.
    pub fn push_session_component(&mut self, id: &str) {
        if self.required_components.iter().any(|c| c == id) {
            debug!(component = id, "session component already queued");
            return;
        }
        self.required_components.push(id.to_string());
    }

    /// All scanned autostart entries, keyed by base filename.
    pub fn autostart_entries(&self) -> &BTreeMap<String, AutostartApp> {
        &self.autostarts
    }

    /// Scanned entries the session should actually launch.
    pub fn enabled_entries(&self) -> Vec<&AutostartApp> {
        self.autostarts
            .values()
            .filter(|app| app.enabled)
            .collect()
    }

    /// Components queued ahead of scanned entries, in launch order.
    pub fn required_components(&self) -> &[String] {
        &self.required_components
    }
}
