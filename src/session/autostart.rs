//! XDG autostart scanning.
//!
//! Walks a descending-priority list of directories for `.desktop` entries.
//! The first directory that defines a given base filename wins; a symbolic
//! link pointing at `/dev/null` marks an entry as present but disabled.

use crate::core::config;
use crate::core::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One autostart candidate discovered during a scan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutostartApp {
    /// Path of the `.desktop` entry that defined this candidate
    pub file_path: PathBuf,
    /// Whether the session should launch it
    pub enabled: bool,
}

/// Scans prioritized directories for `.desktop` autostart entries.
///
/// A single synchronous pass at session start; no module loading, no state
/// beyond the accepted directory list.
pub struct AutostartScanner {
    directories: Vec<PathBuf>,
}

impl AutostartScanner {
    /// Create a scanner with no directories.
    pub fn new() -> Self {
        Self {
            directories: Vec::new(),
        }
    }

    /// Create a scanner over the conventional directories: the per-user
    /// config autostart dir first, then the system-wide ones.
    pub fn with_default_directories() -> Result<Self> {
        let mut scanner = Self::new();
        scanner.append_directory(config::user_autostart_directory()?);
        for dir in config::SYSTEM_AUTOSTART_DIRECTORIES {
            scanner.append_directory(dir);
        }
        Ok(scanner)
    }

    /// Append a directory at the lowest priority so far.
    ///
    /// Directories that do not exist are skipped at append time.
    pub fn append_directory(&mut self, directory: impl Into<PathBuf>) {
        let directory = directory.into();
        if !directory.is_dir() {
            debug!(directory = %directory.display(), "skipping autostart directory");
            return;
        }
        self.directories.push(directory);
    }

    /// The accepted directories, in descending priority order.
    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    /// Scan all directories and collect autostart candidates keyed by base
    /// filename.
    pub fn scan(&self) -> BTreeMap<String, AutostartApp> {
        let mut apps = BTreeMap::new();
        for directory in &self.directories {
            scan_directory(directory, &mut apps);
        }
        apps
    }
}

impl Default for AutostartScanner {
    fn default() -> Self {
        Self::new()
    }
}

fn scan_directory(directory: &Path, apps: &mut BTreeMap<String, AutostartApp>) {
    let entries = match fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(directory = %directory.display(), %err, "unreadable autostart directory");
            return;
        }
    };

    for entry in entries.filter_map(|entry| entry.ok()) {
        let base = entry.file_name().to_string_lossy().into_owned();
        if !base.ends_with(".desktop") {
            continue;
        }
        // Descending-priority insert: never override an entry recorded from
        // an earlier directory.
        if apps.contains_key(&base) {
            continue;
        }

        let path = entry.path();
        let is_symlink = path
            .symlink_metadata()
            .map(|meta| meta.file_type().is_symlink())
            .unwrap_or(false);
        if is_symlink {
            let target = fs::read_link(&path).ok();
            if target.as_deref() == Some(Path::new("/dev/null")) {
                debug!(entry = %base, "autostart entry disabled");
                apps.insert(
                    base,
                    AutostartApp {
                        file_path: path,
                        enabled: false,
                    },
                );
                continue;
            }
            // A link whose target is gone is not a usable entry.
            if !path.exists() {
                debug!(entry = %path.display(), "invalid .desktop entry");
                continue;
            }
        }

        apps.insert(
            base,
            AutostartApp {
                file_path: path,
                enabled: true,
            },
        );
    }
}
