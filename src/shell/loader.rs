//! Dynamic module loading.
//!
//! Opens one shared-library file, resolves the stable entry symbol, and wraps
//! the resulting extension object together with the library that backs it.
//! Load failure is always a per-file condition: it is logged and the
//! candidate is skipped, never escalated.

use crate::core::{now, Timestamp};
use crate::shell::descriptor::{PluginCategory, PluginDescriptor};
use crate::shell::interface::{
    Capability, FaceExtension, ModuleEntryFn, ServiceExtension, ShellExtension,
    MODULE_ENTRY_SYMBOL,
};
use libloading::Library;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Why a module file failed to load. Only surfaces in diagnostics.
#[derive(Debug, Error)]
enum LoadError {
    #[error("failed to open module: {0}")]
    Open(libloading::Error),

    #[error("entry symbol missing: {0}")]
    Symbol(libloading::Error),

    #[error("entry point returned no extension")]
    NullEntry,
}

/// A successfully loaded extension module.
///
/// Owns the extension object and keeps the backing library resident for as
/// long as the instance lives. The registry shares ownership through `Arc`,
/// so the library is only closed once the registry entry and every
/// outstanding handle have been dropped.
pub struct LoadedPlugin {
    descriptor: PluginDescriptor,
    path: PathBuf,
    loaded_at: Timestamp,
    // Declared before `library`: the extension's vtable and code live in the
    // library, so it must be dropped first.
    extension: Box<dyn ShellExtension>,
    library: Option<Library>,
}

impl LoadedPlugin {
    /// Load a module from a shared-library file.
    ///
    /// The path is expected to be pre-filtered by the caller to a regular
    /// file carrying the platform module extension. Any failure yields
    /// `None` after a diagnostic.
    pub fn new_from_filename(path: &Path, category: PluginCategory) -> Option<Self> {
        match Self::open(path, category) {
            Ok(plugin) => Some(plugin),
            Err(err) => {
                debug!(path = %path.display(), %err, "invalid plugin module");
                None
            }
        }
    }

    fn open(path: &Path, category: PluginCategory) -> Result<Self, LoadError> {
        // SAFETY: opening a module runs its constructors; the entry point is
        // required by the module contract to hand back an owned
        // `ShellExtension` allocated in the module, or null.
        let library = unsafe { Library::new(path) }.map_err(LoadError::Open)?;
        let extension = unsafe {
            let entry = library
                .get::<ModuleEntryFn>(MODULE_ENTRY_SYMBOL)
                .map_err(LoadError::Symbol)?;
            let raw = entry();
            if raw.is_null() {
                return Err(LoadError::NullEntry);
            }
            Box::from_raw(raw)
        };
        let descriptor = PluginDescriptor::new(extension.name(), category);
        Ok(Self {
            descriptor,
            path: path.to_path_buf(),
            loaded_at: now(),
            extension,
            library: Some(library),
        })
    }

    /// Wrap an in-process extension with no backing library.
    ///
    /// Used for built-in modules and as the registration path in tests.
    pub fn from_extension(extension: Box<dyn ShellExtension>, category: PluginCategory) -> Self {
        let descriptor = PluginDescriptor::new(extension.name(), category);
        Self {
            descriptor,
            path: PathBuf::new(),
            loaded_at: now(),
            extension,
            library: None,
        }
    }

    /// The module's identity.
    pub fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }

    /// The registry key for this module.
    pub fn qualified_id(&self) -> String {
        self.descriptor.qualified_id()
    }

    /// The file this module was loaded from; empty for in-process modules.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When the module was loaded.
    pub fn loaded_at(&self) -> Timestamp {
        self.loaded_at
    }

    /// Whether this module is backed by a resident shared library.
    pub fn is_dynamic(&self) -> bool {
        self.library.is_some()
    }

    /// The polymorphic extension instance.
    pub fn instance(&self) -> &dyn ShellExtension {
        self.extension.as_ref()
    }

    /// Capabilities advertised by the instance.
    pub fn capabilities(&self) -> Vec<Capability> {
        self.extension.capabilities()
    }

    /// The service capability object, if the instance implements it.
    pub fn service(&self) -> Option<Arc<dyn ServiceExtension>> {
        self.extension.service()
    }

    /// The face capability object, if the instance implements it.
    pub fn face(&self) -> Option<Arc<dyn FaceExtension>> {
        self.extension.face()
    }
}

impl std::fmt::Debug for LoadedPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedPlugin")
            .field("descriptor", &self.descriptor)
            .field("path", &self.path)
            .field("dynamic", &self.library.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::interface::HeartbeatService;

    #[test]
    fn test_from_extension() {
        let plugin = LoadedPlugin::from_extension(
            Box::new(HeartbeatService::new()),
            PluginCategory::Service,
        );

        assert_eq!(plugin.qualified_id(), "services/heartbeat");
        assert_eq!(plugin.descriptor().name, "heartbeat");
        assert!(!plugin.is_dynamic());
        assert_eq!(plugin.capabilities(), vec![Capability::Service]);
        assert!(plugin.service().is_some());
        assert!(plugin.face().is_none());
    }

    #[test]
    fn test_missing_module_file() {
        let plugin = LoadedPlugin::new_from_filename(
            Path::new("/nonexistent/plugins/services/libmissing.so"),
            PluginCategory::Service,
        );
        assert!(plugin.is_none());
    }

    #[test]
    fn test_malformed_module_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("libgarbage.so");
        std::fs::write(&path, b"not a shared library").unwrap();

        let plugin = LoadedPlugin::new_from_filename(&path, PluginCategory::Service);
        assert!(plugin.is_none());
    }
}
