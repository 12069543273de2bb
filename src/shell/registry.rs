//! Plugin registry.
//!
//! Owns the mapping from qualified plugin id to loaded module and
//! orchestrates discovery, typed lookup, and unloading.

use crate::core::config::{ShellConfig, SYSTEM_PLUGIN_DIRECTORY};
use crate::shell::descriptor::PluginCategory;
use crate::shell::interface::{FaceExtension, ServiceExtension};
use crate::shell::loader::LoadedPlugin;
use std::collections::HashMap;
use std::ops::Deref;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A service capability handle returned by lookup.
///
/// Keeps the plugin's backing library resident while the handle is alive, so
/// unloading the plugin from the registry never invalidates a handle a
/// caller is still using.
pub struct ServiceHandle {
    service: Arc<dyn ServiceExtension>,
    _plugin: Arc<LoadedPlugin>,
}

impl Deref for ServiceHandle {
    type Target = dyn ServiceExtension;

    fn deref(&self) -> &Self::Target {
        self.service.as_ref()
    }
}

/// A face capability handle returned by lookup.
pub struct FaceHandle {
    face: Arc<dyn FaceExtension>,
    _plugin: Arc<LoadedPlugin>,
}

impl Deref for FaceHandle {
    type Target = dyn FaceExtension;

    fn deref(&self) -> &Self::Target {
        self.face.as_ref()
    }
}

/// Registry of loaded extension modules.
///
/// Discovery, lookup, and unload all run synchronously on the calling
/// thread; mutation takes `&mut self`, so readers and the discovery writer
/// cannot interleave.
pub struct PluginRegistry {
    /// Root directory holding the category subdirectories
    system_directory: PathBuf,
    /// Loaded plugins keyed by qualified id
    plugins: HashMap<String, Arc<LoadedPlugin>>,
}

impl PluginRegistry {
    /// Create a registry rooted at the given plugin directory.
    pub fn new(system_directory: impl Into<PathBuf>) -> Self {
        Self {
            system_directory: system_directory.into(),
            plugins: HashMap::new(),
        }
    }

    /// Create a registry from shell configuration.
    pub fn from_config(config: &ShellConfig) -> Self {
        Self::new(config.plugin_directory.clone())
    }

    /// Discover all available plugins and store them by qualified id.
    ///
    /// Already-registered ids are never replaced; re-running only adds
    /// modules that appeared since the last run. Removals are not detected.
    pub fn discover(&mut self) {
        for category in PluginCategory::ALL {
            self.discover_type(category);
        }
    }

    /// Scan one category subdirectory for loadable modules.
    ///
    /// Candidates are direct entries that are regular files with the
    /// platform module extension, visited in file-name order so the winner
    /// of a duplicate identity is stable across runs. A missing directory
    /// yields nothing; every per-candidate failure is logged and skipped.
    pub fn discover_type(&mut self, category: PluginCategory) {
        let dir = self.system_directory.join(category.dir_name());
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) => {
                debug!(directory = %dir.display(), %err, "skipping plugin directory");
                return;
            }
        };

        let mut candidates: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| {
                path.extension().and_then(|ext| ext.to_str())
                    == Some(std::env::consts::DLL_EXTENSION)
            })
            .collect();
        candidates.sort();

        for path in candidates {
            let Some(plugin) = LoadedPlugin::new_from_filename(&path, category) else {
                continue;
            };
            self.register(plugin);
        }
    }

    /// Insert a loaded plugin unless its qualified id is already taken.
    ///
    /// First registration wins. A rejected duplicate is dropped here, which
    /// closes its backing library without it ever entering the map. Returns
    /// whether the plugin was inserted.
    pub fn register(&mut self, plugin: LoadedPlugin) -> bool {
        let id = plugin.qualified_id();
        if self.plugins.contains_key(&id) {
            debug!(id = %id, path = %plugin.path().display(), "not replacing existing plugin");
            return false;
        }
        info!(id = %id, path = %plugin.path().display(), "new plugin");
        self.plugins.insert(id, Arc::new(plugin));
        true
    }

    /// Look up a loaded plugin by qualified id.
    ///
    /// Absence is an expected, recoverable condition: it is logged and
    /// reported as `None`, never as an error.
    pub fn get_plugin(&self, qualified_id: &str) -> Option<Arc<LoadedPlugin>> {
        match self.plugins.get(qualified_id) {
            Some(plugin) => Some(Arc::clone(plugin)),
            None => {
                debug!(id = qualified_id, "unknown plugin");
                None
            }
        }
    }

    /// Look up a service plugin by bare name.
    ///
    /// Returns `None` both when no such plugin is registered and when the
    /// module does not implement the service capability; callers must check.
    /// A capability mismatch leaves the entry untouched.
    pub fn get_service(&self, name: &str) -> Option<ServiceHandle> {
        let plugin = self.get_plugin(&PluginCategory::Service.qualify(name))?;
        let service = plugin.service()?;
        Some(ServiceHandle {
            service,
            _plugin: plugin,
        })
    }

    /// Look up a face plugin by bare name.
    pub fn get_face(&self, name: &str) -> Option<FaceHandle> {
        let plugin = self.get_plugin(&PluginCategory::Face.qualify(name))?;
        let face = plugin.face()?;
        Some(FaceHandle {
            face,
            _plugin: plugin,
        })
    }

    /// Whether a plugin with the given qualified id is registered.
    pub fn has_plugin(&self, qualified_id: &str) -> bool {
        self.plugins.contains_key(qualified_id)
    }

    /// Whether a service plugin with the given name is registered.
    pub fn has_service_plugin(&self, name: &str) -> bool {
        self.plugins
            .contains_key(&PluginCategory::Service.qualify(name))
    }

    /// Whether a face plugin with the given name is registered.
    pub fn has_face_plugin(&self, name: &str) -> bool {
        self.plugins
            .contains_key(&PluginCategory::Face.qualify(name))
    }

    /// Remove a plugin from the registry.
    ///
    /// Drops the registry's ownership share; the module itself is closed
    /// once the last outstanding handle is released. Unknown ids are a
    /// warning no-op.
    pub fn unload(&mut self, qualified_id: &str) {
        if self.plugins.remove(qualified_id).is_none() {
            warn!(id = qualified_id, "attempting to remove unknown plugin");
        }
    }

    /// Remove a service plugin by bare name.
    pub fn unload_service(&mut self, name: &str) {
        self.unload(&PluginCategory::Service.qualify(name));
    }

    /// Remove a face plugin by bare name.
    pub fn unload_face(&mut self, name: &str) {
        self.unload(&PluginCategory::Face.qualify(name));
    }

    /// Number of registered plugins.
    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    /// Registered qualified ids, sorted.
    pub fn plugin_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.plugins.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new(SYSTEM_PLUGIN_DIRECTORY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Result;
    use crate::shell::interface::{Capability, HeartbeatService, ShellExtension};

    /// Stub module with a chosen name and capability set.
    struct StubExtension {
        name: String,
        service: Option<Arc<dyn ServiceExtension>>,
        face: Option<Arc<dyn FaceExtension>>,
    }

    struct StubService;

    impl ServiceExtension for StubService {
        fn start(&self) -> Result<()> {
            Ok(())
        }

        fn stop(&self) {}
    }

    struct StubFace;

    impl FaceExtension for StubFace {
        fn show(&self) -> Result<()> {
            Ok(())
        }

        fn hide(&self) {}
    }

    impl StubExtension {
        fn service_only(name: &str) -> Self {
            Self {
                name: name.to_string(),
                service: Some(Arc::new(StubService)),
                face: None,
            }
        }

        fn face_only(name: &str) -> Self {
            Self {
                name: name.to_string(),
                service: None,
                face: Some(Arc::new(StubFace)),
            }
        }
    }

    impl ShellExtension for StubExtension {
        fn name(&self) -> &str {
            &self.name
        }

        fn capabilities(&self) -> Vec<Capability> {
            let mut caps = Vec::new();
            if self.service.is_some() {
                caps.push(Capability::Service);
            }
            if self.face.is_some() {
                caps.push(Capability::Face);
            }
            caps
        }

        fn service(&self) -> Option<Arc<dyn ServiceExtension>> {
            self.service.clone()
        }

        fn face(&self) -> Option<Arc<dyn FaceExtension>> {
            self.face.clone()
        }
    }

    fn register_service(registry: &mut PluginRegistry, name: &str) -> bool {
        registry.register(LoadedPlugin::from_extension(
            Box::new(StubExtension::service_only(name)),
            PluginCategory::Service,
        ))
    }

    #[test]
    fn test_registry_creation() {
        let registry = PluginRegistry::new("/tmp/plugins");
        assert_eq!(registry.plugin_count(), 0);
    }

    #[test]
    fn test_distinct_names_both_register() {
        let mut registry = PluginRegistry::new("/tmp/plugins");
        assert!(register_service(&mut registry, "notifications"));
        assert!(register_service(&mut registry, "power"));

        assert_eq!(registry.plugin_count(), 2);
        assert!(registry.has_service_plugin("notifications"));
        assert!(registry.has_service_plugin("power"));
    }

    #[test]
    fn test_duplicate_identity_first_wins() {
        let mut registry = PluginRegistry::new("/tmp/plugins");
        assert!(register_service(&mut registry, "notifications"));
        assert!(!register_service(&mut registry, "notifications"));

        assert_eq!(registry.plugin_count(), 1);
    }

    #[test]
    fn test_same_name_different_category() {
        let mut registry = PluginRegistry::new("/tmp/plugins");
        assert!(register_service(&mut registry, "panel"));
        assert!(registry.register(LoadedPlugin::from_extension(
            Box::new(StubExtension::face_only("panel")),
            PluginCategory::Face,
        )));

        assert_eq!(registry.plugin_count(), 2);
        assert!(registry.has_plugin("services/panel"));
        assert!(registry.has_plugin("faces/panel"));
    }

    #[test]
    fn test_get_service() {
        let mut registry = PluginRegistry::new("/tmp/plugins");
        register_service(&mut registry, "notifications");

        let service = registry.get_service("notifications");
        assert!(service.is_some());
        service.unwrap().start().unwrap();

        assert!(registry.get_service("missing").is_none());
    }

    #[test]
    fn test_get_face() {
        let mut registry = PluginRegistry::new("/tmp/plugins");
        registry.register(LoadedPlugin::from_extension(
            Box::new(StubExtension::face_only("panel")),
            PluginCategory::Face,
        ));

        let face = registry.get_face("panel");
        assert!(face.is_some());
        face.unwrap().show().unwrap();
    }

    #[test]
    fn test_capability_mismatch_is_silent() {
        let mut registry = PluginRegistry::new("/tmp/plugins");
        // A face-only module that happens to live under services/.
        registry.register(LoadedPlugin::from_extension(
            Box::new(StubExtension::face_only("odd")),
            PluginCategory::Service,
        ));

        // Mismatch yields None without disturbing the entry.
        assert!(registry.get_service("odd").is_none());
        assert!(registry.has_service_plugin("odd"));

        // The instance still resolves for a capability it does implement.
        let plugin = registry.get_plugin("services/odd").unwrap();
        assert!(plugin.face().is_some());
    }

    #[test]
    fn test_unload() {
        let mut registry = PluginRegistry::new("/tmp/plugins");
        register_service(&mut registry, "notifications");

        registry.unload_service("notifications");
        assert!(!registry.has_service_plugin("notifications"));
        assert!(registry.get_service("notifications").is_none());

        // Unknown unload is a no-op.
        registry.unload("services/notifications");
        registry.unload_face("nope");
    }

    #[test]
    fn test_handle_survives_unload() {
        let mut registry = PluginRegistry::new("/tmp/plugins");
        let heartbeat = HeartbeatService::new();
        registry.register(LoadedPlugin::from_extension(
            Box::new(heartbeat),
            PluginCategory::Service,
        ));

        let handle = registry.get_service("heartbeat").unwrap();
        registry.unload_service("heartbeat");

        // The registry dropped its share, but the handle's is still live.
        handle.start().unwrap();
        handle.stop();
    }

    #[test]
    fn test_discover_missing_root() {
        let mut registry = PluginRegistry::new("/nonexistent/plugins");
        registry.discover();
        assert_eq!(registry.plugin_count(), 0);
    }

    #[test]
    fn test_discover_skips_bad_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let services = dir.path().join("services");
        std::fs::create_dir_all(&services).unwrap();
        // Not a loadable module; must be skipped without aborting discovery.
        std::fs::write(services.join("libbroken.so"), b"garbage").unwrap();
        // Wrong extension; must not even be attempted.
        std::fs::write(services.join("README.txt"), b"docs").unwrap();

        let mut registry = PluginRegistry::new(dir.path());
        registry.discover();
        assert_eq!(registry.plugin_count(), 0);
    }

    #[test]
    fn test_rediscovery_is_additive() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("services")).unwrap();

        let mut registry = PluginRegistry::new(dir.path());
        register_service(&mut registry, "notifications");

        registry.discover();
        assert_eq!(registry.plugin_count(), 1);
        assert!(registry.has_service_plugin("notifications"));
    }

    #[test]
    fn test_plugin_ids_sorted() {
        let mut registry = PluginRegistry::new("/tmp/plugins");
        register_service(&mut registry, "power");
        register_service(&mut registry, "notifications");

        assert_eq!(
            registry.plugin_ids(),
            vec!["services/notifications", "services/power"]
        );
    }
}
