//! Plugin identity.

use serde::{Deserialize, Serialize};

/// The closed set of plugin categories the shell discovers.
///
/// Each category maps to one subdirectory of the system plugin root and to
/// one qualified-id prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PluginCategory {
    /// Backend, non-visual extensions
    Service,
    /// User-facing extensions
    Face,
}

impl PluginCategory {
    /// All categories, in discovery order.
    pub const ALL: [PluginCategory; 2] = [PluginCategory::Service, PluginCategory::Face];

    /// Subdirectory name under the plugin root, also the qualified-id prefix.
    pub fn dir_name(&self) -> &'static str {
        match self {
            PluginCategory::Service => "services",
            PluginCategory::Face => "faces",
        }
    }

    /// Qualify a bare plugin name into a registry key.
    pub fn qualify(&self, name: &str) -> String {
        format!("{}/{}", self.dir_name(), name)
    }
}

impl std::fmt::Display for PluginCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dir_name())
    }
}

/// Identity of one discovered extension module.
///
/// The name is self-reported by the module at load time, never derived from
/// the filename. It is trusted only as a register-or-reject key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PluginDescriptor {
    /// Self-reported name, unique within its category
    pub name: String,
    /// Category the module was discovered under
    pub category: PluginCategory,
}

impl PluginDescriptor {
    /// Create a new descriptor.
    pub fn new(name: &str, category: PluginCategory) -> Self {
        Self {
            name: name.to_string(),
            category,
        }
    }

    /// The registry key, `category/name`. Computed once at insert and never
    /// changed while the entry exists.
    pub fn qualified_id(&self) -> String {
        self.category.qualify(&self.name)
    }
}

impl std::fmt::Display for PluginDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.qualified_id())
    }
}
