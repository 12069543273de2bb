//! Shell Module
//!
//! Dynamic plugin host for the shell:
//! - Extension interface and module ABI
//! - Module loading
//! - Plugin registry and lifecycle

pub mod descriptor;
pub mod interface;
pub mod loader;
pub mod registry;

pub use descriptor::{PluginCategory, PluginDescriptor};
pub use interface::{
    Capability, FaceExtension, ServiceExtension, ShellExtension, MODULE_ENTRY_SYMBOL,
};
pub use loader::LoadedPlugin;
pub use registry::{FaceHandle, PluginRegistry, ServiceHandle};
