//! Extension interface definition.
//!
//! Defines the contract every loadable module must satisfy: a self-reported
//! name, an advertised capability set, and accessors for the capability
//! objects themselves.
//!
//! # Module ABI
//!
//! A loadable module is a shared library exporting a single entry symbol:
//!
//! ```rust,ignore
//! use perch::shell::{Capability, ServiceExtension, ShellExtension};
//! use std::sync::Arc;
//!
//! struct MyService;
//!
//! impl ShellExtension for MyService {
//!     fn name(&self) -> &str {
//!         "my-service"
//!     }
//!
//!     fn capabilities(&self) -> Vec<Capability> {
//!         vec![Capability::Service]
//!     }
//!
//!     fn service(&self) -> Option<Arc<dyn ServiceExtension>> {
//!         // hand out the capability object
//!         # None
//!     }
//! }
//!
//! #[no_mangle]
//! pub extern "C" fn perch_module_entry() -> *mut dyn ShellExtension {
//!     Box::into_raw(Box::new(MyService))
//! }
//! ```

use crate::core::Result;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Symbol every loadable module must export.
pub const MODULE_ENTRY_SYMBOL: &[u8] = b"perch_module_entry";

/// Signature of the module entry point.
///
/// Returns an owned extension object, or null when the module declines to
/// instantiate.
pub type ModuleEntryFn = unsafe extern "C" fn() -> *mut dyn ShellExtension;

/// Capability a loaded module can advertise.
///
/// Closed set; modules declare what they implement at load time so lookup is
/// a table check rather than a failable downcast.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Backend, non-visual session support
    Service,
    /// User-facing surface
    Face,
}

/// Backend capability: long-running, non-visual session support.
pub trait ServiceExtension: Send + Sync {
    /// Start the service.
    fn start(&self) -> Result<()>;

    /// Stop the service.
    fn stop(&self);
}

/// User-facing capability. The shell treats the surface itself as opaque.
pub trait FaceExtension: Send + Sync {
    /// Present the face.
    fn show(&self) -> Result<()>;

    /// Withdraw the face.
    fn hide(&self);
}

/// Trait every extension module must implement.
pub trait ShellExtension: Send + Sync {
    /// Self-reported module name.
    ///
    /// The registry uses this only as a register-or-reject key; it is never
    /// interpreted as a path or trusted beyond identity.
    fn name(&self) -> &str;

    /// Capabilities this module implements.
    fn capabilities(&self) -> Vec<Capability>;

    /// The service capability object, if implemented.
    fn service(&self) -> Option<Arc<dyn ServiceExtension>> {
        None
    }

    /// The face capability object, if implemented.
    fn face(&self) -> Option<Arc<dyn FaceExtension>> {
        None
    }
}

/// A minimal built-in service extension, used in tests and as a reference
/// implementation of the module contract.
pub struct HeartbeatService {
    inner: Arc<HeartbeatInner>,
}

struct HeartbeatInner {
    running: AtomicBool,
}

impl HeartbeatService {
    /// Create a new heartbeat service.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(HeartbeatInner {
                running: AtomicBool::new(false),
            }),
        }
    }

    /// Whether the service is currently started.
    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::SeqCst)
    }
}

impl Default for HeartbeatService {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceExtension for HeartbeatInner {
    fn start(&self) -> Result<()> {
        self.running.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

impl ShellExtension for HeartbeatService {
    fn name(&self) -> &str {
        "heartbeat"
    }

    fn capabilities(&self) -> Vec<Capability> {
        vec![Capability::Service]
    }

    fn service(&self) -> Option<Arc<dyn ServiceExtension>> {
        Some(self.inner.clone())
    }
}
