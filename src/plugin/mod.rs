//! Plugin system for Modkit.
//!
//! Plugins are optional, independently versioned feature modules. Each one
//! ships a `plugin.json` manifest in its own directory under the plugin
//! root; the manifest's `entry` reference resolves to a statically
//! registered capability implementing [`Capability`].
//!
//! Administrative enable/disable state lives in a persisted registry that
//! overrides the manifest's own default, so toggles survive upgrades of the
//! plugin itself.

mod capability;
mod error;
mod manager;
mod manifest;
mod registry;

pub use capability::{resolve_entry, Capability, CapabilityFactory};
pub use error::{PluginError, PluginResult};
pub use manager::PluginManager;
pub use manifest::{PluginManifest, MANIFEST_FILE};
pub use registry::PluginRegistry;
