//! # Modkit
//!
//! Modular command-line application with a plugin lifecycle manager and
//! catalog-driven self-updates.
//!
//! Modkit discovers optional feature modules ("plugins") from on-disk
//! manifests, keeps their enable/disable state in a persisted registry, and
//! updates both itself and its plugins against a remote catalog with
//! integrity verification and crash-safe atomic installs.
//!
//! ## Quick Start
//!
//! ```bash
//! # List known plugins
//! modkit list
//!
//! # Enable a plugin and run one of its commands
//! modkit enable hello-world
//! modkit run hello-world greet
//!
//! # Check for and apply updates
//! modkit update check
//! modkit update apply --core
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
// Allow common patterns that are intentional in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::map_unwrap_or)]

pub mod plugin;
pub mod update;

pub use plugin::{
    Capability, PluginError, PluginManager, PluginManifest, PluginRegistry, PluginResult,
};
pub use update::{
    ApplyOptions, Catalog, PendingUpdate, UpdateError, UpdateKind, Updater, UpdaterConfig,
    UpdateResult,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "modkit";
