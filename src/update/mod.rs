//! Catalog-driven updates for the core and installed plugins.
//!
//! The update protocol is: download the catalog from an ordered list of
//! sources (latest release, then the main branch as fallback), diff it
//! against the running core version and installed plugin manifests, then
//! download, verify, and atomically install every selected artifact. The
//! catalog is cached locally so checks keep working offline.

mod catalog;
mod error;
mod fetch;
mod install;
mod updater;
mod version;

pub use catalog::{Catalog, CatalogCore, CatalogPluginEntry};
pub use error::{UpdateError, UpdateResult};
pub use fetch::{Fetch, HttpFetch, DEFAULT_TIMEOUT};
pub use install::{atomic_extract, sha256_bytes, sha256_file};
pub use updater::{
    ApplyOptions, PendingUpdate, UpdateKind, Updater, UpdaterConfig, CORE_ID, DEFAULT_MAIN_URL,
    DEFAULT_RELEASE_URL,
};
pub use version::{is_newer, parse_version};
