//! Catalog-driven update checks and installation.
//!
//! An update cycle is: fetch the catalog (with source fallback), diff it
//! against what is installed, then download, verify, and atomically install
//! each newer artifact. The updater only writes to the filesystem; a
//! subsequent discovery pass on the plugin manager picks up the changes.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use crate::plugin::PluginManager;

use super::{
    catalog::{Catalog, CatalogPluginEntry},
    fetch::{Fetch, HttpFetch, DEFAULT_TIMEOUT},
    install::{atomic_extract, sha256_bytes},
    version::is_newer,
    UpdateError, UpdateResult,
};

/// Catalog location published with each release.
pub const DEFAULT_RELEASE_URL: &str =
    "https://github.com/modkit-cli/modkit/releases/latest/download/catalog.json";

/// Fallback catalog location on the main branch.
pub const DEFAULT_MAIN_URL: &str =
    "https://raw.githubusercontent.com/modkit-cli/modkit/main/data/catalog.json";

/// Identifier used for the core in update reports.
pub const CORE_ID: &str = "core";

/// What kind of change a pending update represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    /// The application core itself.
    Core,
    /// A locally known plugin with a newer catalog version.
    Plugin,
    /// A catalog plugin with no local counterpart.
    New,
}

/// One item `check_updates` found.
#[derive(Debug, Clone)]
pub struct PendingUpdate {
    /// `"core"` or the plugin slug.
    pub id: String,
    /// Locally recorded version, if any.
    pub current: Option<String>,
    /// Version the catalog offers.
    pub target: String,
    /// Core, plugin update, or new plugin.
    pub kind: UpdateKind,
}

/// Selection of what `apply_updates` should install.
#[derive(Debug, Clone)]
pub struct ApplyOptions {
    /// Update the application core if the catalog has a newer one.
    pub core: bool,
    /// Explicit plugin slugs; empty means all currently known plugins.
    pub plugins: Vec<String>,
    /// When targeting all plugins, also install catalog plugins not yet
    /// present locally.
    pub include_new_plugins: bool,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self { core: false, plugins: Vec::new(), include_new_plugins: true }
    }
}

/// Configuration for an [`Updater`].
pub struct UpdaterConfig {
    /// Ordered catalog sources; the first parsable one wins.
    pub sources: Vec<String>,
    /// Where the last-known-good catalog is cached.
    pub cache_path: PathBuf,
    /// Plugin install root (one directory per slug).
    pub plugins_dir: PathBuf,
    /// Application root the core artifact installs over.
    pub app_root: PathBuf,
    /// Version of the currently running core.
    pub core_version: String,
    /// Per-request network timeout.
    pub timeout: Duration,
}

impl UpdaterConfig {
    /// Default configuration rooted at the application data directory.
    pub fn new(data_dir: &std::path::Path, app_root: PathBuf) -> Self {
        Self {
            sources: vec![DEFAULT_RELEASE_URL.to_string(), DEFAULT_MAIN_URL.to_string()],
            cache_path: data_dir.join("catalog.json"),
            plugins_dir: data_dir.join("plugins"),
            app_root,
            core_version: crate::VERSION.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Checks for and applies core and plugin updates.
///
/// Borrows the [`PluginManager`] to read installed versions; never mutates
/// plugin load state directly.
pub struct Updater<'a> {
    manager: &'a PluginManager,
    config: UpdaterConfig,
    fetch: Box<dyn Fetch>,
}

impl<'a> Updater<'a> {
    /// Create an updater with the production HTTP fetcher.
    pub fn new(manager: &'a PluginManager, config: UpdaterConfig) -> UpdateResult<Self> {
        let fetch = Box::new(HttpFetch::new(config.timeout)?);
        Ok(Self { manager, config, fetch })
    }

    /// Create an updater with a custom fetch implementation.
    pub fn with_fetch(
        manager: &'a PluginManager,
        config: UpdaterConfig,
        fetch: Box<dyn Fetch>,
    ) -> Self {
        Self { manager, config, fetch }
    }

    /// Download the catalog, trying each configured source in order.
    ///
    /// The first source yielding a parsable document is cached verbatim and
    /// returned. Exhausting every source is an aggregated failure carrying
    /// the last underlying error; no partial catalog is ever returned.
    pub fn download_catalog(&self) -> UpdateResult<Catalog> {
        let mut last_error = String::from("no catalog sources configured");

        for url in &self.config.sources {
            let raw = match self.fetch.fetch(url) {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "catalog source failed");
                    last_error = e.to_string();
                    continue;
                }
            };

            match serde_json::from_slice::<Catalog>(&raw) {
                Ok(catalog) => {
                    Catalog::save_cache(&self.config.cache_path, &raw)?;
                    return Ok(catalog);
                }
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "catalog source returned unparsable document");
                    last_error = e.to_string();
                }
            }
        }

        Err(UpdateError::CatalogUnavailable { last_error })
    }

    /// Read the last cached catalog; missing or corrupt is "no catalog".
    pub fn load_local_catalog(&self) -> Option<Catalog> {
        Catalog::load_cached(&self.config.cache_path)
    }

    /// Diff a catalog against the running core and installed plugins.
    ///
    /// Falls back to the local cache when no catalog is supplied; fails with
    /// [`UpdateError::NoCatalog`] when neither is available.
    pub fn check_updates(&self, catalog: Option<&Catalog>) -> UpdateResult<Vec<PendingUpdate>> {
        let local;
        let catalog = match catalog {
            Some(catalog) => catalog,
            None => {
                local = self.load_local_catalog().ok_or(UpdateError::NoCatalog)?;
                &local
            }
        };

        let mut updates = Vec::new();

        if is_newer(&self.config.core_version, &catalog.core.version)? {
            updates.push(PendingUpdate {
                id: CORE_ID.to_string(),
                current: Some(self.config.core_version.clone()),
                target: catalog.core.version.clone(),
                kind: UpdateKind::Core,
            });
        }

        let installed = self.manager.list_plugins();
        let catalog_plugins = catalog.plugin_map();

        for manifest in &installed {
            if let Some(entry) = catalog_plugins.get(manifest.slug.as_str()) {
                if is_newer(&manifest.version, &entry.version)? {
                    updates.push(PendingUpdate {
                        id: manifest.slug.clone(),
                        current: Some(manifest.version.clone()),
                        target: entry.version.clone(),
                        kind: UpdateKind::Plugin,
                    });
                }
            }
        }

        // Catalog plugins with no local counterpart are reported distinctly
        // as new, not merged into the update set.
        for entry in &catalog.plugins {
            if self.manager.get_metadata(&entry.slug).is_none() {
                updates.push(PendingUpdate {
                    id: entry.slug.clone(),
                    current: None,
                    target: entry.version.clone(),
                    kind: UpdateKind::New,
                });
            }
        }

        Ok(updates)
    }

    /// Download, verify, and atomically install the selected updates.
    ///
    /// Returns the filesystem locations that changed. Any download or
    /// verification failure aborts the whole operation; artifacts already
    /// installed before the failing step are not rolled back.
    pub fn apply_updates(
        &self,
        catalog: &Catalog,
        options: &ApplyOptions,
    ) -> UpdateResult<Vec<PathBuf>> {
        let mut updated = Vec::new();

        if options.core && is_newer(&self.config.core_version, &catalog.core.version)? {
            tracing::info!(version = %catalog.core.version, "downloading core update");
            let url = catalog
                .core
                .artifact_url
                .as_deref()
                .filter(|u| !u.is_empty())
                .ok_or_else(|| UpdateError::MissingArtifactUrl(CORE_ID.to_string()))?;

            let bytes = self.fetch.fetch(url)?;
            verify_digest(CORE_ID, &bytes, catalog.core.digest.as_deref())?;
            install_archive(&bytes, &self.config.app_root)?;
            updated.push(self.config.app_root.clone());
        }

        let available = catalog.plugin_map();
        let targets: Vec<String> = if options.plugins.is_empty() {
            let mut targets: Vec<String> =
                self.manager.list_plugins().iter().map(|m| m.slug.clone()).collect();
            if options.include_new_plugins {
                for entry in &catalog.plugins {
                    if !targets.contains(&entry.slug) {
                        targets.push(entry.slug.clone());
                    }
                }
            }
            targets
        } else {
            options.plugins.clone()
        };

        for slug in &targets {
            let Some(&entry) = available.get(slug.as_str()) else {
                tracing::debug!(slug = %slug, "no catalog entry, nothing to update");
                continue;
            };

            if let Some(local) = self.manager.get_metadata(slug) {
                if !is_newer(&local.version, &entry.version)? {
                    tracing::debug!(slug = %slug, "plugin is up to date");
                    continue;
                }
            }

            tracing::info!(slug = %slug, version = %entry.version, "downloading plugin update");
            let target_dir = self.config.plugins_dir.join(slug);
            self.install_plugin(entry, &target_dir)?;
            updated.push(target_dir);
        }

        Ok(updated)
    }

    fn install_plugin(
        &self,
        entry: &CatalogPluginEntry,
        target_dir: &std::path::Path,
    ) -> UpdateResult<()> {
        let url = entry
            .artifact_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| UpdateError::MissingArtifactUrl(entry.slug.clone()))?;

        let bytes = self.fetch.fetch(url)?;
        verify_digest(&entry.slug, &bytes, entry.digest.as_deref())?;
        install_archive(&bytes, target_dir)
    }
}

/// Compare an artifact's digest with the catalog's expectation.
///
/// An entry without a digest installs unverified; that gap is surfaced as a
/// loud warning rather than an error to keep old catalogs installable.
fn verify_digest(name: &str, bytes: &[u8], expected: Option<&str>) -> UpdateResult<()> {
    let Some(expected) = expected.filter(|d| !d.is_empty()) else {
        tracing::warn!(artifact = %name, "catalog provides no digest, installing unverified");
        return Ok(());
    };

    let actual = sha256_bytes(bytes);
    if !actual.eq_ignore_ascii_case(expected) {
        return Err(UpdateError::ChecksumMismatch {
            name: name.to_string(),
            expected: expected.to_string(),
            actual,
        });
    }
    Ok(())
}

/// Spill downloaded bytes to a temp file and extract them atomically.
fn install_archive(bytes: &[u8], target_dir: &std::path::Path) -> UpdateResult<()> {
    let mut archive = tempfile::NamedTempFile::with_prefix("modkit-update-")?;
    archive.write_all(bytes)?;
    archive.flush()?;
    atomic_extract(archive.path(), target_dir)
}
