//! Plugin manager for discovering, loading, and running plugins.
//!
//! Discovery turns on-disk manifests into command-addressable plugin
//! instances, respecting registry overrides. A single bad manifest never
//! prevents other plugins from loading.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{
    capability::{resolve_entry, Capability},
    manifest::MANIFEST_FILE,
    PluginError, PluginManifest, PluginRegistry, PluginResult,
};

/// Manages plugin discovery, activation, and command dispatch.
///
/// Owns the in-memory loaded set and the persisted [`PluginRegistry`].
pub struct PluginManager {
    /// Directory holding one subdirectory per plugin.
    plugins_dir: PathBuf,
    /// Persisted enable/disable overrides.
    registry: PluginRegistry,
    /// Live capability instances, keyed by slug.
    loaded: HashMap<String, Box<dyn Capability>>,
    /// All valid manifests found during the last discovery pass.
    metadata: HashMap<String, PluginManifest>,
}

impl PluginManager {
    /// Create a manager and run an initial discovery pass.
    pub fn new(plugins_dir: PathBuf, registry_path: &Path) -> PluginResult<Self> {
        let registry = PluginRegistry::load(registry_path)?;
        let mut manager =
            Self { plugins_dir, registry, loaded: HashMap::new(), metadata: HashMap::new() };
        manager.discover();
        Ok(manager)
    }

    /// Get the plugins directory.
    pub fn plugins_dir(&self) -> &Path {
        &self.plugins_dir
    }

    /// Scan the plugin root and (re)build the known and loaded sets.
    ///
    /// Valid manifests are recorded regardless of enabled state so `list`
    /// can show disabled plugins; manifests that fail to parse or validate
    /// are logged and skipped.
    pub fn discover(&mut self) {
        self.loaded.clear();
        self.metadata.clear();

        let entries = match std::fs::read_dir(&self.plugins_dir) {
            Ok(entries) => entries,
            Err(_) => {
                tracing::info!(dir = %self.plugins_dir.display(), "no plugin directory found");
                return;
            }
        };

        for entry in entries.flatten() {
            let manifest_path = entry.path().join(MANIFEST_FILE);
            if !manifest_path.is_file() {
                continue;
            }

            let manifest = match PluginManifest::from_file(&manifest_path)
                .and_then(|m| m.validate().map(|()| m))
            {
                Ok(manifest) => manifest,
                Err(e) => {
                    tracing::error!(path = %manifest_path.display(), error = %e, "skipping invalid plugin manifest");
                    continue;
                }
            };

            if self.metadata.contains_key(&manifest.slug) {
                tracing::warn!(slug = %manifest.slug, "duplicate plugin slug, keeping the later manifest");
            }

            let slug = manifest.slug.clone();
            let default_enabled = manifest.enabled;
            self.metadata.insert(slug.clone(), manifest);

            if self.registry.is_enabled(&slug, default_enabled) {
                if let Err(e) = self.load(&slug) {
                    tracing::error!(slug = %slug, error = %e, "failed to load plugin");
                }
            }
        }
    }

    /// Resolve a known manifest's entry and activate the capability.
    fn load(&mut self, slug: &str) -> PluginResult<()> {
        let manifest = self
            .metadata
            .get(slug)
            .ok_or_else(|| PluginError::UnknownPlugin(slug.to_string()))?;

        let (unit, capability_name) = manifest.entry_parts()?;
        let mut capability = resolve_entry(unit, capability_name)?;

        // Activation runs before the plugin is registered as loaded.
        capability.activate()?;
        self.loaded.insert(slug.to_string(), capability);
        Ok(())
    }

    /// Administratively enable a plugin and load it if necessary.
    ///
    /// The registry flag is flipped before the load attempt: intent is
    /// recorded even if loading currently fails, and re-attempted on the
    /// next discovery pass.
    pub fn enable(&mut self, slug: &str) -> PluginResult<()> {
        if !self.metadata.contains_key(slug) {
            return Err(PluginError::UnknownPlugin(slug.to_string()));
        }

        self.registry.set_enabled(slug, true)?;

        if !self.loaded.contains_key(slug) {
            self.load(slug)?;
        }
        Ok(())
    }

    /// Disable a plugin, deactivating it first if it is loaded.
    ///
    /// The registry flag is cleared regardless of whether anything was
    /// loaded.
    pub fn disable(&mut self, slug: &str) -> PluginResult<()> {
        match self.loaded.remove(slug) {
            Some(mut capability) => {
                if let Err(e) = capability.deactivate() {
                    tracing::warn!(slug = %slug, error = %e, "plugin deactivation hook failed");
                }
            }
            None => {
                tracing::warn!(slug = %slug, "plugin already disabled or unknown");
            }
        }
        self.registry.set_enabled(slug, false)?;
        Ok(())
    }

    /// Run a command exposed by a loaded plugin.
    pub fn run_command(&mut self, slug: &str, command: &str, args: &[String]) -> PluginResult<()> {
        let capability = self
            .loaded
            .get_mut(slug)
            .ok_or_else(|| PluginError::NotLoaded(slug.to_string()))?;

        if !capability.commands().contains(&command) {
            return Err(PluginError::UnknownCommand {
                plugin: slug.to_string(),
                command: command.to_string(),
            });
        }

        capability.invoke(command, args)
    }

    /// All known manifests, sorted by slug for stable output.
    pub fn list_plugins(&self) -> Vec<&PluginManifest> {
        let mut plugins: Vec<_> = self.metadata.values().collect();
        plugins.sort_by(|a, b| a.slug.cmp(&b.slug));
        plugins
    }

    /// Manifest for a slug, if discovered.
    pub fn get_metadata(&self, slug: &str) -> Option<&PluginManifest> {
        self.metadata.get(slug)
    }

    /// Live capability instance for a loaded plugin.
    pub fn get_plugin(&self, slug: &str) -> Option<&dyn Capability> {
        self.loaded.get(slug).map(|c| &**c)
    }

    /// Whether the plugin is currently loaded.
    pub fn is_loaded(&self, slug: &str) -> bool {
        self.loaded.contains_key(slug)
    }

    /// Command names exposed by a loaded plugin.
    pub fn loaded_commands(&self, slug: &str) -> Option<Vec<&'static str>> {
        self.loaded.get(slug).map(|c| c.commands())
    }

    /// Snapshot of the persisted registry for diagnostics.
    pub fn registry_state(&self) -> HashMap<String, bool> {
        self.registry.all()
    }
}
