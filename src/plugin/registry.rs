//! Persisted enable/disable state for plugins.
//!
//! The registry is a flat JSON object mapping slugs to booleans. It is the
//! authoritative override of a manifest's own `enabled` flag: a plugin that
//! was never explicitly toggled falls back to its manifest default.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::PluginResult;

/// Persisted `slug -> enabled` mapping.
pub struct PluginRegistry {
    path: PathBuf,
    data: HashMap<String, bool>,
}

impl PluginRegistry {
    /// Open the registry at `path`, creating an empty one on first run.
    ///
    /// A corrupt or unparsable file is treated as empty with a logged
    /// warning; only unrecoverable I/O is fatal.
    pub fn load(path: &Path) -> PluginResult<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "creating empty plugin registry");
            let registry = Self { path: path.to_path_buf(), data: HashMap::new() };
            registry.save()?;
            return Ok(registry);
        }

        let content = std::fs::read_to_string(path)?;
        let data = match serde_json::from_str(&content) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "unreadable plugin registry, starting empty");
                HashMap::new()
            }
        };

        Ok(Self { path: path.to_path_buf(), data })
    }

    /// Persist the registry to disk.
    fn save(&self) -> PluginResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.data)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    /// Stored state for `slug`, or `default` if it was never toggled.
    pub fn is_enabled(&self, slug: &str, default: bool) -> bool {
        self.data.get(slug).copied().unwrap_or(default)
    }

    /// Update a plugin's state and persist synchronously.
    ///
    /// Durability holds as soon as this returns `Ok`.
    pub fn set_enabled(&mut self, slug: &str, enabled: bool) -> PluginResult<()> {
        self.data.insert(slug.to_string(), enabled);
        self.save()
    }

    /// Read-only snapshot of the full registry for diagnostics.
    pub fn all(&self) -> HashMap<String, bool> {
        self.data.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_creates_empty_registry_on_first_run() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("registry.json");

        let registry = PluginRegistry::load(&path).unwrap();
        assert!(registry.all().is_empty());
        // First run writes the file immediately.
        assert!(path.exists());
    }

    #[test]
    fn test_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("registry.json");

        {
            let mut registry = PluginRegistry::load(&path).unwrap();
            registry.set_enabled("hello-world", true).unwrap();
            registry.set_enabled("other", false).unwrap();
        }

        let registry = PluginRegistry::load(&path).unwrap();
        assert!(registry.is_enabled("hello-world", false));
        assert!(!registry.is_enabled("other", true));
    }

    #[test]
    fn test_default_applies_only_when_untoggled() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("registry.json");

        let mut registry = PluginRegistry::load(&path).unwrap();
        assert!(registry.is_enabled("never-seen", true));
        assert!(!registry.is_enabled("never-seen", false));

        registry.set_enabled("never-seen", false).unwrap();
        assert!(!registry.is_enabled("never-seen", true));
    }

    #[test]
    fn test_corrupt_registry_treated_as_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("registry.json");
        std::fs::write(&path, "{not json").unwrap();

        let registry = PluginRegistry::load(&path).unwrap();
        assert!(registry.all().is_empty());
    }

    #[test]
    fn test_set_enabled_persists_immediately() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("registry.json");

        let mut registry = PluginRegistry::load(&path).unwrap();
        registry.set_enabled("hello-world", true).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let data: HashMap<String, bool> = serde_json::from_str(&content).unwrap();
        assert_eq!(data.get("hello-world"), Some(&true));
    }
}
