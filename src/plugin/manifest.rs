//! Plugin manifest parsing and validation.
//!
//! A plugin manifest is a `plugin.json` file at the root of a plugin
//! directory that describes the plugin's identity and its entry reference.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{PluginError, PluginResult};

/// Manifest file name expected in every plugin directory.
pub const MANIFEST_FILE: &str = "plugin.json";

/// On-disk plugin manifest.
///
/// `slug` is the stable identifier: it keys the registry, names the install
/// directory, and matches catalog entries. `entry` has the form
/// `"<unit>:<capability>"` and resolves to a registered capability factory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginManifest {
    /// Display name.
    pub name: String,
    /// Unique stable identifier.
    pub slug: String,
    /// Semantic version string.
    pub version: String,
    /// Plugin author.
    #[serde(default)]
    pub author: Option<String>,
    /// Plugin description.
    #[serde(default)]
    pub description: Option<String>,
    /// Entry reference, `"<unit>:<capability>"`.
    pub entry: String,
    /// Default administrative state; the registry overrides this.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Directory the manifest was discovered in (runtime only).
    #[serde(skip)]
    pub path: PathBuf,
}

fn default_enabled() -> bool {
    true
}

impl PluginManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(content: &str) -> PluginResult<Self> {
        serde_json::from_str(content).map_err(|e| PluginError::InvalidManifest(e.to_string()))
    }

    /// Parse a manifest from a file, recording its parent directory.
    pub fn from_file(path: &Path) -> PluginResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut manifest = Self::from_json(&content)?;
        manifest.path = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(manifest)
    }

    /// Validate the manifest.
    pub fn validate(&self) -> PluginResult<()> {
        if self.name.is_empty() {
            return Err(PluginError::InvalidManifest("plugin name is required".to_string()));
        }

        if self.slug.is_empty() {
            return Err(PluginError::InvalidManifest("plugin slug is required".to_string()));
        }

        if !self.slug.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_') {
            return Err(PluginError::InvalidManifest(
                "plugin slug must contain only alphanumeric characters, hyphens, and underscores"
                    .to_string(),
            ));
        }

        if self.version.is_empty() {
            return Err(PluginError::InvalidManifest("plugin version is required".to_string()));
        }

        self.entry_parts()?;

        Ok(())
    }

    /// Split `entry` into its `(unit, capability)` parts.
    ///
    /// Both parts must be non-empty; anything else is a load error.
    pub fn entry_parts(&self) -> PluginResult<(&str, &str)> {
        match self.entry.split_once(':') {
            Some((unit, capability)) if !unit.is_empty() && !capability.is_empty() => {
                Ok((unit, capability))
            }
            _ => Err(PluginError::InvalidManifest(format!(
                "invalid entry '{}': expected '<unit>:<capability>'",
                self.entry
            ))),
        }
    }
}
