//! Typed representation of the remote update catalog.
//!
//! The catalog is a JSON document published alongside releases. It names
//! the current core version and every publishable plugin version, with the
//! download location and digest for each artifact. The raw document is
//! cached verbatim to disk as the last-known-good catalog.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::UpdateResult;

/// Core section of the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogCore {
    /// Latest published core version.
    #[serde(default = "default_version")]
    pub version: String,
    /// Download location for the core artifact.
    #[serde(default, alias = "zip_url")]
    pub artifact_url: Option<String>,
    /// Expected SHA-256 of the artifact. Absent digests skip verification.
    #[serde(default, alias = "sha256")]
    pub digest: Option<String>,
}

fn default_version() -> String {
    "0.0.0".to_string()
}

/// One publishable plugin in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogPluginEntry {
    /// Plugin slug, matching the manifest and install directory.
    pub slug: String,
    /// Latest published plugin version.
    pub version: String,
    /// Download location for the plugin artifact.
    #[serde(default, alias = "zip_url")]
    pub artifact_url: Option<String>,
    /// Expected SHA-256 of the artifact.
    #[serde(default, alias = "sha256")]
    pub digest: Option<String>,
}

/// The complete catalog (core + plugins).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    /// Core section.
    pub core: CatalogCore,
    /// Publishable plugins, in document order.
    #[serde(default)]
    pub plugins: Vec<CatalogPluginEntry>,
}

impl Catalog {
    /// Parse a catalog document.
    pub fn from_json(content: &str) -> UpdateResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Index the plugin list by slug.
    ///
    /// Insertion follows document order, so a duplicate slug keeps the last
    /// entry.
    pub fn plugin_map(&self) -> HashMap<&str, &CatalogPluginEntry> {
        self.plugins.iter().map(|p| (p.slug.as_str(), p)).collect()
    }

    /// Read the cached catalog, if a parsable one exists.
    ///
    /// A missing or corrupt cache is "no catalog", not an error.
    pub fn load_cached(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match Self::from_json(&content) {
            Ok(catalog) => Some(catalog),
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "cached catalog is corrupt");
                None
            }
        }
    }

    /// Cache the raw catalog document verbatim, replacing any previous one.
    pub fn save_cache(path: &Path, raw: &[u8]) -> UpdateResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE_CATALOG: &str = r#"
{
    "core": {
        "version": "1.2.0",
        "zip_url": "https://example.com/core-1.2.0.tar.gz",
        "sha256": "abc123"
    },
    "plugins": [
        {
            "slug": "hello",
            "version": "1.1.0",
            "zip_url": "https://example.com/hello-1.1.0.tar.gz",
            "sha256": "def456"
        },
        {
            "slug": "fileinfo",
            "version": "0.5.0",
            "artifact_url": "https://example.com/fileinfo-0.5.0.tar.gz",
            "digest": "789abc"
        }
    ]
}
"#;

    #[test]
    fn test_parse_catalog_with_aliased_keys() {
        let catalog = Catalog::from_json(SAMPLE_CATALOG).unwrap();

        assert_eq!(catalog.core.version, "1.2.0");
        assert_eq!(
            catalog.core.artifact_url.as_deref(),
            Some("https://example.com/core-1.2.0.tar.gz")
        );
        assert_eq!(catalog.core.digest.as_deref(), Some("abc123"));
        assert_eq!(catalog.plugins.len(), 2);
        // Both the legacy and the canonical key names parse.
        assert_eq!(catalog.plugins[0].digest.as_deref(), Some("def456"));
        assert_eq!(catalog.plugins[1].digest.as_deref(), Some("789abc"));
    }

    #[test]
    fn test_missing_optional_fields() {
        let catalog =
            Catalog::from_json(r#"{"core": {"version": "1.0.0"}, "plugins": []}"#).unwrap();
        assert!(catalog.core.artifact_url.is_none());
        assert!(catalog.core.digest.is_none());
    }

    #[test]
    fn test_core_version_defaults() {
        let catalog = Catalog::from_json(r#"{"core": {}}"#).unwrap();
        assert_eq!(catalog.core.version, "0.0.0");
        assert!(catalog.plugins.is_empty());
    }

    #[test]
    fn test_plugin_map_duplicate_slug_last_wins() {
        let catalog = Catalog::from_json(
            r#"{
                "core": {"version": "1.0.0"},
                "plugins": [
                    {"slug": "hello", "version": "1.0.0"},
                    {"slug": "hello", "version": "2.0.0"}
                ]
            }"#,
        )
        .unwrap();

        let map = catalog.plugin_map();
        assert_eq!(map.len(), 1);
        assert_eq!(map["hello"].version, "2.0.0");
    }

    #[test]
    fn test_cache_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("catalog.json");

        Catalog::save_cache(&path, SAMPLE_CATALOG.as_bytes()).unwrap();
        let catalog = Catalog::load_cached(&path).unwrap();
        assert_eq!(catalog.core.version, "1.2.0");

        // Cached verbatim, byte for byte.
        assert_eq!(std::fs::read(&path).unwrap(), SAMPLE_CATALOG.as_bytes());
    }

    #[test]
    fn test_missing_cache_is_none() {
        let temp = TempDir::new().unwrap();
        assert!(Catalog::load_cached(&temp.path().join("catalog.json")).is_none());
    }

    #[test]
    fn test_corrupt_cache_is_none() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("catalog.json");
        std::fs::write(&path, "{broken").unwrap();
        assert!(Catalog::load_cached(&path).is_none());
    }
}
