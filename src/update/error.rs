//! Update system error types.

use thiserror::Error;

/// Result type for update operations.
pub type UpdateResult<T> = Result<T, UpdateError>;

/// Errors that can occur while checking for or applying updates.
#[derive(Debug, Error)]
pub enum UpdateError {
    /// No catalog supplied and none cached locally.
    #[error("No catalog available. Run 'modkit update check' with network access first")]
    NoCatalog,

    /// Every configured catalog source failed.
    #[error("Could not download the catalog from any source: {last_error}")]
    CatalogUnavailable { last_error: String },

    /// Network failure for a single request.
    #[error("Network error: {0}")]
    Network(String),

    /// Catalog entry has no artifact URL to download.
    #[error("Missing artifact URL for '{0}' in the catalog")]
    MissingArtifactUrl(String),

    /// Downloaded artifact does not match the catalog digest.
    #[error("Checksum mismatch for '{name}': expected {expected}, got {actual}")]
    ChecksumMismatch { name: String, expected: String, actual: String },

    /// Version string could not be parsed as semver.
    #[error("Invalid version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    /// Archive could not be extracted.
    #[error("Archive error: {0}")]
    Archive(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON document.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
