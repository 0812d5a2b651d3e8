//! Plugin system error types.

use thiserror::Error;

/// Result type for plugin operations.
pub type PluginResult<T> = Result<T, PluginError>;

/// Errors that can occur during plugin operations.
#[derive(Debug, Error)]
pub enum PluginError {
    /// Invalid plugin manifest.
    #[error("Invalid plugin manifest: {0}")]
    InvalidManifest(String),

    /// Plugin loading failed (bad entry or unknown capability).
    #[error("Failed to load plugin: {0}")]
    LoadError(String),

    /// No plugin with this slug was discovered.
    #[error("Unknown plugin '{0}'")]
    UnknownPlugin(String),

    /// Plugin is known but not currently loaded.
    #[error("Plugin '{0}' is not loaded. Enable it first")]
    NotLoaded(String),

    /// Plugin is loaded but does not expose this command.
    #[error("Plugin '{plugin}' has no command '{command}'")]
    UnknownCommand { plugin: String, command: String },

    /// A plugin command failed while running.
    #[error("Command failed: {0}")]
    ExecutionError(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
