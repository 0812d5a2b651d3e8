//! The capability interface plugins implement, and the builtin registry.
//!
//! Plugins are statically registered: a manifest's `entry` of
//! `"builtin:<capability>"` is resolved against a compile-time table of
//! factory functions. Dispatch always goes through the [`Capability`] trait
//! object, never through downcasting.

use std::path::Path;

use super::{PluginError, PluginResult};

/// Interface every plugin implementation must satisfy.
pub trait Capability {
    /// Names of the commands this capability exposes.
    fn commands(&self) -> Vec<&'static str>;

    /// Hook run before the capability is registered as loaded.
    fn activate(&mut self) -> PluginResult<()> {
        Ok(())
    }

    /// Hook run before the capability is dropped on disable.
    fn deactivate(&mut self) -> PluginResult<()> {
        Ok(())
    }

    /// Invoke a command by name. Output is the capability's own side effect.
    fn invoke(&mut self, command: &str, args: &[String]) -> PluginResult<()>;
}

/// Factory producing a fresh capability instance.
pub type CapabilityFactory = fn() -> Box<dyn Capability>;

/// Compile-time registration table for statically linked capabilities.
const BUILTIN_CAPABILITIES: &[(&str, CapabilityFactory)] =
    &[("hello", make_hello), ("fileinfo", make_fileinfo)];

/// Resolve an `entry`'s `(unit, capability)` parts into a live instance.
pub fn resolve_entry(unit: &str, capability: &str) -> PluginResult<Box<dyn Capability>> {
    if unit != "builtin" {
        return Err(PluginError::LoadError(format!(
            "unknown capability unit '{unit}': only 'builtin' capabilities are registered"
        )));
    }

    BUILTIN_CAPABILITIES
        .iter()
        .find(|(name, _)| *name == capability)
        .map(|(_, factory)| factory())
        .ok_or_else(|| {
            PluginError::LoadError(format!("no registered capability named '{capability}'"))
        })
}

fn make_hello() -> Box<dyn Capability> {
    Box::new(HelloCapability)
}

fn make_fileinfo() -> Box<dyn Capability> {
    Box::new(FileInfoCapability)
}

/// Demo capability that greets the user.
struct HelloCapability;

impl Capability for HelloCapability {
    fn commands(&self) -> Vec<&'static str> {
        vec!["greet"]
    }

    fn invoke(&mut self, command: &str, args: &[String]) -> PluginResult<()> {
        match command {
            "greet" => {
                if args.is_empty() {
                    println!("Hello from the hello plugin!");
                } else {
                    println!("Hello, {}!", args.join(" "));
                }
                Ok(())
            }
            _ => Err(PluginError::UnknownCommand {
                plugin: "hello".to_string(),
                command: command.to_string(),
            }),
        }
    }
}

/// Demo capability that reports basic file metadata.
struct FileInfoCapability;

impl Capability for FileInfoCapability {
    fn commands(&self) -> Vec<&'static str> {
        vec!["stat"]
    }

    fn invoke(&mut self, command: &str, args: &[String]) -> PluginResult<()> {
        match command {
            "stat" => {
                let path = args.first().ok_or_else(|| {
                    PluginError::ExecutionError("usage: stat <path>".to_string())
                })?;
                let path = Path::new(path);
                match std::fs::metadata(path) {
                    Ok(meta) => {
                        let kind = if meta.is_dir() { "directory" } else { "file" };
                        println!("{}: {} ({} bytes)", path.display(), kind, meta.len());
                    }
                    Err(_) => {
                        println!("{}: not found", path.display());
                    }
                }
                Ok(())
            }
            _ => Err(PluginError::UnknownCommand {
                plugin: "fileinfo".to_string(),
                command: command.to_string(),
            }),
        }
    }
}
