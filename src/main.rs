//! Modkit - modular CLI with plugins and catalog-driven updates.
//!
//! The binary is a thin presentation layer: it parses arguments, constructs
//! the plugin manager and updater, invokes their operations, and renders
//! the results. Exit code 0 means the top-level operation succeeded.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use modkit::plugin::PluginManager;
use modkit::update::{ApplyOptions, Catalog, UpdateKind, Updater, UpdaterConfig};

/// Modular CLI with plugins and catalog-driven updates
#[derive(Parser)]
#[command(name = "modkit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Override the application data directory
    #[arg(long, global = true, value_name = "DIR", env = "MODKIT_DATA_DIR")]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all known plugins with their status and commands
    List,

    /// Enable a plugin and load it
    Enable {
        /// Plugin slug
        slug: String,
    },

    /// Disable a plugin and unload it
    Disable {
        /// Plugin slug
        slug: String,
    },

    /// Run a command exposed by a loaded plugin
    Run {
        /// Plugin slug
        slug: String,

        /// Plugin command name
        command: String,

        /// Arguments passed through to the plugin command
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Check for or apply core and plugin updates
    Update {
        /// Update operation
        #[command(subcommand)]
        operation: UpdateOperation,
    },
}

#[derive(Subcommand)]
enum UpdateOperation {
    /// Check for available updates
    Check {
        /// Use only the locally cached catalog, without downloading
        #[arg(long)]
        offline: bool,
    },

    /// Download and install updates
    Apply {
        /// Update the application core
        #[arg(long)]
        core: bool,

        /// Plugins to update (empty = all currently known plugins)
        #[arg(long, num_args = 0.., value_name = "SLUG")]
        plugins: Vec<String>,

        /// Do not install catalog plugins that are not yet present locally
        #[arg(long)]
        no_new_plugins: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose { EnvFilter::new("debug") } else { EnvFilter::new("warn") };

    tracing_subscriber::registry().with(fmt::layer().with_target(false)).with(filter).init();

    let data_dir = resolve_data_dir(cli.data_dir)?;

    match cli.command {
        Commands::List => cmd_list(&data_dir),
        Commands::Enable { slug } => cmd_enable(&data_dir, &slug),
        Commands::Disable { slug } => cmd_disable(&data_dir, &slug),
        Commands::Run { slug, command, args } => cmd_run(&data_dir, &slug, &command, &args),
        Commands::Update { operation } => match operation {
            UpdateOperation::Check { offline } => cmd_update_check(&data_dir, offline),
            UpdateOperation::Apply { core, plugins, no_new_plugins } => {
                cmd_update_apply(&data_dir, core, plugins, no_new_plugins)
            }
        },
    }
}

/// Application data directory: flag/env override, else the platform default.
fn resolve_data_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    Ok(dirs::data_dir().context("could not determine data directory")?.join("modkit"))
}

fn build_manager(data_dir: &Path) -> Result<PluginManager> {
    let manager = PluginManager::new(data_dir.join("plugins"), &data_dir.join("registry.json"))?;
    Ok(manager)
}

fn cmd_list(data_dir: &Path) -> Result<()> {
    let manager = build_manager(data_dir)?;
    let plugins = manager.list_plugins();

    if plugins.is_empty() {
        println!("No plugins installed.");
        println!("\nPlugins live in: {}", manager.plugins_dir().display());
        return Ok(());
    }

    println!("Available plugins:\n");
    for manifest in plugins {
        let status = if manager.is_loaded(&manifest.slug) { "enabled" } else { "disabled" };
        println!("  {} ({}) v{} [{}]", manifest.name, manifest.slug, manifest.version, status);

        if let Some(ref author) = manifest.author {
            println!("      Author: {}", author);
        }
        if let Some(ref description) = manifest.description {
            println!("      {}", description);
        }
        if let Some(commands) = manager.loaded_commands(&manifest.slug) {
            println!("      Commands: {}", commands.join(", "));
        }
        println!();
    }
    Ok(())
}

fn cmd_enable(data_dir: &Path, slug: &str) -> Result<()> {
    let mut manager = build_manager(data_dir)?;
    manager.enable(slug)?;
    println!("Plugin '{}' enabled.", slug);
    Ok(())
}

fn cmd_disable(data_dir: &Path, slug: &str) -> Result<()> {
    let mut manager = build_manager(data_dir)?;
    manager.disable(slug)?;
    println!("Plugin '{}' disabled.", slug);
    Ok(())
}

fn cmd_run(data_dir: &Path, slug: &str, command: &str, args: &[String]) -> Result<()> {
    let mut manager = build_manager(data_dir)?;
    manager.run_command(slug, command, args)?;
    Ok(())
}

fn updater_config(data_dir: &Path) -> Result<UpdaterConfig> {
    let app_root = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(std::path::Path::to_path_buf))
        .context("could not determine application root")?;
    Ok(UpdaterConfig::new(data_dir, app_root))
}

fn cmd_update_check(data_dir: &Path, offline: bool) -> Result<()> {
    let manager = build_manager(data_dir)?;
    let config = updater_config(data_dir)?;
    let updater = Updater::new(&manager, config)?;

    let catalog: Option<Catalog> = if offline {
        None // check_updates falls back to the local cache
    } else {
        Some(updater.download_catalog()?)
    };

    let updates = updater.check_updates(catalog.as_ref())?;

    if updates.is_empty() {
        println!("Everything is up to date.");
        return Ok(());
    }

    println!("Available updates:\n");
    for update in &updates {
        match update.kind {
            UpdateKind::Core => {
                let current = update.current.as_deref().unwrap_or("?");
                println!("  core: {} -> {}", current, update.target);
            }
            UpdateKind::Plugin => {
                let current = update.current.as_deref().unwrap_or("?");
                println!("  {}: {} -> {}", update.id, current, update.target);
            }
            UpdateKind::New => {
                println!("  {}: {} (new)", update.id, update.target);
            }
        }
    }
    println!("\nApply with: modkit update apply");
    Ok(())
}

fn cmd_update_apply(
    data_dir: &Path,
    core: bool,
    plugins: Vec<String>,
    no_new_plugins: bool,
) -> Result<()> {
    let manager = build_manager(data_dir)?;
    let config = updater_config(data_dir)?;
    let updater = Updater::new(&manager, config)?;

    let Some(catalog) = updater.load_local_catalog() else {
        anyhow::bail!("No catalog available. Run 'modkit update check' first to download it.");
    };

    let options = ApplyOptions { core, plugins, include_new_plugins: !no_new_plugins };
    let updated = updater.apply_updates(&catalog, &options)?;

    if updated.is_empty() {
        println!("Nothing to update.");
    } else {
        println!("Updated:");
        for path in &updated {
            println!("  {}", path.display());
        }
    }
    Ok(())
}
