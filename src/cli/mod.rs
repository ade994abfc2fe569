//! Command-line interface for stac-intake.
//!
//! Provides commands for converting a STAC catalog, showing its hierarchy,
//! listing the driver table, and inspecting an emitted Intake catalog.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::adapters::{CatalogReader, CatalogWriter, StacReader, YamlWriter};
use crate::config::{self, ResolvedConfig};
use crate::core::render_tree;
use crate::domain::IntakeCatalog;

/// stac-intake - Convert STAC catalogs into Intake catalogs
#[derive(Parser, Debug)]
#[command(name = "stac-intake")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a STAC catalog into an Intake catalog file
    Convert {
        /// Root catalog URL or local path
        root: String,

        /// Output file (default: catalog.yml)
        #[arg(short, long, env = "STAC_INTAKE_OUTPUT")]
        output: Option<PathBuf>,

        /// Put this between item id and asset key in source names
        #[arg(long)]
        separator: Option<String>,

        /// Fail on media types with no known driver
        #[arg(long, conflicts_with = "no_strict")]
        strict: bool,

        /// Pass unmapped media types through, even if the config is strict
        #[arg(long)]
        no_strict: bool,

        /// Intake plugin module for the catalog envelope
        #[arg(long, env = "STAC_INTAKE_PLUGIN")]
        plugin: Option<String>,
    },

    /// Show the catalog hierarchy (catalogs and collections only)
    Tree {
        /// Root catalog URL or local path
        root: String,
    },

    /// List the driver table, or resolve one media type
    Drivers {
        /// Media type to resolve, e.g. "image/png"
        media_type: Option<String>,
    },

    /// List the sources of an Intake catalog, or show one of them
    Inspect {
        /// Intake catalog file
        catalog: PathBuf,

        /// Source name
        source: Option<String>,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Convert {
                root,
                output,
                separator,
                strict,
                no_strict,
                plugin,
            } => {
                let overrides = ConvertOverrides {
                    output,
                    separator,
                    plugin,
                    strict: strict_flag(strict, no_strict),
                };
                let settings = overrides.apply(config::config()?.clone());
                convert(&root, &settings).await
            }
            Commands::Tree { root } => show_tree(&root).await,
            Commands::Drivers { media_type } => show_drivers(media_type.as_deref()),
            Commands::Inspect { catalog, source } => {
                inspect(&catalog, source.as_deref()).await
            }
            Commands::Config => show_config(),
        }
    }
}

/// `convert` flags layered over the resolved configuration
#[derive(Debug, Default)]
struct ConvertOverrides {
    output: Option<PathBuf>,
    separator: Option<String>,
    plugin: Option<String>,
    strict: Option<bool>,
}

impl ConvertOverrides {
    fn apply(self, mut settings: ResolvedConfig) -> ResolvedConfig {
        if let Some(output) = self.output {
            settings.output = output;
        }
        if let Some(separator) = self.separator {
            settings.key_separator = separator;
        }
        if let Some(plugin) = self.plugin {
            settings.plugin_module = plugin;
        }
        if let Some(strict) = self.strict {
            settings.strict_drivers = strict;
        }
        settings
    }
}

/// `--strict` / `--no-strict`; neither keeps the configured policy
fn strict_flag(strict: bool, no_strict: bool) -> Option<bool> {
    match (strict, no_strict) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

/// Build the reader from configuration
fn reader(settings: &ResolvedConfig) -> Result<StacReader> {
    StacReader::with_timeout(settings.reader_timeout)
}

/// Read, convert, and write a catalog
async fn convert(root: &str, settings: &ResolvedConfig) -> Result<()> {
    let tree = reader(settings)?
        .read(root)
        .await
        .with_context(|| format!("Failed to read STAC catalog: {}", root))?;

    let catalog = settings
        .converter()
        .convert(&tree)
        .with_context(|| format!("Failed to convert STAC catalog: {}", root))?;

    YamlWriter::new()
        .write(&catalog, &settings.output)
        .await
        .context("Failed to write Intake catalog")?;

    println!(
        "Wrote {} sources to {}",
        catalog.len(),
        settings.output.display()
    );

    Ok(())
}

/// Print the catalog hierarchy
async fn show_tree(root: &str) -> Result<()> {
    let settings = config::config()?;
    let tree = reader(settings)?
        .read(root)
        .await
        .with_context(|| format!("Failed to read STAC catalog: {}", root))?;

    print!("{}", render_tree(&tree));
    Ok(())
}

/// Print the effective driver table or one resolution
fn show_drivers(media_type: Option<&str>) -> Result<()> {
    let settings = config::config()?;

    if let Some(media_type) = media_type {
        let resolution = settings.drivers.resolve(media_type);
        if resolution.is_resolved() {
            println!("{}", resolution.driver_name());
        } else {
            println!("{} (unmapped, passed through)", resolution.driver_name());
        }
        return Ok(());
    }

    println!("{:<58} {}", "MEDIA TYPE", "DRIVER");
    println!("{}", "-".repeat(75));
    for (media_type, driver) in settings.drivers.iter() {
        println!("{:<58} {}", media_type, driver);
    }

    Ok(())
}

/// List sources of an emitted catalog, or show one descriptor
async fn inspect(path: &Path, source: Option<&str>) -> Result<()> {
    let catalog = IntakeCatalog::load(path).await?;

    match source {
        Some(name) => {
            let descriptor = catalog
                .source(name)
                .with_context(|| format!("Source '{}' not found in {}", name, path.display()))?;

            println!("Source: {}", name);
            println!("Description: {}", descriptor.description);
            println!("Driver: {}", descriptor.driver);
            println!("URL: {}", descriptor.args.urlpath);
            if !descriptor.args.chunks.is_empty() {
                println!("Chunks:");
                for (dim, size) in &descriptor.args.chunks {
                    println!("  {}: {}", dim, size);
                }
            }
        }
        None => {
            if catalog.is_empty() {
                println!("No sources in {}", path.display());
                return Ok(());
            }

            println!("{:<40} {:<16} {}", "SOURCE", "DRIVER", "DESCRIPTION");
            println!("{}", "-".repeat(80));
            for (name, descriptor) in &catalog.sources {
                println!(
                    "{:<40} {:<16} {}",
                    name, descriptor.driver, descriptor.description
                );
            }
        }
    }

    Ok(())
}

/// Show resolved configuration
fn show_config() -> Result<()> {
    let settings = config::config()?;

    let config_file = match &settings.config_file {
        Some(path) => path.display().to_string(),
        None => "(none)".to_string(),
    };

    println!("Config file: {}", config_file);
    println!("Output: {}", settings.output.display());
    println!("Plugin module: {}", settings.plugin_module);
    println!("Key separator: {:?}", settings.key_separator);
    println!("Strict drivers: {}", settings.strict_drivers);
    println!("Reader timeout: {}s", settings.reader_timeout.as_secs());
    println!("Drivers: {} mappings", settings.drivers.len());

    Ok(())
}
