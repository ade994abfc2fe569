//! Configuration for stac-intake.
//!
//! Configuration sources (highest priority first):
//! 1. Command-line flags (applied by the CLI on top of this)
//! 2. Environment variables (STAC_INTAKE_OUTPUT, STAC_INTAKE_PLUGIN)
//! 3. Config file (.stac-intake/config.yaml, or the user config directory)
//! 4. Defaults
//!
//! Config file discovery:
//! - Searches current directory and parents for .stac-intake/config.yaml
//! - Falls back to <config_dir>/stac-intake/config.yaml
//! - A relative `output` path is relative to the project root (the parent of .stac-intake/)

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::adapters::stac::DEFAULT_TIMEOUT_SECS;
use crate::core::{Converter, DriverTable, KeyStrategy, UnmappedPolicy};
use crate::domain::DEFAULT_PLUGIN_MODULE;

/// Default output file name
pub const DEFAULT_OUTPUT: &str = "catalog.yml";

/// Name of the per-project config directory
const CONFIG_DIR: &str = ".stac-intake";

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    /// Output catalog path
    pub output: Option<String>,
    /// Intake plugin module listed in the catalog envelope
    pub plugin_module: Option<String>,
    /// Inserted between item id and asset key; empty means none
    pub key_separator: Option<String>,
    /// Fail on media types without a driver instead of passing them through
    pub strict_drivers: Option<bool>,
    /// Extra or replacement media type -> driver mappings
    #[serde(default)]
    pub drivers: BTreeMap<String, String>,
    #[serde(default)]
    pub reader: Option<ReaderConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReaderConfig {
    pub timeout_seconds: Option<u64>,
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Where the Intake catalog is written
    pub output: PathBuf,
    pub plugin_module: String,
    pub key_separator: String,
    pub strict_drivers: bool,
    /// Built-in table with config overrides applied
    pub drivers: DriverTable,
    pub reader_timeout: Duration,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            plugin_module: DEFAULT_PLUGIN_MODULE.to_string(),
            key_separator: String::new(),
            strict_drivers: false,
            drivers: DriverTable::builtin(),
            reader_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            config_file: None,
        }
    }
}

impl ResolvedConfig {
    /// Build a converter from these settings
    pub fn converter(&self) -> Converter {
        let unmapped = if self.strict_drivers {
            UnmappedPolicy::Reject
        } else {
            UnmappedPolicy::PassThrough
        };

        Converter::new(self.drivers.clone())
            .with_key_strategy(KeyStrategy::from_separator(&self.key_separator))
            .with_unmapped_policy(unmapped)
            .with_plugin_module(self.plugin_module.clone())
    }

    /// Apply a parsed config file found at `config_path`
    fn apply_file(&mut self, config: ConfigFile, config_path: &Path) -> Result<()> {
        // Base directory is the parent of .stac-intake/ for project configs
        let config_dir = config_path.parent().unwrap_or(Path::new("."));
        let base_dir = if config_dir.file_name().is_some_and(|n| n == CONFIG_DIR) {
            config_dir.parent().unwrap_or(Path::new("."))
        } else {
            config_dir
        };

        if let Some(ref output) = config.output {
            self.output = resolve_path(base_dir, output);
        }
        if let Some(plugin_module) = config.plugin_module {
            self.plugin_module = plugin_module;
        }
        if let Some(key_separator) = config.key_separator {
            self.key_separator = key_separator;
        }
        if let Some(strict) = config.strict_drivers {
            self.strict_drivers = strict;
        }
        self.drivers = std::mem::take(&mut self.drivers).merged(config.drivers);
        if let Some(timeout) = config.reader.as_ref().and_then(|r| r.timeout_seconds) {
            if timeout == 0 {
                anyhow::bail!(
                    "reader.timeout_seconds must be greater than zero in {}",
                    config_path.display()
                );
            }
            self.reader_timeout = Duration::from_secs(timeout);
        }
        self.config_file = Some(config_path.to_path_buf());
        Ok(())
    }

    /// Apply environment overrides
    fn apply_env(&mut self) {
        self.apply_env_with(|name| std::env::var(name).ok());
    }

    fn apply_env_with<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(output) = var("STAC_INTAKE_OUTPUT") {
            self.output = PathBuf::from(output);
        }
        if let Some(plugin) = var("STAC_INTAKE_PLUGIN") {
            self.plugin_module = plugin;
        }
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let current = std::env::current_dir().ok()?;
    find_config_file_from(&current)
}

/// Search `start` and its parents, then the user config directory
fn find_config_file_from(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_DIR).join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    // User-level config
    dirs::config_dir()
        .map(|dir| dir.join("stac-intake").join("config.yaml"))
        .filter(|path| path.exists())
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's project root
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let mut config = ResolvedConfig::default();

    if let Some(config_path) = find_config_file() {
        let file = load_config_file(&config_path)?;
        config.apply_file(file, &config_path)?;
    }

    config.apply_env();
    Ok(config)
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}
