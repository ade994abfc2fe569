//! Intake catalog document (the `catalog.yml` we emit).

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Intake catalog format version written into `metadata.version`
pub const CATALOG_VERSION: u32 = 1;

/// Plugin module that provides the xarray-based drivers
pub const DEFAULT_PLUGIN_MODULE: &str = "intake_xarray";

/// Source name -> descriptor
pub type SourceTable = BTreeMap<String, SourceDescriptor>;

/// A complete Intake catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeCatalog {
    pub metadata: CatalogMetadata,
    pub plugins: Plugins,
    #[serde(default)]
    pub sources: SourceTable,
}

impl IntakeCatalog {
    /// Wrap a source table in the standard envelope
    pub fn new(plugin_module: impl Into<String>, sources: SourceTable) -> Self {
        Self {
            metadata: CatalogMetadata {
                version: CATALOG_VERSION,
            },
            plugins: Plugins {
                source: vec![PluginEntry {
                    module: plugin_module.into(),
                }],
            },
            sources,
        }
    }

    /// Parse a catalog from YAML content
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse Intake catalog YAML")
    }

    /// Render the catalog as YAML
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Load a previously written catalog from disk
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read catalog: {}", path.display()))?;

        Self::from_yaml(&content)
    }

    /// Get a source by name
    pub fn source(&self, name: &str) -> Option<&SourceDescriptor> {
        self.sources.get(name)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogMetadata {
    pub version: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plugins {
    pub source: Vec<PluginEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginEntry {
    pub module: String,
}

/// How to load one asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    /// Asset title, or the asset key when the asset has no title
    pub description: String,

    /// Intake driver name
    pub driver: String,

    pub args: SourceArgs,
}

/// Driver arguments
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceArgs {
    pub urlpath: String,

    /// Chunking hint for array drivers (dimension -> chunk size)
    #[serde(default)]
    pub chunks: BTreeMap<String, u64>,
}
