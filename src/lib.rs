//! stac-intake - STAC to Intake catalog converter
//!
//! Walks a STAC (SpatioTemporal Asset Catalog) hierarchy and emits an
//! Intake catalog in which every asset of every reachable item is a named
//! data source with a loader driver chosen from its MIME type.
//!
//! # Architecture
//!
//! - A reader materializes the STAC tree (remote or local documents)
//! - The converter turns the tree into a source table (pure, no I/O)
//! - A writer persists the table as `catalog.yml`
//!
//! # Modules
//!
//! - `adapters`: STAC reader and YAML writer
//! - `core`: Conversion logic (Converter, DriverTable, tree display)
//! - `domain`: Data structures (CatalogNode, Item, Asset, IntakeCatalog)
//! - `config`: Configuration discovery and resolution
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Convert a remote catalog into ./catalog.yml
//! stac-intake convert https://example.com/stac/catalog.json
//!
//! # Show the catalog hierarchy
//! stac-intake tree ./stac/catalog.json
//!
//! # Look up one source in the emitted catalog
//! stac-intake inspect catalog.yml LC08_scene_B4
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;

// Re-export main types at crate root for convenience
pub use crate::adapters::{CatalogReader, CatalogWriter, StacReader, YamlWriter};
pub use crate::core::{
    ConvertError, Converter, DriverResolution, DriverTable, KeyStrategy, UnmappedPolicy, WriteError,
};
pub use crate::domain::{Asset, CatalogNode, IntakeCatalog, Item, SourceDescriptor};
