//! Domain types for the converter.
//!
//! This module contains the data structures on both sides of a conversion:
//! - STAC: the resolved catalog tree (catalogs, collections, items, assets)
//! - Intake: the emitted catalog document and its source descriptors

pub mod intake;
pub mod stac;

// Re-export commonly used types
pub use intake::{
    CatalogMetadata, IntakeCatalog, PluginEntry, Plugins, SourceArgs, SourceDescriptor,
    SourceTable, CATALOG_VERSION, DEFAULT_PLUGIN_MODULE,
};
pub use stac::{Asset, CatalogKind, CatalogNode, Item, Items, Node};
