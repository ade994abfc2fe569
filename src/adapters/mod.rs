//! Adapter interfaces for the systems on either side of a conversion.
//!
//! A reader materializes a STAC tree from some location; a writer persists
//! the resulting Intake catalog. The converter itself never does I/O.

pub mod intake;
pub mod stac;

use std::path::Path;

use async_trait::async_trait;

use crate::core::ConvertError;
use crate::domain::{CatalogNode, IntakeCatalog};

pub use intake::YamlWriter;
pub use stac::StacReader;

/// Source of a fully resolved catalog tree
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// Human-readable reader name
    fn name(&self) -> &str;

    /// Load the catalog rooted at `location` (URL or local path)
    async fn read(&self, location: &str) -> Result<CatalogNode, ConvertError>;
}

/// Destination for an emitted Intake catalog
#[async_trait]
pub trait CatalogWriter: Send + Sync {
    /// Human-readable writer name
    fn name(&self) -> &str;

    /// Persist `catalog` at `path`
    async fn write(&self, catalog: &IntakeCatalog, path: &Path) -> Result<(), ConvertError>;
}
