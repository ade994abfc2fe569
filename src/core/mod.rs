//! Core conversion logic.
//!
//! This module contains:
//! - Drivers: MIME type to Intake driver lookup
//! - Converter: STAC tree to Intake catalog conversion
//! - Tree: catalog hierarchy display
//! - Error: failures surfaced to callers

pub mod converter;
pub mod drivers;
pub mod error;
pub mod tree;

// Re-export commonly used types
pub use converter::{Converter, KeyStrategy};
pub use drivers::{DriverResolution, DriverTable, UnmappedPolicy};
pub use error::{ConvertError, WriteError};
pub use tree::{render_tree, walk_catalogs};
