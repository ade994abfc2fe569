//! STAC tree -> Intake catalog conversion.
//!
//! Every asset of every item reachable from the root becomes one source
//! descriptor. The conversion is a pure function of the tree and the
//! converter's settings: no I/O, no hidden state.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use super::drivers::{DriverResolution, DriverTable, UnmappedPolicy};
use super::error::ConvertError;
use crate::domain::{
    Asset, CatalogNode, IntakeCatalog, Item, SourceArgs, SourceDescriptor, SourceTable,
    DEFAULT_PLUGIN_MODULE,
};

/// How a source name is built from an item id and an asset key
///
/// `Concat` joins the two with nothing in between, so distinct pairs can
/// produce the same name (`"a" + "b"` and `"ab" + ""`). Later descriptors
/// overwrite earlier ones when that happens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum KeyStrategy {
    /// `item.id + asset_key`
    #[default]
    Concat,
    /// `item.id + sep + asset_key`
    Separator(String),
}

impl KeyStrategy {
    /// Build from a configured separator; empty means plain concatenation
    pub fn from_separator(sep: &str) -> Self {
        if sep.is_empty() {
            Self::Concat
        } else {
            Self::Separator(sep.to_string())
        }
    }

    pub fn source_name(&self, item_id: &str, asset_key: &str) -> String {
        match self {
            KeyStrategy::Concat => format!("{}{}", item_id, asset_key),
            KeyStrategy::Separator(sep) => format!("{}{}{}", item_id, sep, asset_key),
        }
    }
}

/// Catalog converter with an explicit driver table and naming policy
#[derive(Debug, Clone)]
pub struct Converter {
    drivers: DriverTable,
    keys: KeyStrategy,
    unmapped: UnmappedPolicy,
    plugin_module: String,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(DriverTable::builtin())
    }
}

impl Converter {
    /// Create a converter with the default naming and pass-through policy
    pub fn new(drivers: DriverTable) -> Self {
        Self {
            drivers,
            keys: KeyStrategy::default(),
            unmapped: UnmappedPolicy::default(),
            plugin_module: DEFAULT_PLUGIN_MODULE.to_string(),
        }
    }

    pub fn with_key_strategy(mut self, keys: KeyStrategy) -> Self {
        self.keys = keys;
        self
    }

    pub fn with_unmapped_policy(mut self, unmapped: UnmappedPolicy) -> Self {
        self.unmapped = unmapped;
        self
    }

    pub fn with_plugin_module(mut self, module: impl Into<String>) -> Self {
        self.plugin_module = module.into();
        self
    }

    pub fn drivers(&self) -> &DriverTable {
        &self.drivers
    }

    /// Convert every asset reachable from `root` into a source descriptor
    pub fn convert(&self, root: &CatalogNode) -> Result<IntakeCatalog, ConvertError> {
        let mut sources = SourceTable::new();
        let mut items = 0usize;
        let mut collisions = 0usize;

        for item in root.items() {
            items += 1;
            for (key, descriptor) in self.item_sources(item)? {
                if let Some(previous) = sources.insert(key.clone(), descriptor) {
                    collisions += 1;
                    warn!(
                        source = %key,
                        item = %item.id,
                        replaced = %previous.args.urlpath,
                        "Source name collision, keeping the later asset"
                    );
                }
            }
        }

        info!(
            root = %root.id,
            items,
            sources = sources.len(),
            collisions,
            "Converted catalog"
        );

        Ok(IntakeCatalog::new(self.plugin_module.clone(), sources))
    }

    /// Descriptors for one item, in asset order
    pub fn item_sources(
        &self,
        item: &Item,
    ) -> Result<Vec<(String, SourceDescriptor)>, ConvertError> {
        item.assets
            .iter()
            .map(|(key, asset)| {
                let descriptor = self.describe(&item.id, key, asset)?;
                Ok((self.keys.source_name(&item.id, key), descriptor))
            })
            .collect()
    }

    /// Build the descriptor for a single asset
    pub fn describe(
        &self,
        item_id: &str,
        asset_key: &str,
        asset: &Asset,
    ) -> Result<SourceDescriptor, ConvertError> {
        let missing = |field| ConvertError::MissingField {
            item_id: item_id.to_string(),
            asset_key: asset_key.to_string(),
            field,
        };
        let href = asset.href.as_deref().ok_or_else(|| missing("href"))?;
        let media_type = asset.media_type.as_deref().ok_or_else(|| missing("type"))?;

        let driver = match self.drivers.resolve(media_type) {
            DriverResolution::Resolved(driver) => driver,
            DriverResolution::Unmapped(media_type) => match self.unmapped {
                UnmappedPolicy::PassThrough => {
                    warn!(
                        item = %item_id,
                        asset = %asset_key,
                        %media_type,
                        "No driver mapped, passing media type through"
                    );
                    media_type
                }
                UnmappedPolicy::Reject => {
                    return Err(ConvertError::UnmappedDriver {
                        item_id: item_id.to_string(),
                        asset_key: asset_key.to_string(),
                        media_type: media_type.to_string(),
                    });
                }
            },
        };

        debug!(item = %item_id, asset = %asset_key, driver, "Described asset");

        Ok(SourceDescriptor {
            description: asset
                .title
                .clone()
                .unwrap_or_else(|| asset_key.to_string()),
            driver: driver.to_string(),
            args: SourceArgs {
                urlpath: href.to_string(),
                chunks: BTreeMap::new(),
            },
        })
    }
}
