//! In-memory STAC tree.
//!
//! These are the fully resolved nodes the reader hands to the converter.
//! The tree is owned top-down: a catalog owns its children, items are leaves.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Kind of a non-leaf node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogKind {
    Catalog,
    Collection,
}

/// A node in the catalog tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Catalog(CatalogNode),
    Item(Item),
}

impl Node {
    pub fn as_catalog(&self) -> Option<&CatalogNode> {
        match self {
            Node::Catalog(catalog) => Some(catalog),
            Node::Item(_) => None,
        }
    }
}

/// A catalog or collection with its ordered children
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogNode {
    pub id: String,
    pub kind: CatalogKind,
    pub title: Option<String>,
    pub description: Option<String>,
    pub children: Vec<Node>,
}

impl CatalogNode {
    /// Create an empty catalog
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: CatalogKind::Catalog,
            title: None,
            description: None,
            children: Vec::new(),
        }
    }

    /// Create an empty collection
    pub fn collection(id: impl Into<String>) -> Self {
        Self {
            kind: CatalogKind::Collection,
            ..Self::new(id)
        }
    }

    /// Append a child catalog or collection
    pub fn with_catalog(mut self, child: CatalogNode) -> Self {
        self.children.push(Node::Catalog(child));
        self
    }

    /// Append a child item
    pub fn with_item(mut self, item: Item) -> Self {
        self.children.push(Node::Item(item));
        self
    }

    /// Direct children that are catalogs or collections
    pub fn catalogs(&self) -> impl Iterator<Item = &CatalogNode> {
        self.children.iter().filter_map(Node::as_catalog)
    }

    /// Lazily walk every item reachable from this node, at any depth.
    ///
    /// Depth-first, children in the order their parent listed them.
    pub fn items(&self) -> Items<'_> {
        Items {
            stack: vec![self.children.iter()],
        }
    }
}

/// Depth-first iterator over all items below a catalog
pub struct Items<'a> {
    stack: Vec<std::slice::Iter<'a, Node>>,
}

impl<'a> Iterator for Items<'a> {
    type Item = &'a Item;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(level) = self.stack.last_mut() {
            match level.next() {
                Some(Node::Item(item)) => return Some(item),
                Some(Node::Catalog(catalog)) => self.stack.push(catalog.children.iter()),
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}

/// A STAC item: a leaf owning an ordered set of assets
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Item {
    pub id: String,

    /// Assets in document order
    #[serde(default, deserialize_with = "ordered_assets")]
    pub assets: Vec<(String, Asset)>,
}

impl Item {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            assets: Vec::new(),
        }
    }

    /// Add an asset under `key`, keeping insertion order
    pub fn with_asset(mut self, key: impl Into<String>, asset: Asset) -> Self {
        self.assets.push((key.into(), asset));
        self
    }

    /// Look up an asset by key
    pub fn asset(&self, key: &str) -> Option<&Asset> {
        self.assets.iter().find(|(k, _)| k == key).map(|(_, a)| a)
    }
}

/// A downloadable file attached to an item.
///
/// `href` and `media_type` are required by STAC but are kept optional here
/// so that a malformed document still loads and fails at conversion time
/// with a precise error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub href: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// MIME type
    #[serde(rename = "type")]
    pub media_type: Option<String>,

    /// Everything else (roles, eo:bands, ...), carried but unused
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Asset {
    pub fn new(href: impl Into<String>, media_type: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            media_type: Some(media_type.into()),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Deserialize a JSON object into key/value pairs without losing key order
fn ordered_assets<'de, D>(deserializer: D) -> Result<Vec<(String, Asset)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OrderedAssets;

    impl<'de> Visitor<'de> for OrderedAssets {
        type Value = Vec<(String, Asset)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of asset key to asset")
        }

        fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
        where
            M: MapAccess<'de>,
        {
            let mut assets: Vec<(String, Asset)> =
                Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, asset)) = map.next_entry::<String, Asset>()? {
                // Duplicate keys: the later entry replaces the earlier one in place
                if let Some(slot) = assets.iter_mut().find(|slot| slot.0 == key) {
                    slot.1 = asset;
                } else {
                    assets.push((key, asset));
                }
            }
            Ok(assets)
        }
    }

    deserializer.deserialize_map(OrderedAssets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> CatalogNode {
        CatalogNode::new("root")
            .with_item(Item::new("top"))
            .with_catalog(
                CatalogNode::collection("landsat")
                    .with_catalog(CatalogNode::new("2020").with_item(Item::new("deep")))
                    .with_item(Item::new("scene-1")),
            )
            .with_catalog(CatalogNode::new("empty"))
            .with_item(Item::new("last"))
    }

    #[test]
    fn test_items_walks_all_depths_in_order() {
        let tree = sample_tree();
        let ids: Vec<&str> = tree.items().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["top", "deep", "scene-1", "last"]);
    }

    #[test]
    fn test_items_on_empty_catalog() {
        let tree = CatalogNode::new("root");
        assert_eq!(tree.items().count(), 0);
    }

    #[test]
    fn test_catalogs_skips_items() {
        let tree = sample_tree();
        let ids: Vec<&str> = tree.catalogs().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["landsat", "empty"]);
    }

    #[test]
    fn test_item_assets_keep_document_order() {
        let json = r#"{
            "id": "scene",
            "assets": {
                "zeta": {"href": "z.tif", "type": "image/tiff"},
                "alpha": {"href": "a.png", "type": "image/png", "title": "A"},
                "mid": {"href": "m.xml", "type": "text/xml", "roles": ["metadata"]}
            }
        }"#;

        let item: Item = serde_json::from_str(json).unwrap();
        let keys: Vec<&str> = item.assets.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);

        let alpha = item.asset("alpha").unwrap();
        assert_eq!(alpha.title.as_deref(), Some("A"));
        assert_eq!(alpha.media_type.as_deref(), Some("image/png"));

        let mid = item.asset("mid").unwrap();
        assert!(mid.extra.contains_key("roles"));
    }

    #[test]
    fn test_duplicate_asset_key_replaces_in_place() {
        let json = r#"{
            "id": "scene",
            "assets": {
                "B1": {"href": "old.tif", "type": "image/tiff"},
                "B2": {"href": "b2.tif", "type": "image/tiff"},
                "B1": {"href": "new.png", "type": "image/png"}
            }
        }"#;

        let item: Item = serde_json::from_str(json).unwrap();
        let keys: Vec<&str> = item.assets.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["B1", "B2"]);

        let b1 = item.asset("B1").unwrap();
        assert_eq!(b1.href.as_deref(), Some("new.png"));
        assert_eq!(b1.media_type.as_deref(), Some("image/png"));
    }

    #[test]
    fn test_asset_missing_fields_still_parse() {
        let asset: Asset = serde_json::from_str(r#"{"title": "no href"}"#).unwrap();
        assert!(asset.href.is_none());
        assert!(asset.media_type.is_none());
    }
}
