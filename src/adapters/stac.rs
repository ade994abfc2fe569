//! STAC reader over HTTP(S) and the local filesystem.
//!
//! Starting from the root document, follows `child` and `item` links
//! (resolved against the linking document's URL) until every reachable
//! document is loaded, then assembles the tree. Documents are fetched one
//! at a time; a document is visited at most once, which also breaks link
//! cycles.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use serde::de::IgnoredAny;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use super::CatalogReader;
use crate::core::ConvertError;
use crate::domain::{CatalogKind, CatalogNode, Item, Node};

/// Default per-request timeout for remote documents
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Fields shared by every STAC document, enough to classify it
#[derive(Debug, Deserialize)]
struct StacHeader {
    #[serde(rename = "type")]
    doc_type: Option<String>,
    id: String,
    title: Option<String>,
    description: Option<String>,
    #[serde(default)]
    links: Vec<Link>,
    assets: Option<IgnoredAny>,
    extent: Option<IgnoredAny>,
}

#[derive(Debug, Deserialize)]
struct Link {
    rel: String,
    href: String,
}

/// A loaded document before tree assembly
enum Document {
    Catalog { node: CatalogNode, links: Vec<Url> },
    Item(Item),
}

/// Reads STAC catalogs from `http`, `https`, and `file` URLs or plain paths
pub struct StacReader {
    client: reqwest::Client,
}

impl Default for StacReader {
    fn default() -> Self {
        Self::new()
    }
}

impl StacReader {
    /// Create a reader with a default HTTP client
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Create a reader whose HTTP requests give up after `timeout`
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }

    /// Fetch the raw text of one document
    async fn fetch(&self, url: &Url) -> Result<String, ConvertError> {
        match url.scheme() {
            "file" => {
                let path = url.to_file_path().map_err(|_| {
                    ConvertError::unresolvable(url.as_str(), "not a local file path")
                })?;
                tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|e| ConvertError::unresolvable(url.as_str(), e))
            }
            "http" | "https" => {
                let response = self
                    .client
                    .get(url.clone())
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .map_err(|e| ConvertError::unresolvable(url.as_str(), e))?;
                response
                    .text()
                    .await
                    .map_err(|e| ConvertError::unresolvable(url.as_str(), e))
            }
            other => Err(ConvertError::unresolvable(
                url.as_str(),
                format!("unsupported URL scheme '{}'", other),
            )),
        }
    }

    /// Fetch and classify one document
    async fn load(&self, url: &Url) -> Result<Document, ConvertError> {
        let text = self.fetch(url).await?;
        let document = parse_document(url, &text)?;
        debug!(url = %url, "Loaded STAC document");
        Ok(document)
    }
}

#[async_trait]
impl CatalogReader for StacReader {
    fn name(&self) -> &str {
        "stac"
    }

    #[instrument(skip(self))]
    async fn read(&self, location: &str) -> Result<CatalogNode, ConvertError> {
        let root_url = parse_location(location)?;

        let mut documents: HashMap<Url, Document> = HashMap::new();
        let mut pending = vec![root_url.clone()];

        while let Some(url) = pending.pop() {
            if documents.contains_key(&url) {
                continue;
            }
            let document = self.load(&url).await?;
            if let Document::Catalog { links, .. } = &document {
                // Reversed so the first link is loaded first
                pending.extend(links.iter().rev().cloned());
            }
            documents.insert(url, document);
        }

        let loaded = documents.len();
        let mut placed = HashSet::new();
        match assemble(&root_url, &mut documents, &mut placed) {
            Some(Node::Catalog(root)) => {
                info!(root = %root.id, documents = loaded, "Read STAC catalog");
                Ok(root)
            }
            Some(Node::Item(item)) => Err(ConvertError::unresolvable(
                root_url.as_str(),
                format!("root document '{}' is an item, not a catalog", item.id),
            )),
            None => Err(ConvertError::unresolvable(
                root_url.as_str(),
                "root document was not loaded",
            )),
        }
    }
}

/// Turn a CLI location into a URL; anything that is not a URL is a local path
pub fn parse_location(location: &str) -> Result<Url, ConvertError> {
    // Single-letter schemes are Windows drive letters, not URLs
    if let Ok(url) = Url::parse(location) {
        if url.scheme().len() > 1 {
            return Ok(url);
        }
    }

    let path = Path::new(location);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| ConvertError::unresolvable(location, e))?
            .join(path)
    };

    Url::from_file_path(&absolute)
        .map_err(|_| ConvertError::unresolvable(location, "not a valid file path"))
}

/// Parse a document and resolve its child and item links against `url`
fn parse_document(url: &Url, text: &str) -> Result<Document, ConvertError> {
    let header: StacHeader = serde_json::from_str(text).map_err(|e| {
        ConvertError::unresolvable(url.as_str(), format!("invalid STAC JSON: {}", e))
    })?;

    let is_item = match header.doc_type.as_deref() {
        Some("Feature") => true,
        Some(_) => false,
        // Pre-1.0 catalogs and collections carry no type; items always have assets
        None => header.assets.is_some(),
    };

    if is_item {
        let item: Item = serde_json::from_str(text).map_err(|e| {
            ConvertError::unresolvable(url.as_str(), format!("invalid STAC item: {}", e))
        })?;
        return Ok(Document::Item(item));
    }

    let kind = match header.doc_type.as_deref() {
        Some("Collection") => CatalogKind::Collection,
        Some(_) => CatalogKind::Catalog,
        None if header.extent.is_some() => CatalogKind::Collection,
        None => CatalogKind::Catalog,
    };

    let links = header
        .links
        .iter()
        .filter(|link| link.rel == "child" || link.rel == "item")
        .map(|link| {
            url.join(&link.href).map_err(|e| {
                ConvertError::unresolvable(
                    url.as_str(),
                    format!("bad {} link '{}': {}", link.rel, link.href, e),
                )
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let node = CatalogNode {
        id: header.id,
        kind,
        title: header.title,
        description: header.description,
        children: Vec::new(),
    };

    Ok(Document::Catalog { node, links })
}

/// Build the subtree at `url`, moving documents out of the map.
///
/// Returns `None` for a document already placed elsewhere in the tree.
fn assemble(
    url: &Url,
    documents: &mut HashMap<Url, Document>,
    placed: &mut HashSet<Url>,
) -> Option<Node> {
    if !placed.insert(url.clone()) {
        debug!(url = %url, "Skipping already placed document");
        return None;
    }

    match documents.remove(url)? {
        Document::Item(item) => Some(Node::Item(item)),
        Document::Catalog { mut node, links } => {
            for link in &links {
                if let Some(child) = assemble(link, documents, placed) {
                    node.children.push(child);
                }
            }
            Some(Node::Catalog(node))
        }
    }
}
