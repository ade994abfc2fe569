//! YAML writer for Intake catalogs.

use std::path::Path;

use async_trait::async_trait;
use tokio::fs;
use tracing::info;

use super::CatalogWriter;
use crate::core::ConvertError;
use crate::domain::IntakeCatalog;

/// Writes the catalog as a YAML file, creating parent directories as needed
#[derive(Debug, Default, Clone)]
pub struct YamlWriter;

impl YamlWriter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CatalogWriter for YamlWriter {
    fn name(&self) -> &str {
        "yaml"
    }

    async fn write(&self, catalog: &IntakeCatalog, path: &Path) -> Result<(), ConvertError> {
        let content = catalog
            .to_yaml()
            .map_err(|e| ConvertError::write_failure(path, e))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ConvertError::write_failure(path, e))?;
        }

        fs::write(path, content)
            .await
            .map_err(|e| ConvertError::write_failure(path, e))?;

        info!(path = %path.display(), sources = catalog.len(), "Wrote Intake catalog");
        Ok(())
    }
}
