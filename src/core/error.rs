//! Failures surfaced by reading, converting, and writing catalogs.
//!
//! None of these are retried.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Asset '{asset_key}' of item '{item_id}' is missing required field '{field}'")]
    MissingField {
        item_id: String,
        asset_key: String,
        field: &'static str,
    },

    #[error("No driver for media type '{media_type}' (asset '{asset_key}' of item '{item_id}')")]
    UnmappedDriver {
        item_id: String,
        asset_key: String,
        media_type: String,
    },

    #[error("Cannot resolve catalog at {href}: {reason}")]
    UnresolvableRemoteCatalog { href: String, reason: String },

    #[error("Failed to write catalog to {}: {source}", .path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: WriteError,
    },
}

/// Why a catalog could not be written
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("encoding failed: {0}")]
    Encode(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    pub(crate) fn unresolvable(href: impl Into<String>, reason: impl ToString) -> Self {
        Self::UnresolvableRemoteCatalog {
            href: href.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn write_failure(path: impl Into<PathBuf>, source: impl Into<WriteError>) -> Self {
        Self::WriteFailure {
            path: path.into(),
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_encode_failure_keeps_yaml_source() {
        let yaml_err = serde_yaml::from_str::<u32>("not a number").unwrap_err();
        let err = ConvertError::write_failure("out/catalog.yml", yaml_err);

        match &err {
            ConvertError::WriteFailure {
                source: WriteError::Encode(_),
                ..
            } => {}
            other => panic!("Expected an encoding failure, got {:?}", other),
        }
        assert!(err.to_string().starts_with("Failed to write catalog to out/catalog.yml"));

        let source = err.source().unwrap();
        assert!(source.downcast_ref::<WriteError>().is_some());
        assert!(source.source().unwrap().is::<serde_yaml::Error>());
    }

    #[test]
    fn test_io_failure_is_transparent() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ConvertError::write_failure("catalog.yml", io_err);

        assert!(matches!(
            err,
            ConvertError::WriteFailure {
                source: WriteError::Io(_),
                ..
            }
        ));
        assert_eq!(err.to_string(), "Failed to write catalog to catalog.yml: denied");
    }
}
