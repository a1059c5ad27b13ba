//! Store error types.

use std::path::{Path, PathBuf};

use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from the provider store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed.
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The provider document could not be parsed or serialized.
    #[error("invalid provider document: {0}")]
    Serde(#[from] serde_json::Error),

    /// A named provider does not exist in the store.
    #[error("provider '{0}' not found")]
    NotFound(String),
}

impl StoreError {
    pub(crate) fn file_io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
