//! Content store errors

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while enumerating or reading content
#[derive(Debug, Error)]
pub enum ContentError {
    /// A content file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The content directory could not be walked
    #[error("failed to walk content directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Result type for content operations
pub type Result<T> = std::result::Result<T, ContentError>;
