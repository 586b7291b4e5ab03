//! Error type shared by the stores, the router and the article builder.

use thiserror::Error;

/// Everything that can go wrong in the blog core.
///
/// Payloads are plain strings so the error can be cloned into UI state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlogError {
    /// The article collection could not be fetched or parsed.
    #[error("article data unavailable: {0}")]
    DataUnavailable(String),

    /// No article carries the requested slug.
    #[error("no article with slug `{0}`")]
    NotFound(String),

    /// A comment was submitted without a name or text.
    #[error("invalid comment: {0}")]
    Validation(String),

    /// A persisted comment list is not valid JSON.
    #[error("stored comments under `{key}` are corrupt: {reason}")]
    StorageCorrupt { key: String, reason: String },

    /// A remote article body could not be loaded.
    #[error("failed to load article content: {0}")]
    ContentFetch(String),

    /// The key-value storage rejected a write or is missing.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A Markdown source has a broken front matter block.
    #[error("invalid front matter in {path}: {reason}")]
    Frontmatter { path: String, reason: String },

    #[error("I/O error: {0}")]
    Io(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<std::io::Error> for BlogError {
    fn from(e: std::io::Error) -> Self {
        BlogError::Io(e.to_string())
    }
}

impl From<figment::Error> for BlogError {
    fn from(e: figment::Error) -> Self {
        BlogError::Config(e.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BlogError>;
