//! Error types for the content pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building or querying a post collection.
///
/// Parse and validation errors abort a collection build; `NotFound` is
/// local to a single lookup and should be mapped to a 404 by the caller.
#[derive(Debug, Error)]
pub enum PostError {
    #[error("IO error when reading `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed front-matter in `{document}`: {message}")]
    Parse { document: String, message: String },

    #[error("invalid post `{document}`: {message}")]
    Validation { document: String, message: String },

    #[error("no post with slug `{0}`")]
    NotFound(String),
}

impl PostError {
    pub(crate) fn parse(document: &str, message: impl Into<String>) -> Self {
        Self::Parse {
            document: document.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn validation(document: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            document: document.to_string(),
            message: message.into(),
        }
    }

    /// Whether this is a slug lookup miss
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

pub type Result<T, E = PostError> = std::result::Result<T, E>;
