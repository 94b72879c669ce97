//! Error types for ntnmark library.

use crate::model::Page;
use thiserror::Error;

/// Result type alias for ntnmark operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while converting pages.
#[derive(Error, Debug)]
pub enum Error {
    /// A snapshot node declares a known kind but lacks the shape that kind requires.
    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(String),

    /// The front matter block is present but could not be decoded.
    ///
    /// The body of the document is still parsed; it is carried in `recovered`
    /// with an empty property map.
    #[error("Unparsable front matter: {message}")]
    UnparsableFrontMatter {
        /// What went wrong
        message: String,
        /// The page parsed from the rest of the document
        recovered: Box<Page>,
    },

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error during rendering.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Shorthand for a [`Error::MalformedSnapshot`] with a formatted message.
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedSnapshot(message.into())
    }

    /// The page recovered from a localized front matter failure, if any.
    pub fn recovered_page(&self) -> Option<&Page> {
        match self {
            Error::UnparsableFrontMatter { recovered, .. } => Some(recovered),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::MalformedSnapshot("table without rows".to_string());
        assert_eq!(err.to_string(), "Malformed snapshot: table without rows");

        let err = Error::UnparsableFrontMatter {
            message: "expected a mapping".to_string(),
            recovered: Box::default(),
        };
        assert_eq!(err.to_string(), "Unparsable front matter: expected a mapping");
        assert!(err.recovered_page().is_some());
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
        assert!(err.recovered_page().is_none());
    }
}
