//! # Content Error Types
//!
//! Error types for content source operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  reqwest::Error / HTTP status / serde_json::Error                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ContentError (this module) ← Adds context and categorization          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in web app) ← CONTENT_ERROR (502) / NOT_FOUND (404)         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Browser sees an error page or { code, message }                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Content source errors.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The client configuration is unusable.
    ///
    /// ## When This Occurs
    /// - Empty or malformed project id
    /// - API version that is not a `YYYY-MM-DD` date
    /// - Unparseable base URL override
    #[error("Invalid content configuration: {0}")]
    InvalidConfig(String),

    /// The request never produced a response.
    ///
    /// ## When This Occurs
    /// - DNS / connect / TLS failure
    /// - Request timeout
    #[error("Content request failed: {0}")]
    Transport(String),

    /// The content API answered with a non-2xx status.
    #[error("Content API returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not the expected JSON shape.
    #[error("Failed to decode content response: {0}")]
    Decode(String),

    /// A document is missing a required field or has an unusable value.
    #[error("Invalid {kind} document {id}: {reason}")]
    InvalidDocument {
        kind: String,
        id: String,
        reason: String,
    },

    /// An image reference does not follow `image-<id>-<W>x<H>-<format>`.
    #[error("Invalid image reference: {0}")]
    InvalidImageRef(String),

    /// A requested document does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The offline fixture file could not be read or parsed.
    #[error("Failed to load fixture {path}: {reason}")]
    Fixture { path: String, reason: String },
}

impl ContentError {
    /// Creates a NotFound error for a given entity type and key.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        ContentError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates an InvalidDocument error.
    pub fn invalid_document(
        kind: impl Into<String>,
        id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ContentError::InvalidDocument {
            kind: kind.into(),
            id: id.into(),
            reason: reason.into(),
        }
    }
}

/// Convert reqwest errors to ContentError.
///
/// Only transport failures reach here; statuses and bodies are checked by
/// the client before any decoding.
impl From<reqwest::Error> for ContentError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ContentError::Transport(format!("timed out: {}", err))
        } else {
            ContentError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ContentError {
    fn from(err: serde_json::Error) -> Self {
        ContentError::Decode(err.to_string())
    }
}

/// Result type for content operations.
pub type ContentResult<T> = Result<T, ContentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            ContentError::not_found("Product", "speaker").to_string(),
            "Product not found: speaker"
        );
        assert_eq!(
            ContentError::Status {
                status: 503,
                body: "down".into()
            }
            .to_string(),
            "Content API returned 503: down"
        );
    }

    #[test]
    fn test_decode_from_serde() {
        let err: ContentError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, ContentError::Decode(_)));
    }
}
