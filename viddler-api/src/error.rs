//! Error types for the Viddler API client

use crate::response::Document;
use thiserror::Error;

/// Errors that can occur when using the Viddler API client
#[derive(Error, Debug)]
pub enum ViddlerError {
    /// HTTP request failed (connection refused, DNS failure, unreadable body)
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body is not valid JSON, or does not fit the requested type
    #[error("Failed to decode response: {source}")]
    Decode {
        /// The underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// The API answered with an `error` object
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Client initialization failed
    #[error("Client initialization failed: {0}")]
    ClientInit(String),
}

impl ViddlerError {
    /// The API error payload, if this is an API-level failure
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            ViddlerError::Api(error) => Some(error),
            _ => None,
        }
    }

    /// The decoded response document, if the server's answer was valid JSON
    pub fn document(&self) -> Option<&Document> {
        self.api_error().map(|error| &error.document)
    }
}

/// An error reported by the API in a response body of the form
/// `{"error": {"code": ..., "description": ..., "details": ...}}`.
///
/// Displays as `description` alone.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{description}")]
pub struct ApiError {
    /// API error code (numeric codes are rendered as text)
    pub code: String,
    /// Human-readable description
    pub description: String,
    /// Extra detail, usually the offending parameter
    pub details: String,
    /// The full response document
    pub document: Document,
}
