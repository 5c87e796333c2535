//! Domain error types
//!
//! This module defines validation errors for domain values and the error
//! taxonomy shared by every Drive gateway implementation.

use thiserror::Error;

/// Errors that can occur when constructing domain values
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid Drive file identifier
    #[error("Invalid file ID: {0}")]
    InvalidFileId(String),

    /// Invalid Drive folder identifier
    #[error("Invalid folder ID: {0}")]
    InvalidFolderId(String),

    /// ID parsing error
    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    /// Invalid face descriptor
    #[error("Invalid face descriptor: {0}")]
    InvalidDescriptor(String),
}

/// Errors surfaced by a Drive gateway
///
/// Every adapter maps its transport errors into one of these four kinds so
/// the stores can record a message without knowing the HTTP details.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// A read failed: non-2xx status or a network-level failure
    #[error("Fetch failed: {message}")]
    Fetch {
        /// HTTP status, when a response was received
        status: Option<u16>,
        /// Description of the failure
        message: String,
    },

    /// An upload failed
    #[error("Upload failed at {progress}%: {message}")]
    Upload {
        /// HTTP status, when a response was received
        status: Option<u16>,
        /// Last progress percentage reported before the failure
        progress: u8,
        /// Description of the failure
        message: String,
    },

    /// A single-item lookup missed
    #[error("Not found: {0}")]
    NotFound(String),

    /// No session, or the session was rejected
    #[error("Authentication required: {0}")]
    Auth(String),
}

impl GatewayError {
    /// Convenience constructor for a fetch failure
    pub fn fetch(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Fetch {
            status,
            message: message.into(),
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Fetch { status, .. } | Self::Upload { status, .. } => *status,
            Self::NotFound(_) => Some(404),
            Self::Auth(_) => None,
        }
    }
}
