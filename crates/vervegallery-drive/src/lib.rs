//! VerveGallery Drive - Google Drive v3 client
//!
//! Provides the async adapter behind the `IDriveGateway` port:
//! - Image listing and single-file metadata via `files.list` / `files.get`
//! - Folder lookup by name with a first-image lookup per folder
//! - Multipart upload with progress reporting
//! - OAuth2 sign-in (Authorization Code with PKCE) against Google
//!
//! ## Modules
//!
//! - [`auth`] - OAuth2 PKCE flow, keyring token storage, identity provider
//! - [`client`] - Authenticated Drive REST client
//! - [`files`] - Drive file DTOs and image listing
//! - [`folders`] - Category folder lookup
//! - [`provider`] - `IDriveGateway` implementation
//! - [`query`] - `files.list` query construction and escaping
//! - [`upload`] - Multipart upload with progress

pub mod auth;
pub mod client;
pub mod files;
pub mod folders;
pub mod provider;
pub mod query;
pub mod upload;

use thiserror::Error;
use vervegallery_core::domain::GatewayError;

/// Errors that can occur when talking to the Google Drive API
#[derive(Debug, Error)]
pub enum DriveError {
    /// No access token is available
    #[error("Not signed in")]
    Unauthenticated,

    /// Drive answered with a non-success status
    #[error("Drive returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, as text
        body: String,
    },

    /// A network-level error occurred
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The API response could not be parsed or was malformed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl DriveError {
    /// HTTP status carried by the error, if a response was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            Self::Unauthenticated | Self::InvalidResponse(_) => None,
        }
    }

    /// Maps a failed read into the port error taxonomy
    pub fn into_fetch(self) -> GatewayError {
        match self {
            Self::Unauthenticated => GatewayError::Auth(self.to_string()),
            other => GatewayError::fetch(other.status(), other.to_string()),
        }
    }

    /// Like [`DriveError::into_fetch`], but a 404 becomes `NotFound(id)`
    pub fn into_lookup(self, id: &str) -> GatewayError {
        match self.status() {
            Some(404) => GatewayError::NotFound(id.to_string()),
            _ => self.into_fetch(),
        }
    }

    /// Maps a failed upload, carrying the last reported progress
    pub fn into_upload(self, progress: u8) -> GatewayError {
        match self {
            Self::Unauthenticated => GatewayError::Auth(self.to_string()),
            other => GatewayError::Upload {
                status: other.status(),
                progress,
                message: other.to_string(),
            },
        }
    }
}
