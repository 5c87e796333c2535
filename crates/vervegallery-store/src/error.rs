//! Store error types

use thiserror::Error;
use vervegallery_core::domain::{DomainError, GatewayError};

/// Errors returned by store actions
///
/// [`StoreError::user_message`] is the short text recorded on the request
/// tracker; `Display` adds the underlying cause.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A gateway call failed while running `action`
    #[error("{action}: {source}")]
    Gateway {
        /// User-facing description of the failed action
        action: &'static str,
        #[source]
        source: GatewayError,
    },

    /// The requested category is not in the loaded category list
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// A category ID could not be used as a folder ID
    #[error("Invalid category: {0}")]
    InvalidCategory(#[from] DomainError),

    /// The face matcher failed
    #[error("Failed to search by face: {0}")]
    FaceSearch(String),

    /// The identity provider failed while running `action`
    #[error("{action}: {message}")]
    Identity {
        action: &'static str,
        message: String,
    },

    /// Reading or writing the persisted session failed
    #[error("Session storage error: {0}")]
    Session(String),
}

impl StoreError {
    /// Wraps a gateway error with the action it interrupted
    pub fn gateway(action: &'static str, source: GatewayError) -> Self {
        Self::Gateway { action, source }
    }

    /// The message recorded on the request tracker
    pub fn user_message(&self) -> String {
        match self {
            Self::Gateway { action, .. } | Self::Identity { action, .. } => action.to_string(),
            Self::CategoryNotFound(_) | Self::InvalidCategory(_) => "Category not found".into(),
            Self::FaceSearch(_) => "Failed to search by face".into(),
            Self::Session(_) => "Failed to initialize authentication".into(),
        }
    }

    /// The gateway error behind this failure, if any
    pub fn gateway_error(&self) -> Option<&GatewayError> {
        match self {
            Self::Gateway { source, .. } => Some(source),
            _ => None,
        }
    }
}
