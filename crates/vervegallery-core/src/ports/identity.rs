//! Identity ports
//!
//! [`IIdentityProvider`] wraps the external identity library (Google OAuth2
//! in production). [`IAccessTokenSource`] is the narrow view the Drive
//! gateway needs: "give me the current bearer token, if any".
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because sign-in failures are adapter-specific
//!   (browser launch, callback server, token exchange) and only surface as
//!   a message.
//! - There is no refresh method: an expired token is reported downstream
//!   as a gateway error and the user signs in again.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::UserProfile;

/// OAuth tokens received from the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tokens {
    /// Bearer token for authenticating API requests
    pub access_token: String,
    /// Refresh token, kept for the provider's own bookkeeping
    pub refresh_token: Option<String>,
    /// When the access token expires
    pub expires_at: DateTime<Utc>,
}

impl Tokens {
    /// Returns true if the access token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Result of a successful interactive sign-in
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub profile: UserProfile,
    pub tokens: Tokens,
}

/// Port trait for the external identity library
#[async_trait::async_trait]
pub trait IIdentityProvider: Send + Sync {
    /// Attempts silent restoration of a prior session for `profile`
    ///
    /// # Returns
    /// `Some(tokens)` when a cached, unexpired token exists for the user
    async fn restore(&self, profile: &UserProfile) -> anyhow::Result<Option<Tokens>>;

    /// Runs the interactive sign-in flow
    async fn sign_in(&self) -> anyhow::Result<SignedIn>;

    /// Revokes or forgets the cached credentials for `profile`
    async fn sign_out(&self, profile: &UserProfile) -> anyhow::Result<()>;
}

/// Supplies the bearer token attached to Drive requests
#[async_trait::async_trait]
pub trait IAccessTokenSource: Send + Sync {
    /// The current access token, or `None` when signed out
    async fn access_token(&self) -> Option<String>;
}
