//! AuthStore - the signed-in session
//!
//! Owns `is_authenticated`, `user` and `access_token`, and is the token
//! source the Drive gateway consults for its bearer header. The three fields
//! are always written together under one lock, so readers never observe a
//! half-updated session.
//!
//! The persisted record is the user profile only, stored as JSON under
//! [`SESSION_KEY`]. Tokens stay with the identity provider.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use vervegallery_core::{
    domain::UserProfile,
    ports::{IAccessTokenSource, IIdentityProvider, ISessionStorage},
};

use crate::{tracker::RequestTracker, StoreError};

/// Session storage key of the persisted profile record
pub const SESSION_KEY: &str = "verveGalleryUser";

pub const INIT_AUTH_FAILED: &str = "Failed to initialize authentication";
pub const SIGN_IN_FAILED: &str = "Failed to sign in";
pub const SIGN_OUT_FAILED: &str = "Failed to sign out";

/// Snapshot of the session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    pub is_authenticated: bool,
    pub user: Option<UserProfile>,
    #[serde(skip)]
    pub access_token: Option<String>,
}

impl Session {
    fn signed_in(user: UserProfile, access_token: String) -> Self {
        Self {
            is_authenticated: true,
            user: Some(user),
            access_token: Some(access_token),
        }
    }
}

/// State container for authentication
pub struct AuthStore {
    identity: Arc<dyn IIdentityProvider>,
    storage: Arc<dyn ISessionStorage>,
    session: RwLock<Session>,
    tracker: RequestTracker,
}

impl AuthStore {
    pub fn new(identity: Arc<dyn IIdentityProvider>, storage: Arc<dyn ISessionStorage>) -> Self {
        Self {
            identity,
            storage,
            session: RwLock::new(Session::default()),
            tracker: RequestTracker::new(),
        }
    }

    pub async fn session(&self) -> Session {
        self.session.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.is_authenticated
    }

    pub async fn user(&self) -> Option<UserProfile> {
        self.session.read().await.user.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.tracker.is_loading()
    }

    pub fn last_error(&self) -> Option<String> {
        self.tracker.last_error()
    }

    pub fn tracker(&self) -> &RequestTracker {
        &self.tracker
    }

    /// Restores a prior session without user interaction
    ///
    /// A missing record leaves the store signed out. A record that is not a
    /// valid profile is removed and the store stays signed out without an
    /// error. A valid profile is authenticated only when the identity
    /// provider still holds an unexpired token for it.
    pub async fn init_auth(&self) -> Result<bool, StoreError> {
        self.tracker
            .track("init_auth", async {
                let record = self
                    .storage
                    .get(SESSION_KEY)
                    .await
                    .map_err(|e| StoreError::Session(format!("{e:#}")))?;

                let Some(record) = record else {
                    debug!("No stored session");
                    return Ok(false);
                };

                let profile = match serde_json::from_str::<UserProfile>(&record) {
                    Ok(profile) => profile,
                    Err(e) => {
                        warn!(error = %e, "Stored session is corrupt; removing it");
                        self.storage
                            .remove(SESSION_KEY)
                            .await
                            .map_err(|e| StoreError::Session(format!("{e:#}")))?;
                        *self.session.write().await = Session::default();
                        return Ok(false);
                    }
                };

                let tokens = self
                    .identity
                    .restore(&profile)
                    .await
                    .map_err(|e| identity_error(INIT_AUTH_FAILED, e))?;

                match tokens {
                    Some(tokens) => {
                        info!(email = %profile.email, "Session restored");
                        *self.session.write().await =
                            Session::signed_in(profile, tokens.access_token);
                        Ok(true)
                    }
                    None => {
                        debug!(email = %profile.email, "No cached token for stored profile");
                        Ok(false)
                    }
                }
            })
            .await
    }

    /// Runs the interactive sign-in flow and persists the profile
    pub async fn sign_in(&self) -> Result<UserProfile, StoreError> {
        self.tracker
            .track("sign_in", async {
                let signed_in = self
                    .identity
                    .sign_in()
                    .await
                    .map_err(|e| identity_error(SIGN_IN_FAILED, e))?;

                let record = serde_json::to_string(&signed_in.profile)
                    .map_err(|e| StoreError::Session(e.to_string()))?;
                self.storage
                    .set(SESSION_KEY, &record)
                    .await
                    .map_err(|e| identity_error(SIGN_IN_FAILED, e))?;

                let profile = signed_in.profile;
                *self.session.write().await =
                    Session::signed_in(profile.clone(), signed_in.tokens.access_token);
                info!(email = %profile.email, "Signed in");
                Ok(profile)
            })
            .await
    }

    /// Signs out and forgets the persisted profile
    ///
    /// When the identity provider fails, the session is left as it was.
    pub async fn sign_out(&self) -> Result<(), StoreError> {
        self.tracker
            .track("sign_out", async {
                if let Some(user) = self.user().await {
                    self.identity
                        .sign_out(&user)
                        .await
                        .map_err(|e| identity_error(SIGN_OUT_FAILED, e))?;
                }

                *self.session.write().await = Session::default();
                self.storage
                    .remove(SESSION_KEY)
                    .await
                    .map_err(|e| identity_error(SIGN_OUT_FAILED, e))?;
                info!("Signed out");
                Ok(())
            })
            .await
    }
}

fn identity_error(action: &'static str, err: anyhow::Error) -> StoreError {
    StoreError::Identity {
        action,
        message: format!("{err:#}"),
    }
}

#[async_trait::async_trait]
impl IAccessTokenSource for AuthStore {
    async fn access_token(&self) -> Option<String> {
        self.session.read().await.access_token.clone()
    }
}
