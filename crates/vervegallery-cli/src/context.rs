//! Wiring from configuration to stores
//!
//! Every command that talks to Drive builds an [`AppContext`]: the auth
//! store (file-backed session, Google identity), a Drive gateway that takes
//! its bearer token from the auth store, and the photo store on top.

use std::{path::Path, sync::Arc};

use anyhow::{bail, Context, Result};
use tracing::{debug, warn};
use vervegallery_core::{config::Config, domain::Category};
use vervegallery_drive::{
    auth::{GoogleIdentityProvider, GoogleOAuthConfig},
    provider::GoogleDriveGateway,
};
use vervegallery_store::{
    AuthStore, FileSessionStorage, PhotoStore, PhotoStoreSettings, SampledFaceMatcher,
};

pub struct AppContext {
    pub config: Config,
    pub auth: Arc<AuthStore>,
    pub gateway: Arc<GoogleDriveGateway>,
    pub photos: PhotoStore,
}

impl AppContext {
    /// Loads and validates the configuration, then builds the stores
    pub fn build(config_path: &Path) -> Result<Self> {
        let config = Config::load_or_default(config_path);
        let errors = config.validate();
        if !errors.is_empty() {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            bail!(
                "Invalid configuration ({}): {}",
                config_path.display(),
                messages.join("; ")
            );
        }
        Self::from_config(config)
    }

    pub fn from_config(config: Config) -> Result<Self> {
        let oauth = GoogleOAuthConfig::from_config(&config.auth)
            .context("Google sign-in is not configured")?;
        let identity = Arc::new(GoogleIdentityProvider::new(oauth));
        let storage = Arc::new(FileSessionStorage::new(&config.session.storage_path));
        let auth = Arc::new(AuthStore::new(identity, storage));

        let gateway = Arc::new(
            GoogleDriveGateway::from_config(&config.drive, auth.clone())
                .context("Failed to create Drive client")?,
        );
        let photos = PhotoStore::new(
            gateway.clone(),
            Arc::new(SampledFaceMatcher::from_config(&config.face_search)),
            PhotoStoreSettings::from_config(&config),
        );

        debug!(
            session = %config.session.storage_path.display(),
            api = %config.drive.api_base_url,
            "Context ready"
        );

        Ok(Self {
            config,
            auth,
            gateway,
            photos,
        })
    }

    /// Restores the stored session and fails when there is none
    pub async fn require_session(&self) -> Result<()> {
        let restored = self
            .auth
            .init_auth()
            .await
            .context("Failed to restore session")?;
        if !restored {
            bail!("Not signed in. Run 'verve auth login' first.");
        }
        Ok(())
    }

    /// Loads the categories and finds one by ID or case-insensitive name
    pub async fn resolve_category(&self, key: &str) -> Result<Category> {
        let categories = self
            .photos
            .fetch_categories()
            .await
            .context("Failed to fetch categories")?;
        find_category(&categories, key).with_context(|| {
            let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
            format!(
                "Unknown category '{}'. Available: {}",
                key,
                names.join(", ")
            )
        })
    }
}

/// Matches `key` against category IDs first, then names
pub fn find_category(categories: &[Category], key: &str) -> Option<Category> {
    if let Some(category) = categories.iter().find(|c| c.id == key) {
        return Some(category.clone());
    }
    let mut by_name = categories.iter().filter(|c| c.name.eq_ignore_ascii_case(key));
    let found = by_name.next().cloned();
    if by_name.next().is_some() {
        warn!(key, "Several categories share this name; using the first");
    }
    found
}
