//! Shared fixtures for store integration tests

use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use serde_json::{json, Value};
use wiremock::MockServer;

use vervegallery_core::domain::UserProfile;
use vervegallery_core::ports::{IIdentityProvider, SignedIn, Tokens};
use vervegallery_drive::client::DriveClient;
use vervegallery_drive::provider::GoogleDriveGateway;
use vervegallery_store::{
    AuthStore, MemorySessionStorage, PhotoStore, PhotoStoreSettings, SampledFaceMatcher,
};

pub const ACCESS_TOKEN: &str = "store-test-token";

pub const IMAGES_QUERY: &str = "mimeType contains 'image/' and trashed = false";

pub fn profile() -> UserProfile {
    UserProfile::new("7", "Ravi", "ravi@example.com", "")
}

/// Identity double that always signs in as [`profile`]
#[derive(Default)]
pub struct ScriptedIdentity {
    pub cached: Mutex<Option<Tokens>>,
}

impl ScriptedIdentity {
    pub fn with_cached_token() -> Self {
        Self {
            cached: Mutex::new(Some(tokens())),
        }
    }
}

pub fn tokens() -> Tokens {
    Tokens {
        access_token: ACCESS_TOKEN.into(),
        refresh_token: Some("refresh".into()),
        expires_at: Utc::now() + Duration::hours(1),
    }
}

#[async_trait::async_trait]
impl IIdentityProvider for ScriptedIdentity {
    async fn restore(&self, _profile: &UserProfile) -> anyhow::Result<Option<Tokens>> {
        Ok(self.cached.lock().unwrap().clone())
    }

    async fn sign_in(&self) -> anyhow::Result<SignedIn> {
        *self.cached.lock().unwrap() = Some(tokens());
        Ok(SignedIn {
            profile: profile(),
            tokens: tokens(),
        })
    }

    async fn sign_out(&self, _profile: &UserProfile) -> anyhow::Result<()> {
        *self.cached.lock().unwrap() = None;
        Ok(())
    }
}

pub struct Harness {
    pub server: MockServer,
    pub auth: Arc<AuthStore>,
    pub photos: PhotoStore,
}

/// Starts a mock Drive and wires both stores to it
///
/// The photo store's gateway takes its bearer token from the auth store.
pub async fn harness(signed_in: bool) -> Harness {
    let server = MockServer::start().await;
    let auth = Arc::new(AuthStore::new(
        Arc::new(ScriptedIdentity::default()),
        Arc::new(MemorySessionStorage::new()),
    ));
    if signed_in {
        auth.sign_in().await.unwrap();
    }

    let client = DriveClient::with_base_url(auth.clone(), server.uri());
    let photos = PhotoStore::new(
        Arc::new(GoogleDriveGateway::new(client)),
        Arc::new(SampledFaceMatcher::default()),
        PhotoStoreSettings::default(),
    );

    Harness {
        server,
        auth,
        photos,
    }
}

pub fn image_json(id: &str) -> Value {
    json!({
        "id": id,
        "name": format!("{id}.jpg"),
        "mimeType": "image/jpeg",
        "thumbnailLink": format!("https://lh3.googleusercontent.com/{id}"),
        "createdTime": "2024-11-01T10:00:00Z",
        "size": "1024"
    })
}

pub fn folder_query(pattern: &str) -> String {
    format!(
        "mimeType = 'application/vnd.google-apps.folder' and name contains '{pattern}' and trashed = false"
    )
}

pub fn folder_images_query(folder_id: &str) -> String {
    format!("{IMAGES_QUERY} and '{folder_id}' in parents")
}

pub fn first_image_query(folder_id: &str) -> String {
    format!("'{folder_id}' in parents and {IMAGES_QUERY}")
}
