//! Google Drive v3 REST client
//!
//! Provides a typed HTTP client for the Drive API. Every request is
//! authorized with the bearer token supplied by an [`IAccessTokenSource`],
//! read at send time so a sign-in or sign-out is picked up immediately.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vervegallery_drive::client::{DriveClient, StaticTokenSource};
//! use vervegallery_drive::query::FileListQuery;
//!
//! # async fn example() -> Result<(), vervegallery_drive::DriveError> {
//! let client = DriveClient::new(Arc::new(StaticTokenSource::new("ya29.token")));
//! let files = client.list_files(&FileListQuery::images(None, 20)).await?;
//! println!("{} images", files.len());
//! # Ok(())
//! # }
//! ```

use std::{sync::Arc, time::Duration};

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use tracing::{debug, warn};
use vervegallery_core::{config::DriveConfig, ports::IAccessTokenSource};

use crate::{files::DriveFile, query::FileListQuery, DriveError};

/// Default scheme and host of the Drive API
pub const DRIVE_BASE_URL: &str = "https://www.googleapis.com";

/// Path of the `files` collection
pub(crate) const FILES_PATH: &str = "/drive/v3/files";

/// Response body of `files.list`
#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

// ============================================================================
// DriveClient
// ============================================================================

/// HTTP client for Google Drive API calls
///
/// Wraps `reqwest::Client` with bearer authentication and base URL
/// construction. Cheap to share behind an `Arc`.
pub struct DriveClient {
    /// The underlying HTTP client
    client: Client,
    /// Scheme and host, without trailing slash
    base_url: String,
    /// Where the bearer token comes from
    tokens: Arc<dyn IAccessTokenSource>,
    /// Total time allowed for a metadata call; uploads are not bounded
    read_timeout: Option<Duration>,
}

impl DriveClient {
    /// Creates a client against the public Drive API
    pub fn new(tokens: Arc<dyn IAccessTokenSource>) -> Self {
        Self::with_base_url(tokens, DRIVE_BASE_URL)
    }

    /// Creates a client with a custom base URL (useful for testing)
    pub fn with_base_url(tokens: Arc<dyn IAccessTokenSource>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
            read_timeout: None,
        }
    }

    /// Bounds every `files.list` and `files.get` call to `timeout`
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Creates a client from the `drive` configuration section
    ///
    /// `request_timeout_secs` bounds connection setup for every request and
    /// the whole of each metadata call. Uploads only get the connect bound,
    /// since a large file on a slow link can legitimately take longer.
    pub fn from_config(
        config: &DriveConfig,
        tokens: Arc<dyn IAccessTokenSource>,
    ) -> Result<Self, DriveError> {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        let client = Client::builder().connect_timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            tokens,
            read_timeout: Some(timeout),
        })
    }

    /// Returns the base URL for API requests
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Creates an authenticated request builder for the given method and path
    ///
    /// # Errors
    /// [`DriveError::Unauthenticated`] when the token source has no token
    pub async fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, DriveError> {
        let token = self
            .tokens
            .access_token()
            .await
            .ok_or(DriveError::Unauthenticated)?;
        let url = format!("{}{}", self.base_url, path);
        Ok(self.client.request(method, &url).bearer_auth(token))
    }

    /// Like [`Self::request`], with the read timeout applied
    async fn read_request(&self, path: &str) -> Result<RequestBuilder, DriveError> {
        let builder = self.request(Method::GET, path).await?;
        Ok(match self.read_timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        })
    }

    /// Runs a `files.list` call and returns the first page of files
    pub async fn list_files(&self, query: &FileListQuery) -> Result<Vec<DriveFile>, DriveError> {
        debug!(q = query.q(), page_size = query.page_size(), "Listing Drive files");

        let response = self
            .read_request(FILES_PATH)
            .await?
            .query(&query.to_params())
            .send()
            .await?;

        let list: FileList = check_status(response).await?.json().await?;
        debug!(count = list.files.len(), "Drive files listed");
        Ok(list.files)
    }

    /// Runs a `files.get` call for `file_id` with the given field set
    pub async fn get_file(&self, file_id: &str, fields: &str) -> Result<DriveFile, DriveError> {
        debug!(file_id, "Fetching Drive file metadata");

        let path = format!("{}/{}", FILES_PATH, file_id);
        let response = self
            .read_request(&path)
            .await?
            .query(&[("fields", fields)])
            .send()
            .await?;

        Ok(check_status(response).await?.json().await?)
    }
}

/// Turns a non-success response into [`DriveError::Status`]
pub(crate) async fn check_status(response: Response) -> Result<Response, DriveError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    warn!(status = status.as_u16(), "Drive request failed");
    Err(DriveError::Status {
        status: status.as_u16(),
        body,
    })
}

// ============================================================================
// StaticTokenSource
// ============================================================================

/// Token source that always yields the same token
///
/// Used for scripted access with a pre-issued token and in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenSource(Option<String>);

impl StaticTokenSource {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    /// A source with no token, as when signed out
    pub fn empty() -> Self {
        Self(None)
    }
}

#[async_trait::async_trait]
impl IAccessTokenSource for StaticTokenSource {
    async fn access_token(&self) -> Option<String> {
        self.0.clone()
    }
}
