//! GoogleDriveGateway - IDriveGateway implementation for Google Drive v3
//!
//! Wraps the [`DriveClient`] and delegates to the files, folders, and upload
//! modules to fulfil the [`IDriveGateway`] port contract.
//!
//! ## Design Notes
//!
//! - Stateless apart from configuration; the bearer token is read from the
//!   client's token source on every call.
//! - [`DriveError`]s are mapped into the port's `GatewayError` here, so the
//!   stores never see HTTP details.

use std::sync::Arc;

use tracing::debug;
use vervegallery_core::{
    config::DriveConfig,
    domain::{Category, FileId, FolderId, GatewayError, Photo, UploadFile},
    ports::{IAccessTokenSource, IDriveGateway, ProgressCallback},
};

use crate::{
    client::DriveClient,
    files, folders,
    upload::{self, DEFAULT_CHUNK_SIZE},
    DriveError,
};

/// Google Drive implementation of [`IDriveGateway`]
pub struct GoogleDriveGateway {
    client: DriveClient,
    /// Upload streaming chunk size in bytes
    chunk_size: usize,
}

impl GoogleDriveGateway {
    /// Creates a gateway around an existing client
    pub fn new(client: DriveClient) -> Self {
        Self {
            client,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Creates a gateway from the `drive` configuration section
    pub fn from_config(
        config: &DriveConfig,
        tokens: Arc<dyn IAccessTokenSource>,
    ) -> Result<Self, DriveError> {
        let client = DriveClient::from_config(config, tokens)?;
        Ok(Self::new(client).with_chunk_size(config.upload_chunk_kib as usize * 1024))
    }

    /// Overrides the upload chunk size (in bytes)
    pub fn with_chunk_size(mut self, bytes: usize) -> Self {
        self.chunk_size = bytes.max(1);
        self
    }

    /// Returns the underlying client
    pub fn client(&self) -> &DriveClient {
        &self.client
    }
}

#[async_trait::async_trait]
impl IDriveGateway for GoogleDriveGateway {
    async fn list_photos(
        &self,
        folder_id: Option<&FolderId>,
        limit: u32,
    ) -> Result<Vec<Photo>, GatewayError> {
        files::list_photos(&self.client, folder_id, limit)
            .await
            .map_err(DriveError::into_fetch)
    }

    async fn list_folders_by_name(
        &self,
        name_pattern: &str,
    ) -> Result<Vec<Category>, GatewayError> {
        folders::list_folders_by_name(&self.client, name_pattern)
            .await
            .map_err(DriveError::into_fetch)
    }

    async fn upload_file(
        &self,
        file: &UploadFile,
        folder_id: Option<&FolderId>,
        on_progress: Option<ProgressCallback>,
    ) -> Result<FileId, GatewayError> {
        upload::upload_file(&self.client, file, folder_id, self.chunk_size, on_progress).await
    }

    async fn get_file_metadata(&self, file_id: &FileId) -> Result<Photo, GatewayError> {
        debug!(file_id = %file_id, "Getting file metadata");
        files::get_file_metadata(&self.client, file_id)
            .await
            .map_err(|e| e.into_lookup(file_id.as_str()))
    }
}
