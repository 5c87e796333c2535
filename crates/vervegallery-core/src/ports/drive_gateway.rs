//! Drive gateway port (driven/secondary port)
//!
//! Stateless mapping from gallery intents to the photo storage backend.
//! The only implementation targets Google Drive v3, but the stores only
//! see this trait and the normalized [`Photo`]/[`Category`] DTOs.
//!
//! ## Design Notes
//!
//! - Errors are the typed [`GatewayError`] rather than `anyhow`, because the
//!   stores record different messages per error kind.
//! - No method retries, deduplicates or paginates beyond one page.

use std::sync::Arc;

use crate::domain::{Category, FileId, FolderId, GatewayError, Photo, UploadFile};

/// Default page size for [`IDriveGateway::list_photos`]
pub const DEFAULT_LIST_LIMIT: u32 = 100;

/// Upload progress callback, called with percentages in `0..=100`
pub type ProgressCallback = Arc<dyn Fn(u8) + Send + Sync>;

/// Port trait for the photo storage backend
#[async_trait::async_trait]
pub trait IDriveGateway: Send + Sync {
    /// Lists images, newest first
    ///
    /// # Arguments
    /// * `folder_id` - Restrict to images whose parent is this folder
    /// * `limit` - Maximum number of photos returned (single page)
    ///
    /// # Errors
    /// [`GatewayError::Auth`] without a session, [`GatewayError::Fetch`] on a
    /// non-2xx response or network failure
    async fn list_photos(
        &self,
        folder_id: Option<&FolderId>,
        limit: u32,
    ) -> Result<Vec<Photo>, GatewayError>;

    /// Finds folders whose name contains `name_pattern`
    ///
    /// Each returned category carries a `count` of 0 or 1 and the thumbnail
    /// of the folder's first image. All matching folders are returned.
    async fn list_folders_by_name(&self, name_pattern: &str)
        -> Result<Vec<Category>, GatewayError>;

    /// Uploads a file, optionally into a folder
    ///
    /// `on_progress` receives non-decreasing percentages in `0..=100`.
    ///
    /// # Returns
    /// The Drive ID of the new file
    ///
    /// # Errors
    /// [`GatewayError::Upload`] carrying the HTTP status and last progress
    async fn upload_file(
        &self,
        file: &UploadFile,
        folder_id: Option<&FolderId>,
        on_progress: Option<ProgressCallback>,
    ) -> Result<FileId, GatewayError>;

    /// Fetches a single file's metadata
    ///
    /// # Errors
    /// [`GatewayError::NotFound`] when the file does not exist
    async fn get_file_metadata(&self, file_id: &FileId) -> Result<Photo, GatewayError>;
}
