//! PhotoStore - cached photo collections and gallery actions
//!
//! Holds the latest result of each fetch as the single source of truth for
//! photo views: `photos`, `recent_photos`, `categories` and the selected
//! category, plus the status of every upload.
//!
//! ## Design Notes
//!
//! - Each collection is replaced wholesale when its fetch resolves. Fetches
//!   are neither deduplicated nor cancelled, so when two fetches that target
//!   `photos` overlap, the one that resolves last wins.
//! - Every action runs as a tracked request (see [`RequestTracker`]); the
//!   error is returned to the caller and its message recorded on the tracker.
//! - Upload progress is written from the gateway's progress callback, which
//!   is synchronous, so upload statuses live in a `DashMap` rather than
//!   behind the async state lock. Only the newest finished uploads are kept.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use dashmap::DashMap;
use futures_util::future::try_join_all;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info};
use vervegallery_core::{
    config::Config,
    domain::{Category, FileId, FolderId, GatewayError, Photo, UploadFile, UploadId, UploadStatus},
    ports::{FaceDescriptor, FaceMatch, IDriveGateway, IFaceMatcher, ProgressCallback},
};

use crate::{tracker::RequestTracker, StoreError};

pub const FETCH_PHOTOS_FAILED: &str = "Failed to fetch photos";
pub const FETCH_CATEGORY_PHOTOS_FAILED: &str = "Failed to fetch category photos";
pub const FETCH_RECENT_FAILED: &str = "Failed to fetch recent photos";
pub const FETCH_CATEGORIES_FAILED: &str = "Failed to fetch categories";
pub const UPLOAD_FAILED: &str = "Failed to upload photo";
pub const FACE_SEARCH_FAILED: &str = "Failed to search by face";

/// Finished upload statuses kept for lookup; in-flight ones are never evicted
const MAX_FINISHED_UPLOADS: usize = 64;

// ============================================================================
// Settings and state
// ============================================================================

/// Tunables for [`PhotoStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoStoreSettings {
    /// Page size for "all photos", category listings and the face-search pool
    pub page_size: u32,
    /// Default limit for [`PhotoStore::fetch_recent_photos`]
    pub recent_limit: u32,
    /// Category names looked up by [`PhotoStore::fetch_categories`], in order
    pub category_names: Vec<String>,
}

impl PhotoStoreSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            page_size: config.drive.page_size,
            recent_limit: config.drive.recent_limit,
            category_names: config.gallery.categories.clone(),
        }
    }
}

impl Default for PhotoStoreSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Snapshot of the photo collections
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PhotoState {
    pub photos: Vec<Photo>,
    pub recent_photos: Vec<Photo>,
    pub categories: Vec<Category>,
    pub selected_category: Option<Category>,
}

#[derive(Debug, Clone)]
struct TrackedUpload {
    /// Start order, used to find the latest upload
    seq: u64,
    status: UploadStatus,
}

// ============================================================================
// PhotoStore
// ============================================================================

/// State container for the gallery's photo views
pub struct PhotoStore {
    gateway: Arc<dyn IDriveGateway>,
    matcher: Arc<dyn IFaceMatcher>,
    settings: PhotoStoreSettings,
    state: RwLock<PhotoState>,
    uploads: Arc<DashMap<UploadId, TrackedUpload>>,
    upload_seq: AtomicU64,
    tracker: RequestTracker,
}

impl PhotoStore {
    pub fn new(
        gateway: Arc<dyn IDriveGateway>,
        matcher: Arc<dyn IFaceMatcher>,
        settings: PhotoStoreSettings,
    ) -> Self {
        Self {
            gateway,
            matcher,
            settings,
            state: RwLock::new(PhotoState::default()),
            uploads: Arc::new(DashMap::new()),
            upload_seq: AtomicU64::new(0),
            tracker: RequestTracker::new(),
        }
    }

    // --- read side ---

    /// Snapshot of all collections
    pub async fn snapshot(&self) -> PhotoState {
        self.state.read().await.clone()
    }

    pub async fn photos(&self) -> Vec<Photo> {
        self.state.read().await.photos.clone()
    }

    pub async fn recent_photos(&self) -> Vec<Photo> {
        self.state.read().await.recent_photos.clone()
    }

    pub async fn categories(&self) -> Vec<Category> {
        self.state.read().await.categories.clone()
    }

    pub async fn selected_category(&self) -> Option<Category> {
        self.state.read().await.selected_category.clone()
    }

    /// True while any action of this store is in flight
    pub fn is_loading(&self) -> bool {
        self.tracker.is_loading()
    }

    /// Message of the most recently failed action
    pub fn last_error(&self) -> Option<String> {
        self.tracker.last_error()
    }

    pub fn tracker(&self) -> &RequestTracker {
        &self.tracker
    }

    pub fn settings(&self) -> &PhotoStoreSettings {
        &self.settings
    }

    /// Status of a specific upload
    pub fn upload_status(&self, id: &UploadId) -> Option<UploadStatus> {
        self.uploads.get(id).map(|u| u.status.clone())
    }

    /// The most recently started upload and its status
    pub fn latest_upload(&self) -> Option<(UploadId, UploadStatus)> {
        self.uploads
            .iter()
            .max_by_key(|u| u.seq)
            .map(|u| (*u.key(), u.status.clone()))
    }

    // --- actions ---

    /// Fetches the newest photos across the whole Drive and replaces `photos`
    pub async fn fetch_all_photos(&self) -> Result<Vec<Photo>, StoreError> {
        self.tracker
            .track("fetch_all_photos", async {
                let photos = self
                    .gateway
                    .list_photos(None, self.settings.page_size)
                    .await
                    .map_err(|e| StoreError::gateway(FETCH_PHOTOS_FAILED, e))?;

                self.state.write().await.photos = photos.clone();
                info!(count = photos.len(), "Fetched all photos");
                Ok(photos)
            })
            .await
    }

    /// Selects a loaded category and replaces `photos` with its images
    ///
    /// Requires `categories` to be populated. A placeholder category has no
    /// folder, so its photo list is empty and Drive is not queried.
    pub async fn fetch_photos_by_category(
        &self,
        category_id: &str,
    ) -> Result<Vec<Photo>, StoreError> {
        self.tracker
            .track("fetch_photos_by_category", async {
                let category = self
                    .state
                    .read()
                    .await
                    .categories
                    .iter()
                    .find(|c| c.id == category_id)
                    .cloned()
                    .ok_or_else(|| StoreError::CategoryNotFound(category_id.to_string()))?;

                self.state.write().await.selected_category = Some(category.clone());

                let photos = if category.is_placeholder() {
                    debug!(category = %category.name, "Placeholder category has no photos");
                    Vec::new()
                } else {
                    let folder = FolderId::new(category.id.clone())?;
                    self.gateway
                        .list_photos(Some(&folder), self.settings.page_size)
                        .await
                        .map_err(|e| StoreError::gateway(FETCH_CATEGORY_PHOTOS_FAILED, e))?
                };

                self.state.write().await.photos = photos.clone();
                info!(category = %category.name, count = photos.len(), "Fetched category photos");
                Ok(photos)
            })
            .await
    }

    /// Fetches the newest photos into `recent_photos`
    ///
    /// `limit` defaults to the configured recent limit.
    pub async fn fetch_recent_photos(&self, limit: Option<u32>) -> Result<Vec<Photo>, StoreError> {
        let limit = limit.unwrap_or(self.settings.recent_limit);
        self.tracker
            .track("fetch_recent_photos", async {
                let photos = self
                    .gateway
                    .list_photos(None, limit)
                    .await
                    .map_err(|e| StoreError::gateway(FETCH_RECENT_FAILED, e))?;

                self.state.write().await.recent_photos = photos.clone();
                info!(count = photos.len(), limit, "Fetched recent photos");
                Ok(photos)
            })
            .await
    }

    /// Resolves every configured category name to a folder
    ///
    /// Lookups run concurrently. The first folder found for a name backs its
    /// category; a name with no folder gets a placeholder. Any failed lookup
    /// fails the whole call and leaves `categories` untouched.
    pub async fn fetch_categories(&self) -> Result<Vec<Category>, StoreError> {
        self.tracker
            .track("fetch_categories", async {
                let lookups = self
                    .settings
                    .category_names
                    .iter()
                    .map(|name| self.resolve_category(name));

                let categories = try_join_all(lookups)
                    .await
                    .map_err(|e| StoreError::gateway(FETCH_CATEGORIES_FAILED, e))?;

                self.state.write().await.categories = categories.clone();
                info!(count = categories.len(), "Fetched categories");
                Ok(categories)
            })
            .await
    }

    async fn resolve_category(&self, name: &str) -> Result<Category, GatewayError> {
        let folders = self.gateway.list_folders_by_name(name).await?;
        if folders.len() > 1 {
            debug!(name, folders = folders.len(), "Several folders match; using the first");
        }
        Ok(match folders.into_iter().next() {
            Some(folder) => Category {
                id: folder.id,
                name: name.to_string(),
                count: folder.count,
                cover_image: folder.cover_image,
            },
            None => Category::placeholder(name),
        })
    }

    pub async fn set_selected_category(&self, category: Option<Category>) {
        self.state.write().await.selected_category = category;
    }

    /// Uploads a photo, optionally into a category folder
    ///
    /// The upload's status is tracked under a fresh [`UploadId`]. On success
    /// the status is completed at 100%, and `photos` is refreshed when the
    /// target category is the selected one. On failure the status is set to
    /// error with progress reset to 0.
    pub async fn upload_photo(
        &self,
        file: UploadFile,
        category_id: Option<&str>,
    ) -> Result<FileId, StoreError> {
        let upload_id = self.begin_upload(&file.name);

        let result = self
            .tracker
            .track("upload_photo", async {
                let folder = category_id
                    .map(FolderId::new)
                    .transpose()
                    .map_err(|e| {
                        StoreError::gateway(
                            UPLOAD_FAILED,
                            GatewayError::Upload {
                                status: None,
                                progress: 0,
                                message: e.to_string(),
                            },
                        )
                    })?;

                let uploads = self.uploads.clone();
                let on_progress: ProgressCallback = Arc::new(move |progress| {
                    if let Some(mut upload) = uploads.get_mut(&upload_id) {
                        upload.status.advance(progress);
                    }
                });

                self.gateway
                    .upload_file(&file, folder.as_ref(), Some(on_progress))
                    .await
                    .map_err(|e| StoreError::gateway(UPLOAD_FAILED, e))
            })
            .await;

        match result {
            Ok(file_id) => {
                self.update_upload(&upload_id, UploadStatus::complete);
                info!(upload_id = %upload_id, file_id = %file_id, "Photo uploaded");

                if let Some(category_id) = category_id {
                    let viewing = self
                        .selected_category()
                        .await
                        .is_some_and(|c| c.id == category_id);
                    if viewing {
                        // a failed refresh is recorded on its own request
                        let _ = self.fetch_photos_by_category(category_id).await;
                    }
                }
                Ok(file_id)
            }
            Err(err) => {
                self.update_upload(&upload_id, UploadStatus::fail);
                Err(err)
            }
        }
    }

    fn begin_upload(&self, file_name: &str) -> UploadId {
        let id = UploadId::new();
        let seq = self.upload_seq.fetch_add(1, Ordering::SeqCst);
        self.uploads.insert(
            id,
            TrackedUpload {
                seq,
                status: UploadStatus::started(file_name),
            },
        );
        id
    }

    fn update_upload(&self, id: &UploadId, transition: fn(&mut UploadStatus)) {
        if let Some(mut upload) = self.uploads.get_mut(id) {
            transition(&mut upload.status);
        }
        self.evict_finished_uploads();
    }

    /// Drops the oldest finished uploads beyond [`MAX_FINISHED_UPLOADS`]
    fn evict_finished_uploads(&self) {
        let mut finished: Vec<(u64, UploadId)> = self
            .uploads
            .iter()
            .filter(|u| u.status.is_finished())
            .map(|u| (u.seq, *u.key()))
            .collect();
        if finished.len() <= MAX_FINISHED_UPLOADS {
            return;
        }
        finished.sort_unstable_by_key(|(seq, _)| *seq);
        let excess = finished.len() - MAX_FINISHED_UPLOADS;
        for (_, id) in finished.into_iter().take(excess) {
            self.uploads.remove(&id);
        }
        debug!(evicted = excess, "Evicted finished upload statuses");
    }

    /// Ranks the newest photos against a face and replaces `photos` with the
    /// matched photos
    pub async fn search_photos_by_face(
        &self,
        descriptor: &FaceDescriptor,
    ) -> Result<Vec<FaceMatch>, StoreError> {
        self.tracker
            .track("search_photos_by_face", async {
                let pool = self
                    .gateway
                    .list_photos(None, self.settings.page_size)
                    .await
                    .map_err(|e| StoreError::gateway(FACE_SEARCH_FAILED, e))?;

                let matches = self
                    .matcher
                    .find_matches(descriptor, &pool)
                    .await
                    .map_err(|e| StoreError::FaceSearch(format!("{e:#}")))?;

                self.state.write().await.photos = matches.iter().map(|m| m.photo.clone()).collect();
                info!(pool = pool.len(), matches = matches.len(), "Face search complete");
                Ok(matches)
            })
            .await
    }
}
