//! Drive file DTOs and image listing
//!
//! Maps `files.list` / `files.get` responses into the normalized [`Photo`]
//! DTO. Absent upstream fields become `""` or `0`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use tracing::debug;
use vervegallery_core::domain::{FileId, FolderId, Photo};

use crate::{
    client::DriveClient,
    query::{FileListQuery, IMAGE_FILE_FIELDS},
    DriveError,
};

// ============================================================================
// Drive API response types
// ============================================================================

/// A file resource as returned by the Drive v3 API
///
/// Only the requested fields are present in a response, so everything but
/// the ID is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub mime_type: Option<String>,
    pub thumbnail_link: Option<String>,
    pub image_media_metadata: Option<ImageMediaMetadata>,
    pub web_content_link: Option<String>,
    /// RFC 3339 creation time
    pub created_time: Option<String>,
    /// Drive encodes `int64` fields as JSON strings
    #[serde(default, deserialize_with = "deserialize_size")]
    pub size: Option<u64>,
}

/// Image-specific metadata of a Drive file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageMediaMetadata {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Accepts a size encoded either as a JSON string or a number
fn deserialize_size<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawSize {
        Text(String),
        Number(u64),
    }

    match Option::<RawSize>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawSize::Number(n)) => Ok(Some(n)),
        Some(RawSize::Text(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

// ============================================================================
// DriveFile -> Photo conversion
// ============================================================================

impl From<DriveFile> for Photo {
    fn from(file: DriveFile) -> Self {
        let (width, height) = file
            .image_media_metadata
            .map(|m| (m.width.unwrap_or(0), m.height.unwrap_or(0)))
            .unwrap_or((0, 0));

        let date_created = file
            .created_time
            .as_deref()
            .and_then(|s| s.parse::<DateTime<Utc>>().ok());

        Photo {
            full_image_url: Photo::full_image_url_for(&file.id),
            id: file.id,
            name: file.name,
            thumbnail_url: file.thumbnail_link.unwrap_or_default(),
            download_url: file.web_content_link.unwrap_or_default(),
            date_created,
            width,
            height,
            size: file.size.unwrap_or(0),
            mime_type: file.mime_type.unwrap_or_default(),
        }
    }
}

// ============================================================================
// Operations
// ============================================================================

/// Lists up to `limit` images, newest first, optionally inside a folder
///
/// A `limit` of 0 returns an empty list without calling Drive.
pub async fn list_photos(
    client: &DriveClient,
    folder_id: Option<&FolderId>,
    limit: u32,
) -> Result<Vec<Photo>, DriveError> {
    if limit == 0 {
        return Ok(Vec::new());
    }

    let files = client
        .list_files(&FileListQuery::images(folder_id, limit))
        .await?;

    let photos: Vec<Photo> = files
        .into_iter()
        .take(limit as usize)
        .map(Photo::from)
        .collect();

    debug!(
        folder = folder_id.map(FolderId::as_str),
        count = photos.len(),
        "Listed photos"
    );
    Ok(photos)
}

/// Fetches a single file's metadata as a [`Photo`]
pub async fn get_file_metadata(client: &DriveClient, file_id: &FileId) -> Result<Photo, DriveError> {
    let file = client.get_file(file_id.as_str(), IMAGE_FILE_FIELDS).await?;
    Ok(Photo::from(file))
}
