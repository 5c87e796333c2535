//! Photo and category entities
//!
//! Both types are normalized DTOs built from Drive responses. They are
//! immutable once fetched and replaced wholesale on every re-fetch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Base URL for the full-size image of a Drive file
const FULL_IMAGE_BASE_URL: &str = "https://drive.google.com/uc?id=";

/// Prefix used for categories that have no backing Drive folder
const PLACEHOLDER_PREFIX: &str = "placeholder-";

/// An image stored in Google Drive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    /// Drive file ID
    pub id: String,
    /// File name
    pub name: String,
    /// Drive thumbnail link, or empty string
    pub thumbnail_url: String,
    /// Public full-size image URL derived from the ID
    pub full_image_url: String,
    /// Drive `webContentLink`, or empty string
    pub download_url: String,
    /// Creation timestamp, if Drive reported one
    pub date_created: Option<DateTime<Utc>>,
    /// Pixel width, 0 when unknown
    pub width: u32,
    /// Pixel height, 0 when unknown
    pub height: u32,
    /// Size in bytes, 0 when unknown
    pub size: u64,
    /// MIME type, or empty string
    pub mime_type: String,
}

impl Photo {
    /// Builds the full-size image URL for a Drive file ID
    pub fn full_image_url_for(id: &str) -> String {
        format!("{}{}", FULL_IMAGE_BASE_URL, id)
    }

    /// Pixel count, 0 when either dimension is unknown
    pub fn pixels(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// A gallery category backed by a Drive folder found by name
///
/// `count` is 0 or 1: only the first image of the folder is looked up, so it
/// tells whether the folder has any photo, not how many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Drive folder ID, or a `placeholder-…` ID when no folder matched
    pub id: String,
    /// Display name
    pub name: String,
    /// 0 or 1, see type docs
    pub count: u32,
    /// Thumbnail of the first image found, or empty string
    pub cover_image: String,
}

impl Category {
    /// Builds the placeholder ID for a category name
    ///
    /// The name is lowercased and every whitespace run becomes a single `-`.
    ///
    /// ```
    /// use vervegallery_core::domain::Category;
    /// assert_eq!(Category::placeholder_id("Verve Cup"), "placeholder-verve-cup");
    /// ```
    pub fn placeholder_id(name: &str) -> String {
        let slug = name
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-");
        format!("{}{}", PLACEHOLDER_PREFIX, slug)
    }

    /// Creates an empty category for a name with no matching folder
    pub fn placeholder(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: Self::placeholder_id(&name),
            name,
            count: 0,
            cover_image: String::new(),
        }
    }

    /// Returns true if this category has no backing Drive folder
    pub fn is_placeholder(&self) -> bool {
        self.id.starts_with(PLACEHOLDER_PREFIX)
    }
}
