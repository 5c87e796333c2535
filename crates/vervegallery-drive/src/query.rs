//! `files.list` query construction
//!
//! Builds the `q`, `fields`, `pageSize` and `orderBy` parameters for the
//! three listings the gallery needs. User-supplied fragments (folder names,
//! folder IDs) are escaped before being embedded in a quoted literal.
//!
//! ## Drive API References
//!
//! - [Search query terms](https://developers.google.com/drive/api/guides/ref-search-terms)

use vervegallery_core::domain::FolderId;

/// Field set requested for each image in a listing
pub const IMAGE_LIST_FIELDS: &str =
    "files(id, name, mimeType, thumbnailLink, imageMediaMetadata, webContentLink, createdTime, size)";

/// Field set requested by `files.get`
pub const IMAGE_FILE_FIELDS: &str =
    "id, name, mimeType, thumbnailLink, imageMediaMetadata, webContentLink, createdTime, size";

/// MIME type Drive uses for folders
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Page size for folder lookups (Drive's own default)
const FOLDER_PAGE_SIZE: u32 = 100;

/// Escapes a value for use inside a single-quoted query literal
///
/// ```
/// use vervegallery_drive::query::escape_literal;
/// assert_eq!(escape_literal("Verve's Cup"), r"Verve\'s Cup");
/// ```
pub fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '\\' || c == '\'' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Parameters of a single `files.list` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileListQuery {
    q: String,
    fields: &'static str,
    page_size: u32,
    order_by: Option<&'static str>,
}

impl FileListQuery {
    /// Non-trashed images, newest first, optionally restricted to a folder
    pub fn images(folder: Option<&FolderId>, limit: u32) -> Self {
        let mut q = String::from("mimeType contains 'image/' and trashed = false");
        if let Some(folder) = folder {
            q.push_str(&format!(" and '{}' in parents", escape_literal(folder.as_str())));
        }
        Self {
            q,
            fields: IMAGE_LIST_FIELDS,
            page_size: limit,
            order_by: Some("createdTime desc"),
        }
    }

    /// Non-trashed folders whose name contains `pattern`
    pub fn folders_named(pattern: &str) -> Self {
        Self {
            q: format!(
                "mimeType = '{}' and name contains '{}' and trashed = false",
                FOLDER_MIME_TYPE,
                escape_literal(pattern)
            ),
            fields: "files(id, name)",
            page_size: FOLDER_PAGE_SIZE,
            order_by: None,
        }
    }

    /// At most one image directly inside `folder_id`
    pub fn first_image_in(folder_id: &str) -> Self {
        Self {
            q: format!(
                "'{}' in parents and mimeType contains 'image/' and trashed = false",
                escape_literal(folder_id)
            ),
            fields: "files(id, thumbnailLink), nextPageToken",
            page_size: 1,
            order_by: None,
        }
    }

    /// The `q` search expression
    pub fn q(&self) -> &str {
        &self.q
    }

    /// The requested `pageSize`
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Query-string pairs, ready for `RequestBuilder::query`
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("q", self.q.clone()),
            ("fields", self.fields.to_string()),
            ("pageSize", self.page_size.to_string()),
        ];
        if let Some(order_by) = self.order_by {
            params.push(("orderBy", order_by.to_string()));
        }
        params
    }
}
