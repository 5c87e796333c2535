//! Category folder lookup
//!
//! A category is any non-trashed folder whose name contains a pattern. Each
//! matching folder is queried for its first image, which gives the cover
//! thumbnail and a 0/1 count.

use futures_util::future::try_join_all;
use tracing::debug;
use vervegallery_core::domain::Category;

use crate::{client::DriveClient, files::DriveFile, query::FileListQuery, DriveError};

/// Finds folders whose name contains `name_pattern`
///
/// Folder queries run concurrently; the result keeps Drive's folder order. If any
/// query fails the whole lookup fails.
pub async fn list_folders_by_name(
    client: &DriveClient,
    name_pattern: &str,
) -> Result<Vec<Category>, DriveError> {
    let folders = client
        .list_files(&FileListQuery::folders_named(name_pattern))
        .await?;

    debug!(
        pattern = name_pattern,
        folders = folders.len(),
        "Probing category folders"
    );

    try_join_all(folders.into_iter().map(|folder| inspect_folder(client, folder))).await
}

async fn inspect_folder(client: &DriveClient, folder: DriveFile) -> Result<Category, DriveError> {
    let first = client
        .list_files(&FileListQuery::first_image_in(&folder.id))
        .await?
        .into_iter()
        .next();

    let (count, cover_image) = match first {
        Some(image) => (1, image.thumbnail_link.unwrap_or_default()),
        None => (0, String::new()),
    };

    Ok(Category {
        id: folder.id,
        name: folder.name,
        count,
        cover_image,
    })
}
