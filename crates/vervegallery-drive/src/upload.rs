//! Multipart upload to Google Drive
//!
//! Uploads a file and its metadata in a single `multipart/related` request:
//! `POST /upload/drive/v3/files?uploadType=multipart`. The body is streamed
//! in fixed-size chunks and a progress percentage is reported as each chunk
//! is handed to the connection.
//!
//! ## Drive API References
//!
//! - [Perform a multipart upload](https://developers.google.com/drive/api/guides/manage-uploads#multipart)

use std::sync::{
    atomic::{AtomicU8, Ordering},
    Arc,
};

use futures_util::{stream, StreamExt};
use reqwest::{
    header::{CONTENT_LENGTH, CONTENT_TYPE},
    Body, Method, StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use vervegallery_core::{
    domain::{FileId, FolderId, GatewayError, UploadFile},
    ports::ProgressCallback,
};

use crate::{client::DriveClient, DriveError};

/// Upload endpoint path
const UPLOAD_PATH: &str = "/upload/drive/v3/files";

/// Default streaming chunk size: 256 KiB
pub const DEFAULT_CHUNK_SIZE: usize = 256 * 1024;

/// Media type used when the file has none
const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Metadata part of the multipart body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadMetadata<'a> {
    name: &'a str,
    mime_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parents: Option<[&'a str; 1]>,
}

/// Response from a successful upload
#[derive(Debug, Deserialize)]
struct UploadResponse {
    id: String,
}

/// Builds the complete `multipart/related` body
fn build_multipart_body(
    file: &UploadFile,
    folder_id: Option<&FolderId>,
    boundary: &str,
) -> Result<Vec<u8>, DriveError> {
    let mime_type = if file.mime_type.is_empty() {
        FALLBACK_MIME_TYPE
    } else {
        file.mime_type.as_str()
    };
    let metadata = UploadMetadata {
        name: &file.name,
        mime_type,
        parents: folder_id.map(|f| [f.as_str()]),
    };
    let metadata = serde_json::to_vec(&metadata)
        .map_err(|e| DriveError::InvalidResponse(format!("unserializable metadata: {e}")))?;

    let mut body = Vec::with_capacity(file.data.len() + metadata.len() + 256);
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
    body.extend_from_slice(&metadata);
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(format!("Content-Type: {mime_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(&file.data);
    body.extend_from_slice(format!("\r\n--{boundary}--").as_bytes());
    Ok(body)
}

/// Rounded percentage of `sent` over `total`, in `0..=100`
fn percent(sent: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((sent as f64 / total as f64) * 100.0).round().min(100.0) as u8
}

/// Uploads `file`, optionally into `folder_id`, and returns the new file ID
///
/// `on_progress` receives non-decreasing percentages; the last one is 100
/// once the whole body has been handed off.
///
/// # Errors
/// [`GatewayError::Upload`] with the HTTP status (if any) and the last
/// progress reported, or [`GatewayError::Auth`] without a token.
pub async fn upload_file(
    client: &DriveClient,
    file: &UploadFile,
    folder_id: Option<&FolderId>,
    chunk_size: usize,
    on_progress: Option<ProgressCallback>,
) -> Result<FileId, GatewayError> {
    let progress = Arc::new(AtomicU8::new(0));
    send_upload(client, file, folder_id, chunk_size, on_progress, progress.clone())
        .await
        .map_err(|e| e.into_upload(progress.load(Ordering::SeqCst)))
}

async fn send_upload(
    client: &DriveClient,
    file: &UploadFile,
    folder_id: Option<&FolderId>,
    chunk_size: usize,
    on_progress: Option<ProgressCallback>,
    progress: Arc<AtomicU8>,
) -> Result<FileId, DriveError> {
    let boundary = format!("vervegallery-{}", uuid::Uuid::new_v4().simple());
    let body = build_multipart_body(file, folder_id, &boundary)?;
    let total = body.len();

    info!(
        name = %file.name,
        bytes = file.len(),
        folder = folder_id.map(FolderId::as_str),
        "Uploading file"
    );

    let chunks: Vec<Vec<u8>> = body
        .chunks(chunk_size.max(1))
        .map(<[u8]>::to_vec)
        .collect();

    let mut sent = 0usize;
    let reported = progress.clone();
    let body_stream = stream::iter(chunks).map(move |chunk| {
        let first = sent == 0;
        sent += chunk.len();
        let pct = percent(sent, total);
        if first || pct > reported.load(Ordering::SeqCst) {
            reported.store(pct, Ordering::SeqCst);
            if let Some(cb) = &on_progress {
                cb(pct);
            }
        }
        Ok::<_, std::io::Error>(chunk)
    });

    let response = client
        .request(Method::POST, UPLOAD_PATH)
        .await?
        .query(&[("uploadType", "multipart")])
        .header(
            CONTENT_TYPE,
            format!("multipart/related; boundary={boundary}"),
        )
        .header(CONTENT_LENGTH, total)
        .body(Body::wrap_stream(body_stream))
        .send()
        .await?;

    let status = response.status();
    if status != StatusCode::OK && status != StatusCode::CREATED {
        let body = response.text().await.unwrap_or_default();
        return Err(DriveError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let uploaded: UploadResponse = response.json().await?;
    let file_id = FileId::new(uploaded.id)
        .map_err(|e| DriveError::InvalidResponse(e.to_string()))?;

    debug!(file_id = %file_id, "Upload complete");
    Ok(file_id)
}
