//! Shared test helpers for Drive API integration tests
//!
//! Each helper mounts mock endpoints on a wiremock server. The gateway
//! returned by [`setup_drive_mock`] points at that server and authorizes
//! with [`ACCESS_TOKEN`].

use std::sync::Arc;

use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vervegallery_drive::client::{DriveClient, StaticTokenSource};
use vervegallery_drive::provider::GoogleDriveGateway;

pub const ACCESS_TOKEN: &str = "test-access-token";

pub const IMAGES_QUERY: &str = "mimeType contains 'image/' and trashed = false";

/// Starts a mock server and returns a signed-in gateway pointing at it
pub async fn setup_drive_mock() -> (MockServer, GoogleDriveGateway) {
    let server = MockServer::start().await;
    let client = DriveClient::with_base_url(
        Arc::new(StaticTokenSource::new(ACCESS_TOKEN)),
        server.uri(),
    );
    (server, GoogleDriveGateway::new(client))
}

/// A gateway with no token, pointing at `server`
pub fn signed_out_gateway(server: &MockServer) -> GoogleDriveGateway {
    let client = DriveClient::with_base_url(Arc::new(StaticTokenSource::empty()), server.uri());
    GoogleDriveGateway::new(client)
}

/// A Drive image resource as `files.list` returns it
pub fn image_json(id: &str, name: &str, created: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "mimeType": "image/jpeg",
        "thumbnailLink": format!("https://lh3.googleusercontent.com/{id}=s220"),
        "imageMediaMetadata": {"width": 1600, "height": 1200},
        "webContentLink": format!("https://drive.google.com/uc?id={id}&export=download"),
        "createdTime": created,
        "size": "204800"
    })
}

/// Mounts `files.list` for images matching the exact `q` expression
pub async fn mount_image_list(server: &MockServer, q: &str, files: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .and(query_param("q", q))
        .and(header("authorization", format!("Bearer {ACCESS_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "files": files })))
        .mount(server)
        .await;
}

/// Mounts the folder-name lookup for `pattern`
pub async fn mount_folder_list(server: &MockServer, pattern: &str, folders: Vec<(&str, &str)>) {
    let files: Vec<Value> = folders
        .into_iter()
        .map(|(id, name)| json!({"id": id, "name": name}))
        .collect();
    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .and(query_param(
            "q",
            format!(
                "mimeType = 'application/vnd.google-apps.folder' and name contains '{pattern}' and trashed = false"
            )
            .as_str(),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "files": files })))
        .mount(server)
        .await;
}

/// Mounts the first-image lookup for `folder_id`
///
/// `thumbnail` of `None` means the folder holds no image.
pub async fn mount_first_image(server: &MockServer, folder_id: &str, thumbnail: Option<&str>) {
    let files = match thumbnail {
        Some(link) => json!([{"id": format!("{folder_id}-img"), "thumbnailLink": link}]),
        None => json!([]),
    };
    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .and(query_param("pageSize", "1"))
        .and(query_param(
            "q",
            format!("'{folder_id}' in parents and {IMAGES_QUERY}").as_str(),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "files": files })))
        .mount(server)
        .await;
}
