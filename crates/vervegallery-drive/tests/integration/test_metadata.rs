//! Single-file metadata against a mocked Drive API

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use vervegallery_core::domain::{FileId, GatewayError};
use vervegallery_core::ports::IDriveGateway;
use vervegallery_drive::query::IMAGE_FILE_FIELDS;

use crate::common::{image_json, setup_drive_mock};

#[tokio::test]
async fn metadata_is_mapped_to_photo() {
    let (server, gateway) = setup_drive_mock().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files/img42"))
        .and(query_param("fields", IMAGE_FILE_FIELDS))
        .respond_with(ResponseTemplate::new(200).set_body_json(image_json(
            "img42",
            "podium.jpg",
            "2024-02-10T12:00:00Z",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let photo = gateway
        .get_file_metadata(&FileId::new("img42").unwrap())
        .await
        .unwrap();

    assert_eq!(photo.id, "img42");
    assert_eq!(photo.name, "podium.jpg");
    assert_eq!(photo.size, 204_800);
    assert_eq!(photo.mime_type, "image/jpeg");
    assert!(photo.date_created.is_some());
}

#[tokio::test]
async fn missing_file_maps_to_not_found() {
    let (server, gateway) = setup_drive_mock().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": {"code": 404, "message": "File not found: gone."}
        })))
        .mount(&server)
        .await;

    let err = gateway
        .get_file_metadata(&FileId::new("gone").unwrap())
        .await
        .unwrap_err();
    assert_eq!(err, GatewayError::NotFound("gone".to_string()));
}

#[tokio::test]
async fn other_failures_map_to_fetch_error() {
    let (server, gateway) = setup_drive_mock().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files/locked"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = gateway
        .get_file_metadata(&FileId::new("locked").unwrap())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert!(matches!(err, GatewayError::Fetch { .. }));
}
