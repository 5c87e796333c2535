//! Image listing against a mocked Drive API

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use vervegallery_core::domain::{FolderId, GatewayError};
use vervegallery_core::ports::IDriveGateway;

use crate::common::{
    image_json, mount_image_list, setup_drive_mock, signed_out_gateway, IMAGES_QUERY,
};

#[tokio::test]
async fn lists_images_newest_first_with_normalized_fields() {
    let (server, gateway) = setup_drive_mock().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .and(query_param("q", IMAGES_QUERY))
        .and(query_param("pageSize", "100"))
        .and(query_param("orderBy", "createdTime desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "files": [
                image_json("img2", "run-finish.jpg", "2024-12-02T08:00:00Z"),
                {"id": "img1", "name": "bare.png"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let photos = gateway.list_photos(None, 100).await.unwrap();

    assert_eq!(photos.len(), 2);
    assert_eq!(photos[0].id, "img2");
    assert_eq!(photos[0].width, 1600);
    assert_eq!(photos[0].size, 204_800);
    assert_eq!(photos[0].full_image_url, "https://drive.google.com/uc?id=img2");

    // absent fields become empty strings, never missing
    assert_eq!(photos[1].thumbnail_url, "");
    assert_eq!(photos[1].download_url, "");
    assert_eq!(photos[1].full_image_url, "https://drive.google.com/uc?id=img1");
}

#[tokio::test]
async fn result_is_truncated_to_limit() {
    let (server, gateway) = setup_drive_mock().await;

    let files = (0..5)
        .map(|i| image_json(&format!("p{i}"), "x.jpg", "2024-01-01T00:00:00Z"))
        .collect();
    mount_image_list(&server, IMAGES_QUERY, files).await;

    let photos = gateway.list_photos(None, 3).await.unwrap();
    assert_eq!(photos.len(), 3);
    assert_eq!(photos[2].id, "p2");
}

#[tokio::test]
async fn zero_limit_skips_the_request() {
    let (server, gateway) = setup_drive_mock().await;

    let photos = gateway.list_photos(None, 0).await.unwrap();

    assert!(photos.is_empty());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn folder_restricts_query_to_parents() {
    let (server, gateway) = setup_drive_mock().await;

    mount_image_list(
        &server,
        &format!("{IMAGES_QUERY} and 'folderVerve' in parents"),
        vec![image_json("v1", "cup.jpg", "2024-03-03T03:03:03Z")],
    )
    .await;

    let folder = FolderId::new("folderVerve").unwrap();
    let photos = gateway.list_photos(Some(&folder), 100).await.unwrap();

    assert_eq!(photos.len(), 1);
    assert_eq!(photos[0].id, "v1");
}

#[tokio::test]
async fn server_error_maps_to_fetch_error() {
    let (server, gateway) = setup_drive_mock().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend unavailable"))
        .mount(&server)
        .await;

    match gateway.list_photos(None, 10).await.unwrap_err() {
        GatewayError::Fetch { status, message } => {
            assert_eq!(status, Some(500));
            assert!(message.contains("backend unavailable"));
        }
        other => panic!("expected fetch error, got {other:?}"),
    }
}

#[tokio::test]
async fn signed_out_gateway_sends_nothing() {
    let (server, _) = setup_drive_mock().await;
    let gateway = signed_out_gateway(&server);

    let err = gateway.list_photos(None, 10).await.unwrap_err();

    assert!(matches!(err, GatewayError::Auth(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}
