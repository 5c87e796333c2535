//! Multipart upload against a mocked Drive API

use std::sync::{Arc, Mutex};
use std::time::Duration;

use wiremock::matchers::{body_string_contains, header_regex, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use vervegallery_core::domain::{FolderId, GatewayError, UploadFile};
use vervegallery_core::ports::{IDriveGateway, ProgressCallback};
use vervegallery_drive::client::{DriveClient, StaticTokenSource};
use vervegallery_drive::provider::GoogleDriveGateway;

use crate::common::{setup_drive_mock, ACCESS_TOKEN};

fn recorder() -> (Arc<Mutex<Vec<u8>>>, ProgressCallback) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let callback: ProgressCallback = Arc::new(move |p| sink.lock().unwrap().push(p));
    (seen, callback)
}

#[tokio::test]
async fn upload_reports_progress_and_returns_id() {
    let (server, gateway) = setup_drive_mock().await;
    let gateway = gateway.with_chunk_size(64);

    Mock::given(method("POST"))
        .and(path("/upload/drive/v3/files"))
        .and(query_param("uploadType", "multipart"))
        .and(header_regex("content-type", "^multipart/related; boundary=.+"))
        .and(body_string_contains(r#""parents":["folderCup"]"#))
        .and(body_string_contains(r#""name":"finish-line.jpg""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "kind": "drive#file",
            "id": "newFile01",
            "name": "finish-line.jpg",
            "mimeType": "image/jpeg"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let file = UploadFile::new("finish-line.jpg", "image/jpeg", vec![b'x'; 1000]);
    let folder = FolderId::new("folderCup").unwrap();
    let (seen, callback) = recorder();

    let id = gateway
        .upload_file(&file, Some(&folder), Some(callback))
        .await
        .unwrap();

    assert_eq!(id.as_str(), "newFile01");
    let seen = seen.lock().unwrap();
    assert!(seen.len() > 1, "expected several progress reports: {seen:?}");
    assert!(seen.windows(2).all(|w| w[0] <= w[1]), "not monotonic: {seen:?}");
    assert_eq!(*seen.last().unwrap(), 100);
}

#[tokio::test]
async fn created_status_is_success() {
    let (server, gateway) = setup_drive_mock().await;

    Mock::given(method("POST"))
        .and(path("/upload/drive/v3/files"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": "created01"})),
        )
        .mount(&server)
        .await;

    let file = UploadFile::new("a.png", "image/png", vec![1, 2, 3]);
    let id = gateway.upload_file(&file, None, None).await.unwrap();
    assert_eq!(id.as_str(), "created01");
}

#[tokio::test]
async fn rejected_upload_carries_status_and_progress() {
    let (server, gateway) = setup_drive_mock().await;

    Mock::given(method("POST"))
        .and(path("/upload/drive/v3/files"))
        .respond_with(ResponseTemplate::new(403).set_body_string("insufficient permissions"))
        .mount(&server)
        .await;

    let file = UploadFile::new("a.png", "image/png", vec![0; 300]);
    let (seen, callback) = recorder();

    match gateway.upload_file(&file, None, Some(callback)).await.unwrap_err() {
        GatewayError::Upload {
            status,
            progress,
            message,
        } => {
            assert_eq!(status, Some(403));
            assert_eq!(progress, *seen.lock().unwrap().last().unwrap());
            assert!(message.contains("insufficient permissions"));
        }
        other => panic!("expected upload error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_success_body_is_an_upload_error() {
    let (server, gateway) = setup_drive_mock().await;

    Mock::given(method("POST"))
        .and(path("/upload/drive/v3/files"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&server)
        .await;

    let file = UploadFile::new("a.png", "image/png", vec![9; 10]);
    let err = gateway.upload_file(&file, None, None).await.unwrap_err();
    assert!(matches!(err, GatewayError::Upload { .. }));
}

#[tokio::test]
async fn read_timeout_does_not_cut_off_slow_uploads() {
    let server = wiremock::MockServer::start().await;
    let client = DriveClient::with_base_url(
        Arc::new(StaticTokenSource::new(ACCESS_TOKEN)),
        server.uri(),
    )
    .with_read_timeout(Duration::from_millis(300));
    let gateway = GoogleDriveGateway::new(client).with_chunk_size(64);

    Mock::given(method("POST"))
        .and(path("/upload/drive/v3/files"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"id": "slowUpload01"}))
                .set_delay(Duration::from_millis(900)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"files": []}))
                .set_delay(Duration::from_millis(900)),
        )
        .mount(&server)
        .await;

    let file = UploadFile::new("wide-angle.jpg", "image/jpeg", vec![b'x'; 4096]);
    let id = gateway.upload_file(&file, None, None).await.unwrap();
    assert_eq!(id.as_str(), "slowUpload01");

    let err = gateway.list_photos(None, 10).await.unwrap_err();
    assert!(matches!(err, GatewayError::Fetch { status: None, .. }), "{err:?}");
}
