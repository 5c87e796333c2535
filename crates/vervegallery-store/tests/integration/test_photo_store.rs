//! PhotoStore against a mocked Drive API

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vervegallery_core::domain::{UploadFile, UploadState};
use vervegallery_core::ports::FaceDescriptor;

use crate::common::{
    first_image_query, folder_images_query, folder_query, harness, image_json, ACCESS_TOKEN,
    IMAGES_QUERY,
};

async fn mount_files(server: &MockServer, q: &str, files: serde_json::Value, delay_ms: u64) {
    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .and(query_param("q", q))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "files": files }))
                .set_delay(Duration::from_millis(delay_ms)),
        )
        .mount(server)
        .await;
}

/// Mounts the default category names with a single `Verve Cup` folder
async fn mount_categories(server: &MockServer) {
    for name in ["Rajyotsava", "JSS Run", "Verve"] {
        mount_files(server, &folder_query(name), json!([]), 0).await;
    }
    mount_files(
        server,
        &folder_query("Verve Cup"),
        json!([{"id": "fCup", "name": "Verve Cup 2024"}]),
        0,
    )
    .await;
    mount_files(
        server,
        &first_image_query("fCup"),
        json!([{"id": "c1", "thumbnailLink": "https://thumb/c1"}]),
        0,
    )
    .await;
}

#[tokio::test]
async fn fetch_all_photos_sends_bearer_from_auth_store() {
    let h = harness(true).await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .and(query_param("q", IMAGES_QUERY))
        .and(header("authorization", format!("Bearer {ACCESS_TOKEN}").as_str()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "files": [image_json("a"), image_json("b")] })),
        )
        .expect(1)
        .mount(&h.server)
        .await;

    let photos = h.photos.fetch_all_photos().await.unwrap();

    assert_eq!(photos.len(), 2);
    assert_eq!(h.photos.photos().await, photos);
    assert!(!h.photos.is_loading());
}

#[tokio::test]
async fn signed_out_fetch_fails_without_calling_drive() {
    let h = harness(false).await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&h.server)
        .await;

    let err = h.photos.fetch_all_photos().await.unwrap_err();

    assert_eq!(err.user_message(), "Failed to fetch photos");
    assert_eq!(h.photos.last_error().as_deref(), Some("Failed to fetch photos"));
}

#[tokio::test]
async fn server_error_is_recorded_on_the_request() {
    let h = harness(true).await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend error"))
        .mount(&h.server)
        .await;

    let err = h.photos.fetch_recent_photos(None).await.unwrap_err();

    assert_eq!(err.gateway_error().and_then(|e| e.status()), Some(500));
    assert_eq!(
        h.photos.last_error().as_deref(),
        Some("Failed to fetch recent photos")
    );
}

#[tokio::test]
async fn categories_resolve_one_per_configured_name() {
    let h = harness(true).await;
    mount_categories(&h.server).await;

    let categories = h.photos.fetch_categories().await.unwrap();

    assert_eq!(categories.len(), 4);
    assert_eq!(categories[0].id, "placeholder-rajyotsava");
    assert_eq!(categories[1].id, "fCup");
    assert_eq!(categories[1].name, "Verve Cup");
    assert_eq!(categories[1].count, 1);
    assert_eq!(categories[1].cover_image, "https://thumb/c1");
    assert_eq!(categories[2].id, "placeholder-jss-run");
    assert_eq!(categories[3].id, "placeholder-verve");
}

#[tokio::test]
async fn slower_overlapping_fetch_determines_photos() {
    let h = harness(true).await;
    mount_categories(&h.server).await;
    h.photos.fetch_categories().await.unwrap();

    mount_files(&h.server, IMAGES_QUERY, json!([image_json("all1")]), 300).await;
    mount_files(
        &h.server,
        &folder_images_query("fCup"),
        json!([image_json("cup1")]),
        0,
    )
    .await;

    let (all, cup) = tokio::join!(
        h.photos.fetch_all_photos(),
        h.photos.fetch_photos_by_category("fCup")
    );
    all.unwrap();
    cup.unwrap();

    let photos = h.photos.photos().await;
    assert_eq!(photos.len(), 1);
    assert_eq!(photos[0].id, "all1");
    assert_eq!(h.photos.selected_category().await.unwrap().id, "fCup");
}

#[tokio::test]
async fn slower_category_fetch_wins_when_it_resolves_last() {
    let h = harness(true).await;
    mount_categories(&h.server).await;
    h.photos.fetch_categories().await.unwrap();

    mount_files(&h.server, IMAGES_QUERY, json!([image_json("all1")]), 0).await;
    mount_files(
        &h.server,
        &folder_images_query("fCup"),
        json!([image_json("cup1")]),
        300,
    )
    .await;

    let (all, cup) = tokio::join!(
        h.photos.fetch_all_photos(),
        h.photos.fetch_photos_by_category("fCup")
    );
    all.unwrap();
    cup.unwrap();

    assert_eq!(h.photos.photos().await[0].id, "cup1");
}

#[tokio::test]
async fn upload_into_selected_category_refreshes_photos() {
    let h = harness(true).await;
    mount_categories(&h.server).await;
    h.photos.fetch_categories().await.unwrap();
    mount_files(
        &h.server,
        &folder_images_query("fCup"),
        json!([image_json("cup1")]),
        0,
    )
    .await;
    h.photos.fetch_photos_by_category("fCup").await.unwrap();

    Mock::given(method("POST"))
        .and(path("/upload/drive/v3/files"))
        .and(query_param("uploadType", "multipart"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "new1"})))
        .expect(1)
        .mount(&h.server)
        .await;

    let data = vec![7u8; 600 * 1024];
    let file_id = h
        .photos
        .upload_photo(UploadFile::new("cup.jpg", "image/jpeg", data), Some("fCup"))
        .await
        .unwrap();

    assert_eq!(file_id.as_str(), "new1");
    let (_, status) = h.photos.latest_upload().unwrap();
    assert_eq!(status.state, UploadState::Completed);
    assert_eq!(status.progress, 100);

    let requests = h.server.received_requests().await.unwrap();
    let category_listings = requests
        .iter()
        .filter(|r| {
            r.url
                .query_pairs()
                .any(|(k, v)| k == "q" && v == folder_images_query("fCup").as_str())
        })
        .count();
    assert_eq!(category_listings, 2);
}

#[tokio::test]
async fn rejected_upload_marks_status_as_error() {
    let h = harness(true).await;

    Mock::given(method("POST"))
        .and(path("/upload/drive/v3/files"))
        .respond_with(ResponseTemplate::new(403).set_body_string("insufficient permissions"))
        .mount(&h.server)
        .await;

    let err = h
        .photos
        .upload_photo(UploadFile::new("a.jpg", "image/jpeg", vec![1; 1024]), None)
        .await
        .unwrap_err();

    assert_eq!(err.gateway_error().and_then(|e| e.status()), Some(403));
    let (_, status) = h.photos.latest_upload().unwrap();
    assert_eq!(status.state, UploadState::Error);
    assert_ne!(status.progress, 100);
    assert_eq!(h.photos.last_error().as_deref(), Some("Failed to upload photo"));
}

#[tokio::test]
async fn face_search_returns_subset_of_pool() {
    let h = harness(true).await;
    let pool: Vec<_> = (0..25).map(|i| image_json(&format!("p{i}"))).collect();
    mount_files(&h.server, IMAGES_QUERY, json!(pool), 0).await;

    let matches = h
        .photos
        .search_photos_by_face(&FaceDescriptor::neutral())
        .await
        .unwrap();

    assert!((5..=14).contains(&matches.len()));
    let mut ids: Vec<_> = matches.iter().map(|m| m.photo.id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), matches.len());
    assert_eq!(h.photos.photos().await.len(), matches.len());
}
