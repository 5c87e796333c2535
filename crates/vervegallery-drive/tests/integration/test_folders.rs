//! Category folder lookup against a mocked Drive API

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use vervegallery_core::domain::GatewayError;
use vervegallery_core::ports::IDriveGateway;

use crate::common::{mount_first_image, mount_folder_list, setup_drive_mock};

#[tokio::test]
async fn folders_report_cover_and_count() {
    let (server, gateway) = setup_drive_mock().await;

    mount_folder_list(
        &server,
        "Verve",
        vec![("fCup", "Verve Cup 2024"), ("fEmpty", "Verve Archive")],
    )
    .await;
    mount_first_image(&server, "fCup", Some("https://lh3.googleusercontent.com/cover")).await;
    mount_first_image(&server, "fEmpty", None).await;

    let categories = gateway.list_folders_by_name("Verve").await.unwrap();

    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0].id, "fCup");
    assert_eq!(categories[0].name, "Verve Cup 2024");
    assert_eq!(categories[0].count, 1);
    assert_eq!(
        categories[0].cover_image,
        "https://lh3.googleusercontent.com/cover"
    );
    assert_eq!(categories[1].id, "fEmpty");
    assert_eq!(categories[1].count, 0);
    assert_eq!(categories[1].cover_image, "");
}

#[tokio::test]
async fn no_matching_folder_yields_empty_list() {
    let (server, gateway) = setup_drive_mock().await;

    mount_folder_list(&server, "JSS Run", vec![]).await;

    let categories = gateway.list_folders_by_name("JSS Run").await.unwrap();
    assert!(categories.is_empty());
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn pattern_quotes_are_escaped() {
    let (server, gateway) = setup_drive_mock().await;

    mount_folder_list(&server, r"Founder\'s Day", vec![("fd", "Founder's Day")]).await;
    mount_first_image(&server, "fd", None).await;

    let categories = gateway.list_folders_by_name("Founder's Day").await.unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].name, "Founder's Day");
}

#[tokio::test]
async fn failed_first_image_query_fails_the_lookup() {
    let (server, gateway) = setup_drive_mock().await;

    mount_folder_list(&server, "Rajyotsava", vec![("fR", "Rajyotsava")]).await;
    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .and(query_param("pageSize", "1"))
        .respond_with(ResponseTemplate::new(403).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let err = gateway.list_folders_by_name("Rajyotsava").await.unwrap_err();
    assert!(matches!(err, GatewayError::Fetch { status: Some(403), .. }));
}
