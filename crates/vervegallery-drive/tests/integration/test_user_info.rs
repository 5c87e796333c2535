//! Userinfo lookup against a mocked endpoint

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vervegallery_drive::auth::fetch_user_profile;

#[tokio::test]
async fn profile_is_fetched_with_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/oauth2/v3/userinfo"))
        .and(header("authorization", "Bearer ya29.profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "sub": "1234567890",
            "name": "Test User",
            "email": "test@example.com",
            "picture": "https://lh3.googleusercontent.com/a/test"
        })))
        .mount(&server)
        .await;

    let url = format!("{}/oauth2/v3/userinfo", server.uri());
    let profile = fetch_user_profile(&reqwest::Client::new(), &url, "ya29.profile")
        .await
        .unwrap();

    assert_eq!(profile.id, "1234567890");
    assert_eq!(profile.name, "Test User");
    assert_eq!(profile.email, "test@example.com");
    assert_eq!(profile.photo_url, "https://lh3.googleusercontent.com/a/test");
}

#[tokio::test]
async fn rejected_token_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/oauth2/v3/userinfo"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let url = format!("{}/oauth2/v3/userinfo", server.uri());
    let result = fetch_user_profile(&reqwest::Client::new(), &url, "expired").await;
    assert!(result.is_err());
}
