//! AuthStore with file-backed session storage

use std::sync::Arc;

use vervegallery_core::ports::{IAccessTokenSource, ISessionStorage};
use vervegallery_store::{AuthStore, FileSessionStorage, SESSION_KEY};

use crate::common::{profile, ScriptedIdentity, ACCESS_TOKEN};

#[tokio::test]
async fn session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let identity = Arc::new(ScriptedIdentity::default());

    let first = AuthStore::new(identity.clone(), Arc::new(FileSessionStorage::new(&path)));
    first.sign_in().await.unwrap();
    assert!(path.exists());

    let second = AuthStore::new(identity, Arc::new(FileSessionStorage::new(&path)));
    assert!(second.init_auth().await.unwrap());
    assert_eq!(second.user().await, Some(profile()));
    assert_eq!(second.access_token().await.as_deref(), Some(ACCESS_TOKEN));
}

#[tokio::test]
async fn malformed_record_is_removed_on_init() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let storage = Arc::new(FileSessionStorage::new(&path));
    storage.set(SESSION_KEY, "{\"id\": 7,").await.unwrap();
    storage.set("unrelated", "kept").await.unwrap();

    let store = AuthStore::new(
        Arc::new(ScriptedIdentity::with_cached_token()),
        storage.clone(),
    );

    assert!(!store.init_auth().await.unwrap());
    assert!(!store.is_authenticated().await);
    assert!(store.user().await.is_none());
    assert!(store.last_error().is_none());
    assert_eq!(storage.get(SESSION_KEY).await.unwrap(), None);
    assert_eq!(storage.get("unrelated").await.unwrap().as_deref(), Some("kept"));
}

#[tokio::test]
async fn corrupt_session_file_does_not_block_sign_in() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "not a json object").unwrap();

    let storage = Arc::new(FileSessionStorage::new(&path));
    let store = AuthStore::new(Arc::new(ScriptedIdentity::default()), storage.clone());

    assert!(!store.init_auth().await.unwrap());
    assert_eq!(store.last_error(), None);
    assert!(!store.is_authenticated().await);

    store.sign_in().await.unwrap();
    assert!(store.is_authenticated().await);
    assert!(storage.get(SESSION_KEY).await.unwrap().is_some());
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(serde_json::from_str::<serde_json::Value>(&content).is_ok());
}

#[tokio::test]
async fn sign_out_removes_record_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let storage = Arc::new(FileSessionStorage::new(&path));
    let store = AuthStore::new(Arc::new(ScriptedIdentity::default()), storage.clone());

    store.sign_in().await.unwrap();
    store.sign_out().await.unwrap();

    assert_eq!(storage.get(SESSION_KEY).await.unwrap(), None);
    let reopened = AuthStore::new(
        Arc::new(ScriptedIdentity::with_cached_token()),
        Arc::new(FileSessionStorage::new(&path)),
    );
    assert!(!reopened.init_auth().await.unwrap());
}
