use pv_core::domain::entities::{Session, REQUEST_ID_KEY};
use pv_core::services::SessionStore;
use serde_json::json;
use std::time::Duration;

use crate::session::MemorySessionStore;

#[tokio::test]
async fn test_load_without_id_returns_fresh_session() {
    let store = MemorySessionStore::new();

    let first = store.load(None).await.unwrap();
    let second = store.load(None).await.unwrap();
    assert!(first.values.is_empty());
    assert_ne!(first.id, second.id);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_unknown_id_returns_fresh_session() {
    let store = MemorySessionStore::new();

    let session = store.load(Some("forged-id")).await.unwrap();
    assert_ne!(session.id, "forged-id");
    assert!(session.values.is_empty());
}

#[tokio::test]
async fn test_save_then_load() {
    let store = MemorySessionStore::new();
    let mut session = Session::new();
    session.set_request_id("req-1");

    store.save(&session).await.unwrap();
    let loaded = store.load(Some(&session.id)).await.unwrap();

    assert_eq!(loaded, session);
    assert_eq!(loaded.values.get(REQUEST_ID_KEY), Some(&json!("req-1")));
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_save_overwrites_previous_values() {
    let store = MemorySessionStore::new();
    let mut session = Session::new();
    session.set_request_id("req-1");
    store.save(&session).await.unwrap();

    session.mark_verified();
    session.clear_request_id();
    store.save(&session).await.unwrap();

    let loaded = store.load(Some(&session.id)).await.unwrap();
    assert!(loaded.is_verified());
    assert!(loaded.request_id().is_err());
    assert_eq!(store.len().await, 1);
}

#[tokio::test(start_paused = true)]
async fn test_session_expires_after_max_age() {
    let store = MemorySessionStore::new();
    let mut session = Session::new();
    session.options.max_age = 120;
    session.set_request_id("req-1");
    store.save(&session).await.unwrap();

    tokio::time::advance(Duration::from_secs(119)).await;
    let loaded = store.load(Some(&session.id)).await.unwrap();
    assert_eq!(loaded.id, session.id);

    tokio::time::advance(Duration::from_secs(2)).await;
    let expired = store.load(Some(&session.id)).await.unwrap();
    assert_ne!(expired.id, session.id);
    assert!(expired.values.is_empty());
    assert!(store.is_empty().await);
}

#[tokio::test(start_paused = true)]
async fn test_save_refreshes_expiry() {
    let store = MemorySessionStore::new();
    let session = Session::new();
    store.save(&session).await.unwrap();

    tokio::time::advance(Duration::from_secs(100)).await;
    store.save(&session).await.unwrap();
    tokio::time::advance(Duration::from_secs(100)).await;

    let loaded = store.load(Some(&session.id)).await.unwrap();
    assert_eq!(loaded.id, session.id);
}

#[tokio::test]
async fn test_save_rejects_unrepresentable_max_age() {
    let store = MemorySessionStore::new();
    let mut session = Session::new();
    session.options.max_age = u64::MAX;
    session.set_request_id("req-1");

    let err = store.save(&session).await.unwrap_err();
    assert!(err.contains("max age"));
    assert!(store.is_empty().await);
}
