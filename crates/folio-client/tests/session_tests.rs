//! Session tests against a real Folio server bound on an ephemeral port.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::net::TcpListener;

use folio_client::{ClientConfig, ClientError, PortfolioClient, PortfolioSession, SessionPhase};
use folio_core::defaults::default_document;
use folio_core::document::PortfolioDocument;
use folio_core::repository::PORTFOLIO_ID;
use folio_server::build_router;
use folio_server::config::ServerConfig;
use folio_server::state::AppState;
use folio_storage::{DocumentStore, MemoryStore};

async fn spawn_server(store: MemoryStore) -> String {
    let config = ServerConfig::from_lookup(|name| match name {
        "FOLIO_TOKEN_SECRET" => Some("session-test-secret".to_owned()),
        "FOLIO_STORAGE" => Some("memory".to_owned()),
        _ => None,
    })
    .unwrap();
    let state = Arc::new(AppState::new(Arc::new(store), &config));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, build_router(state)).await.ok();
    });
    format!("http://{addr}")
}

async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

fn client_for(base_url: &str) -> PortfolioClient {
    PortfolioClient::with_config(&ClientConfig {
        base_url: base_url.to_owned(),
        ..ClientConfig::default()
    })
    .unwrap()
}

async fn session_for(base_url: &str) -> PortfolioSession {
    let session = PortfolioSession::new(client_for(base_url));
    session.load().await.unwrap();
    session
}

#[tokio::test]
async fn load_on_empty_store_keeps_defaults_and_becomes_ready() {
    let url = spawn_server(MemoryStore::new()).await;
    let session = session_for(&url).await;

    assert_eq!(session.phase().await, SessionPhase::Ready);
    assert!(!session.is_authenticated().await);
    assert_eq!(session.data().await, default_document());
}

#[tokio::test]
async fn load_merges_stored_sections_over_defaults() {
    let store = MemoryStore::new();
    let body = json!({"personal": {"name": "Stored"}, "theme": "dark"});
    store
        .replace(PORTFOLIO_ID, body.as_object().unwrap().clone())
        .await
        .unwrap();
    let url = spawn_server(store).await;

    let data = session_for(&url).await.data().await;
    let personal = data.personal.unwrap();
    assert_eq!(personal.name.as_deref(), Some("Stored"));
    assert_eq!(personal.title, None, "sections are replaced, not deep-merged");
    assert_eq!(data.projects, default_document().projects);
    assert_eq!(data.extra.get("theme"), Some(&json!("dark")));
}

#[tokio::test]
async fn failed_load_is_ready_on_defaults_and_reports_error() {
    let session = PortfolioSession::new(client_for(&unreachable_url().await));

    let err = session.load().await.unwrap_err();
    assert!(matches!(err, ClientError::Network(_) | ClientError::Timeout));
    assert_eq!(session.phase().await, SessionPhase::Ready);
    assert_eq!(session.data().await, default_document());

    session.load().await.unwrap();
}

#[tokio::test]
async fn phase_is_loading_while_initial_fetch_is_in_flight() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let client = PortfolioClient::with_config(&ClientConfig {
        base_url: format!("http://{addr}"),
        timeout: Duration::from_millis(500),
    })
    .unwrap();
    let session = Arc::new(PortfolioSession::new(client));

    let loading = Arc::clone(&session);
    let load = tokio::spawn(async move { loading.load().await });
    tokio::time::sleep(Duration::from_millis(100)).await;

    let phase = tokio::time::timeout(Duration::from_millis(100), session.phase())
        .await
        .unwrap();
    assert_eq!(phase, SessionPhase::Loading);
    assert_eq!(session.data().await, default_document());

    assert!(load.await.unwrap().is_err());
    assert_eq!(session.phase().await, SessionPhase::Ready);
}

#[tokio::test]
async fn fetch_raw_returns_body_exactly_as_stored() {
    let store = MemoryStore::new();
    let body = json!({"personal": {"name": null}, "skills": "legacy text"});
    store
        .replace(PORTFOLIO_ID, body.as_object().unwrap().clone())
        .await
        .unwrap();
    let url = spawn_server(store).await;

    let fetched = client_for(&url).fetch_raw().await.unwrap().unwrap();
    assert_eq!(serde_json::Value::Object(fetched), body);
}

#[tokio::test]
async fn load_keeps_fractional_skill_levels() {
    let store = MemoryStore::new();
    let body = json!({"skills": [{"category": "Lang", "items": [{"name": "Rust", "level": 72.5}]}]});
    store
        .replace(PORTFOLIO_ID, body.as_object().unwrap().clone())
        .await
        .unwrap();
    let url = spawn_server(store).await;

    let data = session_for(&url).await.data().await;
    let skills = serde_json::to_value(data.skills.unwrap()).unwrap();
    assert_eq!(skills, body["skills"]);
}

#[tokio::test]
async fn login_edit_save_round_trips_through_server() {
    let url = spawn_server(MemoryStore::new()).await;
    let session = session_for(&url).await;

    session.login("admin123").await.unwrap();
    assert!(session.is_authenticated().await);

    session
        .update_nested_field("personal", "name", json!("Ada"))
        .await
        .unwrap();
    session
        .update_section("services", json!([{"id": 1, "title": "Consulting"}]))
        .await
        .unwrap();
    session.save().await.unwrap();

    let stored = client_for(&url).fetch().await.unwrap().unwrap();
    assert_eq!(stored, session.data().await);
    assert_eq!(
        stored.personal.unwrap().name.as_deref(),
        Some("Ada")
    );
}

#[tokio::test]
async fn failed_login_leaves_session_logged_out() {
    let url = spawn_server(MemoryStore::new()).await;
    let session = session_for(&url).await;

    let err = session.login("wrong").await.unwrap_err();
    assert!(matches!(err, ClientError::Auth { status_code: 403, .. }));
    assert!(!session.is_authenticated().await);
}

#[tokio::test]
async fn logout_is_local_and_blocks_saving() {
    let url = spawn_server(MemoryStore::new()).await;
    let session = session_for(&url).await;
    session.login("admin123").await.unwrap();

    session.logout().await;
    assert!(!session.is_authenticated().await);
    assert!(matches!(session.save().await, Err(ClientError::NotAuthenticated)));
    assert!(client_for(&url).fetch().await.unwrap().is_none());
}

#[tokio::test]
async fn change_password_persists_override_and_relogs_in() {
    let url = spawn_server(MemoryStore::new()).await;
    let session = session_for(&url).await;
    session.login("admin123").await.unwrap();

    session.change_password("s3cure", "s3cure").await.unwrap();

    let stored = client_for(&url).fetch().await.unwrap().unwrap();
    assert_eq!(stored.credential_override(), Some("s3cure"));

    session
        .update_nested_field("personal", "name", json!("After change"))
        .await
        .unwrap();
    session.save().await.unwrap();

    let client = client_for(&url);
    assert!(matches!(
        client.login("admin123").await,
        Err(ClientError::Auth { .. })
    ));
    client.login("s3cure").await.unwrap();
}

#[tokio::test]
async fn change_password_rules_are_checked_before_sending() {
    let url = spawn_server(MemoryStore::new()).await;
    let session = session_for(&url).await;
    session.login("admin123").await.unwrap();

    for (new, confirm) in [("", ""), ("abc", "abc"), ("abcd", "abcx")] {
        let err = session.change_password(new, confirm).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)), "{new:?}/{confirm:?}");
    }
    assert!(client_for(&url).fetch().await.unwrap().is_none());
}

#[tokio::test]
async fn stale_token_fails_after_credential_changes_elsewhere() {
    let url = spawn_server(MemoryStore::new()).await;
    let first = session_for(&url).await;
    let second = session_for(&url).await;
    first.login("admin123").await.unwrap();
    second.login("admin123").await.unwrap();

    first.change_password("rotated", "rotated").await.unwrap();

    let err = second.save().await.unwrap_err();
    assert!(matches!(err, ClientError::Auth { status_code: 403, .. }));
}

#[tokio::test]
async fn set_form_key_saves_immediately() {
    let url = spawn_server(MemoryStore::new()).await;
    let session = session_for(&url).await;
    session.login("admin123").await.unwrap();

    session.set_form_key("relay-key-123").await.unwrap();

    let stored = client_for(&url).fetch().await.unwrap().unwrap();
    assert_eq!(stored.web3forms_key.as_deref(), Some("relay-key-123"));
}

#[tokio::test]
async fn reset_when_logged_in_saves_defaults_and_keeps_credential() {
    let url = spawn_server(MemoryStore::new()).await;
    let session = session_for(&url).await;
    session.login("admin123").await.unwrap();
    session.change_password("kept-pass", "kept-pass").await.unwrap();
    session
        .update_nested_field("personal", "name", json!("Temporary"))
        .await
        .unwrap();
    session.save().await.unwrap();

    session.reset_to_defaults().await.unwrap();

    let stored = client_for(&url).fetch().await.unwrap().unwrap();
    let expected = PortfolioDocument {
        admin_password: Some("kept-pass".to_owned()),
        ..default_document()
    };
    assert_eq!(stored, expected);
    session.save().await.unwrap();
}

#[tokio::test]
async fn probe_reports_memory_backend() {
    let url = spawn_server(MemoryStore::new()).await;
    let report = client_for(&url).probe().await.unwrap();
    assert_eq!(report.backend, "memory");
    assert_eq!(report.connection, "SUCCESS");
    assert!(report.document.starts_with("NOT FOUND"));
}
