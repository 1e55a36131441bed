//! Integration tests for the `folio` CLI binary.
//!
//! These tests run the CLI as a subprocess. Offline tests point it at a port
//! nothing listens on; the rest start an in-memory Folio server in the test
//! process and drive it through the binary.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::process::Command;

use folio_core::repository::PORTFOLIO_ID;
use folio_server::build_router;
use folio_server::config::ServerConfig;
use folio_server::state::AppState;
use folio_storage::{DocumentStore, MemoryStore};

const OFFLINE_URL: &str = "http://127.0.0.1:19998";

/// Helper: locate the `folio` binary built by `cargo test`.
fn folio_bin() -> String {
    let path = env!("CARGO_BIN_EXE_folio");
    assert!(Path::new(path).exists(), "folio binary not found at {path}");
    path.to_owned()
}

/// Helper: run folio against `url` and return (`exit_code`, stdout, stderr).
async fn run_at(url: &str, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(folio_bin())
        .args(args)
        .env("FOLIO_URL", url)
        .env_remove("FOLIO_ADMIN_PASSWORD")
        .output()
        .await
        .expect("failed to execute folio");

    let code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (code, stdout, stderr)
}

async fn spawn_server(store: MemoryStore) -> String {
    let config = ServerConfig::from_lookup(|name| match name {
        "FOLIO_TOKEN_SECRET" => Some("cli-test-secret".to_owned()),
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

async fn stored(store: &MemoryStore) -> Option<Value> {
    store
        .find(PORTFOLIO_ID)
        .await
        .unwrap()
        .map(Value::Object)
}

// ── Version & help ───────────────────────────────────────────────────

#[tokio::test]
async fn test_version_flag() {
    let (code, stdout, _) = run_at(OFFLINE_URL, &["--version"]).await;
    assert_eq!(code, 0, "folio --version should exit 0");
    assert!(stdout.contains("folio"), "version output should contain 'folio': {stdout}");
}

#[tokio::test]
async fn test_help_lists_commands() {
    let (code, stdout, _) = run_at(OFFLINE_URL, &["--help"]).await;
    assert_eq!(code, 0);
    assert!(stdout.contains("Folio CLI"), "help should mention Folio CLI");
    for command in [
        "fetch",
        "login",
        "save",
        "export",
        "reset",
        "set-password",
        "set-form-key",
        "probe",
    ] {
        assert!(stdout.contains(command), "help should list '{command}'");
    }
}

// ── Offline failures ─────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_unreachable_server_fails() {
    let (code, _, stderr) = run_at(OFFLINE_URL, &["fetch"]).await;
    assert_ne!(code, 0);
    assert!(stderr.contains("Error"), "should report error: {stderr}");
}

#[tokio::test]
async fn test_write_commands_require_password() {
    for args in [
        vec!["login"],
        vec!["reset"],
        vec!["set-form-key", "k"],
        vec!["set-password", "abcd", "abcd"],
    ] {
        let (code, _, stderr) = run_at(OFFLINE_URL, &args).await;
        assert_ne!(code, 0, "{args:?} should fail without a password");
        assert!(
            stderr.contains("missing admin password"),
            "{args:?} should ask for a password: {stderr}"
        );
    }
}

#[tokio::test]
async fn test_save_missing_file() {
    let (code, _, stderr) =
        run_at(OFFLINE_URL, &["save", "/tmp/folio-test-nonexistent.json", "--password", "x"]).await;
    assert_ne!(code, 0);
    assert!(stderr.contains("not found"), "should report missing file: {stderr}");
}

#[tokio::test]
async fn test_save_rejects_invalid_document_before_connecting() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("bad.json");
    fs::write(&path, r#"{"skills": "not a list"}"#).expect("write failed");

    let (code, _, stderr) =
        run_at(OFFLINE_URL, &["save", path.to_str().unwrap(), "--password", "x"]).await;
    assert_ne!(code, 0);
    assert!(
        stderr.contains("not a valid portfolio document"),
        "should reject document: {stderr}"
    );
}

// ── Against a live in-memory server ──────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_empty_store() {
    let url = spawn_server(MemoryStore::new()).await;
    let (code, stdout, _) = run_at(&url, &["fetch"]).await;
    assert_eq!(code, 0);
    assert!(stdout.contains("no portfolio saved yet"), "{stdout}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_prints_stored_body_verbatim() {
    let store = MemoryStore::new();
    let body = json!({"skills": "legacy text", "about": null});
    store
        .replace(PORTFOLIO_ID, body.as_object().unwrap().clone())
        .await
        .unwrap();
    let url = spawn_server(store).await;

    let (code, stdout, stderr) = run_at(&url, &["fetch"]).await;
    assert_eq!(code, 0, "fetch failed: {stderr}");
    let fetched: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(fetched, body);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_accepts_and_rejects() {
    let url = spawn_server(MemoryStore::new()).await;

    let (code, stdout, _) = run_at(&url, &["login", "--password", "admin123"]).await;
    assert_eq!(code, 0);
    assert!(stdout.contains("password accepted"));

    let (code, _, stderr) = run_at(&url, &["login", "--password", "wrong"]).await;
    assert_ne!(code, 0);
    assert!(stderr.contains("login failed"), "{stderr}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_save_then_fetch_and_export() {
    let store = MemoryStore::new();
    let url = spawn_server(store.clone()).await;
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let input = dir.path().join("portfolio.json");
    fs::write(&input, json!({"personal": {"name": "Ada"}}).to_string()).expect("write failed");

    let (code, _, stderr) =
        run_at(&url, &["save", input.to_str().unwrap(), "--password", "admin123"]).await;
    assert_eq!(code, 0, "save failed: {stderr}");
    assert_eq!(
        stored(&store).await.unwrap()["personal"]["name"],
        "Ada"
    );

    let (code, stdout, _) = run_at(&url, &["fetch"]).await;
    assert_eq!(code, 0);
    let fetched: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(fetched, json!({"personal": {"name": "Ada"}}));

    let output = dir.path().join("export.json");
    let (code, _, _) = run_at(&url, &["export", "--output", output.to_str().unwrap()]).await;
    assert_eq!(code, 0);
    let exported: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(exported["personal"], json!({"name": "Ada"}));
    assert!(exported.get("projects").is_some(), "export includes default sections");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_set_password_then_old_password_fails() {
    let store = MemoryStore::new();
    let url = spawn_server(store.clone()).await;

    let (code, _, stderr) = run_at(
        &url,
        &["set-password", "n3w-pass", "n3w-pass", "--password", "admin123"],
    )
    .await;
    assert_eq!(code, 0, "set-password failed: {stderr}");
    assert_eq!(stored(&store).await.unwrap()["adminPassword"], "n3w-pass");

    let (code, _, _) = run_at(&url, &["login", "--password", "admin123"]).await;
    assert_ne!(code, 0);
    let (code, _, _) = run_at(&url, &["login", "--password", "n3w-pass"]).await;
    assert_eq!(code, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_set_password_rules() {
    let store = MemoryStore::new();
    let url = spawn_server(store.clone()).await;

    let (code, _, stderr) =
        run_at(&url, &["set-password", "abc", "abc", "--password", "admin123"]).await;
    assert_ne!(code, 0);
    assert!(stderr.contains("at least 4"), "{stderr}");
    assert!(stored(&store).await.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_save_keeps_existing_password_override() {
    let store = MemoryStore::new();
    let url = spawn_server(store.clone()).await;
    run_at(&url, &["set-password", "kept", "kept", "--password", "admin123"]).await;

    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let input = dir.path().join("portfolio.json");
    fs::write(&input, json!({"personal": {"name": "Ada"}}).to_string()).expect("write failed");

    let (code, _, stderr) =
        run_at(&url, &["save", input.to_str().unwrap(), "--password", "kept"]).await;
    assert_eq!(code, 0, "save failed: {stderr}");
    assert_eq!(stored(&store).await.unwrap()["adminPassword"], "kept");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_set_form_key_and_reset() {
    let store = MemoryStore::new();
    let url = spawn_server(store.clone()).await;

    let (code, _, _) = run_at(&url, &["set-form-key", "relay-1", "--password", "admin123"]).await;
    assert_eq!(code, 0);
    assert_eq!(stored(&store).await.unwrap()["web3formsKey"], "relay-1");

    let (code, _, _) = run_at(&url, &["reset", "--password", "admin123"]).await;
    assert_eq!(code, 0);
    assert_eq!(stored(&store).await.unwrap()["web3formsKey"], "");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_probe_prints_diagnostics() {
    let url = spawn_server(MemoryStore::new()).await;
    let (code, stdout, _) = run_at(&url, &["probe"]).await;
    assert_eq!(code, 0);
    assert!(stdout.contains("Folio Diagnostics"));
    assert!(stdout.contains("memory"));
    assert!(stdout.contains("SUCCESS"));
}
