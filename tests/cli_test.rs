#![allow(deprecated)]

//! End-to-end tests of the `artdesk` binary
//!
//! The binary runs against a `wiremock` server with the session token kept
//! in a file, so one invocation's login is visible to the next.
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

#[test]
fn test_help_lists_commands() {
    let mut cmd = Command::cargo_bin("artdesk").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("articles"))
        .stdout(predicate::str::contains("shell"));
}

#[test]
fn test_articles_list_without_session_fails() {
    let mut cmd = Command::cargo_bin("artdesk").unwrap();
    cmd.args([
        "--token-backend",
        "memory",
        "--api-url",
        "http://127.0.0.1:9/api",
        "articles",
        "list",
    ]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let (_temp_dir, config_path) =
        common::temp_config_file("api:\n  base_url: ftp://example.com/api\n");

    let mut cmd = Command::cargo_bin("artdesk").unwrap();
    cmd.arg("--config").arg(config_path).arg("whoami");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("http or https"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_then_list_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/local"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::auth_ok("abc", "alice")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .and(header("Authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"username": "alice"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .and(header("Authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [common::wire_article(3, "Stored", "from the backend")]
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config_path = common::file_backed_config(dir.path(), &format!("{}/api", server.uri()));

    Command::cargo_bin("artdesk")
        .unwrap()
        .arg("--config")
        .arg(&config_path)
        .args(["login", "--identifier", "alice", "--password", "pw1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome, alice!"));

    let saved = std::fs::read_to_string(dir.path().join("session.json")).unwrap();
    assert!(saved.contains("abc"));

    Command::cargo_bin("artdesk")
        .unwrap()
        .arg("--config")
        .arg(&config_path)
        .args(["-q", "articles", "list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"title\": \"Stored\""));

    Command::cargo_bin("artdesk")
        .unwrap()
        .arg("--config")
        .arg(&config_path)
        .arg("logout")
        .assert()
        .success();

    let saved = std::fs::read_to_string(dir.path().join("session.json")).unwrap();
    assert!(!saved.contains("abc"));
}
