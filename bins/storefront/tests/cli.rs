use assert_cmd::Command;
use predicates::prelude::*;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::thread::{self, JoinHandle};

const ENV_VARS: &[&str] = &[
    "STOREFRONT_API_URL",
    "STOREFRONT_AUTH_URL",
    "STOREFRONT_LOGIN_PATH",
    "STOREFRONT_ACCESS_TOKEN",
    "STOREFRONT_TIMEOUT_SECS",
    "STOREFRONT_RESPONSE_TYPE",
    "STOREFRONT_ENV",
    "STOREFRONT_SESSION_FILE",
    "STOREFRONT_LOGIN_TOKEN",
    "RUST_LOG",
];

fn storefront(session_file: &Path) -> Command {
    let mut cmd = Command::cargo_bin("storefront").unwrap();
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.arg("--session-file").arg(session_file);
    cmd
}

/// Answer a single connection with `raw`; returns the base URL
fn serve_once(raw: &'static str) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut seen = Vec::new();
        let mut buf = [0u8; 1024];
        while !seen.windows(4).any(|w| w == b"\r\n\r\n") {
            match stream.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => seen.extend_from_slice(&buf[..n]),
            }
        }
        stream.write_all(raw.as_bytes()).unwrap();
    });
    (url, handle)
}

#[test]
fn test_help() {
    Command::cargo_bin("storefront")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("request"))
        .stdout(predicate::str::contains("logout"));
}

#[test]
fn test_config_requires_api_url() {
    let dir = tempfile::tempdir().unwrap();
    storefront(&dir.path().join("session.json"))
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("STOREFRONT_API_URL"));
}

#[test]
fn test_config_shows_resolved_urls() {
    let dir = tempfile::tempdir().unwrap();
    storefront(&dir.path().join("session.json"))
        .env("STOREFRONT_API_URL", "https://api.shop.test/v1")
        .env("STOREFRONT_AUTH_URL", "https://auth.shop.test")
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("https://api.shop.test/v1/"))
        .stdout(predicate::str::contains("https://auth.shop.test/login"));
}

#[test]
fn test_login_then_logout() {
    let dir = tempfile::tempdir().unwrap();
    let session_file = dir.path().join("session.json");

    storefront(&session_file)
        .args(["login", "--token", "tok-123"])
        .assert()
        .success();
    assert!(session_file.exists());

    storefront(&session_file)
        .env("STOREFRONT_API_URL", "https://api.shop.test")
        .args(["--format", "json", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"accessToken\": \"set\""))
        .stdout(predicate::str::contains("tok-123").not());

    storefront(&session_file)
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out"));
    assert!(!session_file.exists());

    storefront(&session_file)
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("No stored session"));
}

#[test]
fn test_unreachable_server_yields_sentinel() {
    let dir = tempfile::tempdir().unwrap();
    storefront(&dir.path().join("session.json"))
        .env("STOREFRONT_API_URL", "http://127.0.0.1:9")
        .env("STOREFRONT_TIMEOUT_SECS", "5")
        .args(["--format", "json", "request", "get", "products"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("UNEXPECTED_SERVER_ERROR"));
}

#[test]
fn test_401_removes_stored_session() {
    let dir = tempfile::tempdir().unwrap();
    let session_file = dir.path().join("session.json");
    storefront(&session_file)
        .args(["login", "--token", "expired"])
        .assert()
        .success();

    let (url, server) = serve_once(
        "HTTP/1.1 401 Unauthorized\r\nContent-Type: application/json\r\n\
         Content-Length: 24\r\nConnection: close\r\n\r\n{\"code\":\"TOKEN_EXPIRED\"}",
    );

    storefront(&session_file)
        .env("STOREFRONT_API_URL", &url)
        .args(["--format", "json", "request", "get", "orders"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("TOKEN_EXPIRED"))
        .stderr(predicate::str::contains("Signed out"));
    server.join().unwrap();

    assert!(!session_file.exists());
}

#[test]
fn test_403_prints_reauth_url_and_keeps_session() {
    let dir = tempfile::tempdir().unwrap();
    let session_file = dir.path().join("session.json");
    storefront(&session_file)
        .args(["login", "--token", "limited"])
        .assert()
        .success();

    let (url, server) = serve_once(
        "HTTP/1.1 403 Forbidden\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
    );

    storefront(&session_file)
        .env("STOREFRONT_API_URL", &url)
        .env("STOREFRONT_AUTH_URL", "https://auth.shop.test")
        .args(["request", "get", "account"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("UNEXPECTED_SERVER_ERROR"))
        .stderr(predicate::str::contains("https://auth.shop.test/login"));
    server.join().unwrap();

    assert!(session_file.exists());
}
