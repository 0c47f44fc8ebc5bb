//! End-to-end CLI tests for the jsonstream binary.

#![allow(deprecated)]

mod support;
use support::stream_server::{Action, CHUNKED_OK_HEAD, StreamServer};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Binary with an empty config home so a developer's own config is never read.
fn jsonstream(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("jsonstream").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_binary_help_displays_usage() {
    let home = TempDir::new().unwrap();
    jsonstream(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("chunked HTTP stream"));
}

#[test]
fn test_binary_version_displays_version() {
    let home = TempDir::new().unwrap();
    jsonstream(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("jsonstream"));
}

#[test]
fn test_binary_requires_url() {
    let home = TempDir::new().unwrap();
    jsonstream(&home)
        .assert()
        .failure()
        .stderr(predicate::str::contains("<URL>"));
}

#[test]
fn test_binary_rejects_https_url() {
    let home = TempDir::new().unwrap();
    jsonstream(&home)
        .arg("-q")
        .arg("https://stream.example.com/1.1/statuses/sample.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("only http is supported"));
}

#[test]
fn test_binary_reports_invalid_config_file() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("bad.toml");
    std::fs::write(&config, "poll_interval_ms = fast\n").unwrap();
    jsonstream(&home)
        .arg("--config")
        .arg(&config)
        .arg("http://127.0.0.1:9/")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[test]
fn test_binary_prints_json_lines_until_hangup() {
    let Some(server) = StreamServer::start(vec![
        Action::send(CHUNKED_OK_HEAD),
        Action::chunk(b"{\"id\":1}\r\n"),
        Action::chunk(b"\n"),
        Action::chunk(b"{\"id\":2,\"text\":\"two\"}\r\n"),
        Action::send(b"0\r\n\r\n"),
    ]) else {
        return;
    };

    let home = TempDir::new().unwrap();
    jsonstream(&home)
        .arg("-q")
        .arg(server.url("/1.1/statuses/sample.json"))
        .assert()
        .success()
        .stdout("{\"id\":1}\n{\"id\":2,\"text\":\"two\"}\n{\"hangup\":true}\n");
}

#[test]
fn test_binary_max_events_and_headers() {
    let Some(server) = StreamServer::start(vec![
        Action::send(CHUNKED_OK_HEAD),
        Action::chunk(b"{\"id\":1}\r\n{\"id\":2}\r\n"),
    ]) else {
        return;
    };

    let home = TempDir::new().unwrap();
    let output = jsonstream(&home)
        .args(["-q", "--include-headers", "-n", "1"])
        .arg(server.url("/"))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let text = String::from_utf8(output).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 1, "{text}");
    let line: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(line["data"], serde_json::json!({"id": 1}));
    assert_eq!(line["headers"]["x-stream-id"], "42");
}

#[test]
fn test_binary_reads_defaults_from_config_home() {
    let Some(server) = StreamServer::start(vec![
        Action::send(CHUNKED_OK_HEAD),
        Action::chunk(b"{\"id\":7}\r\n"),
    ]) else {
        return;
    };

    let home = TempDir::new().unwrap();
    std::fs::create_dir_all(home.path().join("jsonstream")).unwrap();
    std::fs::write(
        home.path().join("jsonstream").join("config.toml"),
        "include_headers = true\nverbosity = \"quiet\"\n",
    )
    .unwrap();

    jsonstream(&home)
        .arg(server.url("/"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"data\":{\"id\":7}"))
        .stdout(predicate::str::contains("\"hangup\":true"));
}

#[test]
fn test_binary_error_status_exits_nonzero() {
    let Some(server) = StreamServer::start(vec![Action::send(
        b"HTTP/1.1 401 Unauthorized\r\nContent-Length: 0\r\n\r\n",
    )]) else {
        return;
    };

    let home = TempDir::new().unwrap();
    jsonstream(&home)
        .arg("-q")
        .arg(server.url("/"))
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("HTTP 401"));
}
