//! Integration tests for the `dnp` CLI binary.
//!
//! The first group validates argument parsing, help output, shell
//! completions and error handling without any backend. The second group
//! runs the binary against a wiremock backend.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `dnp` binary with env isolation.
///
/// Clears all `DNP_*` env vars and points config and data directories at
/// `home` so tests never touch the user's real configuration.
fn dnp_cmd_in(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("dnp");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env("NO_COLOR", "1")
        .env_remove("DNP_PROFILE")
        .env_remove("DNP_URL")
        .env_remove("DNP_TOKEN")
        .env_remove("DNP_OUTPUT")
        .env_remove("DNP_INSECURE")
        .env_remove("DNP_TIMEOUT")
        .env_remove("DNP_EMAIL")
        .env_remove("DNP_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

fn dnp_cmd() -> assert_cmd::Command {
    dnp_cmd_in(Path::new("/tmp/dnp-cli-test-nonexistent"))
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = dnp_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    dnp_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("do-not-play")
            .and(predicate::str::contains("blocklist"))
            .and(predicate::str::contains("categories"))
            .and(predicate::str::contains("exceptions")),
    );
}

#[test]
fn test_version_flag() {
    dnp_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("dnp"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    dnp_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    dnp_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_fish() {
    dnp_cmd()
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::contains("complete"));
}

// ── Error handling ──────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = dnp_cmd().arg("nonexistent-command").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized subcommand"),
        "Expected clap error in output:\n{text}"
    );
}

#[test]
fn test_blocklist_without_config_points_at_init() {
    let output = dnp_cmd().args(["blocklist", "list"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let text = combined_output(&output);
    assert!(text.contains("dnp config init"), "missing hint:\n{text}");
}

#[test]
fn test_url_without_token_is_an_auth_error() {
    let output = dnp_cmd()
        .args(["--url", "https://dnp.example.com", "blocklist", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("No credentials"));
}

#[test]
fn test_config_show_no_config() {
    dnp_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[defaults]"));
}

#[test]
fn test_invalid_output_format() {
    let output = dnp_cmd()
        .args(["--output", "xml", "blocklist", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("invalid value"));
}

#[test]
fn test_invalid_severity_is_rejected_by_the_parser() {
    let output = dnp_cmd()
        .args([
            "offenses", "report", "--artist", "a1", "--category", "fraud", "--severity",
            "awful", "--title", "t",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_global_flags_parsing() {
    // Flags parse; the command then fails for lack of a backend, not on usage.
    let output = dnp_cmd()
        .args([
            "-o", "json", "-q", "-y", "-k", "--timeout", "5", "-p", "home", "blocklist",
            "list",
        ])
        .output()
        .unwrap();
    assert_ne!(output.status.code(), Some(2));
}

#[test]
fn test_blocklist_subcommands_exist() {
    dnp_cmd()
        .args(["blocklist", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("effective"))
                .and(predicate::str::contains("add"))
                .and(predicate::str::contains("remove"))
                .and(predicate::str::contains("update")),
        );
}

#[test]
fn test_config_subcommands_exist() {
    dnp_cmd()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("init")
                .and(predicate::str::contains("show"))
                .and(predicate::str::contains("profiles"))
                .and(predicate::str::contains("set-token")),
        );
}

// ── Against a backend ───────────────────────────────────────────────

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data }))
}

async fn mount_get(server: &MockServer, route: &str, data: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/{route}")))
        .respond_with(ok(data))
        .mount(server)
        .await;
}

/// Alpha on the DNP list; Bravo and Charlie via the subscribed Violence
/// category.
async fn backend() -> MockServer {
    let server = MockServer::start().await;
    mount_get(
        &server,
        "auth/me",
        json!({ "id": "u1", "email": "me@example.com", "display_name": "Me" }),
    )
    .await;
    mount_get(
        &server,
        "dnp/list",
        json!([{
            "artist_id": "a1",
            "artist_name": "Alpha",
            "tags": ["loud"],
            "created_at": "2026-01-01T00:00:00Z"
        }]),
    )
    .await;
    mount_get(
        &server,
        "categories",
        json!([{ "id": "c1", "name": "Violence", "artist_count": 2, "subscribed": true }]),
    )
    .await;
    mount_get(
        &server,
        "categories/c1/artists",
        json!([
            { "id": "a2", "canonical_name": "Bravo" },
            { "id": "a3", "canonical_name": "Charlie" }
        ]),
    )
    .await;
    mount_get(&server, "connections", json!([])).await;
    mount_get(&server, "sync/status", json!([])).await;
    mount_get(&server, "sync/runs", json!([])).await;
    server
}

fn backend_cmd(server: &MockServer, home: &Path, args: &[&str]) -> assert_cmd::Command {
    let mut cmd = dnp_cmd_in(home);
    cmd.args(["--url", &server.uri(), "--token", "test-token"])
        .args(args);
    cmd
}

#[tokio::test(flavor = "multi_thread")]
async fn blocklist_list_renders_json() {
    let server = backend().await;
    let home = tempfile::tempdir().unwrap();

    let output = run(backend_cmd(&server, home.path(), &["-o", "json", "blocklist", "list"])).await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(entries[0]["artist_name"], "Alpha");
    assert_eq!(entries[0]["tags"], json!(["loud"]));
}

#[tokio::test(flavor = "multi_thread")]
async fn exceptions_persist_between_invocations() {
    let server = backend().await;
    let home = tempfile::tempdir().unwrap();

    let output = run(backend_cmd(
        &server,
        home.path(),
        &["-o", "plain", "blocklist", "effective"],
    ))
    .await;
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "a1\na2\na3");

    let output = run(backend_cmd(&server, home.path(), &["-q", "exceptions", "add", "a2"])).await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let output = run(backend_cmd(
        &server,
        home.path(),
        &["-o", "plain", "blocklist", "effective"],
    ))
    .await;
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "a1\na3");

    let stored = std::fs::read_to_string(
        home.path()
            .join("data")
            .join("dnp")
            .join("default")
            .join("exceptions.json"),
    )
    .unwrap();
    let stored: Vec<String> = serde_json::from_str(&stored).unwrap();
    assert_eq!(stored, vec!["a2".to_string()]);
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_token_exits_with_auth_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let home = tempfile::tempdir().unwrap();

    let output = run(backend_cmd(&server, home.path(), &["blocklist", "list"])).await;
    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("dnp auth login"));
}

#[tokio::test(flavor = "multi_thread")]
async fn report_without_evidence_never_reaches_the_backend() {
    let server = backend().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/offenses"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    let home = tempfile::tempdir().unwrap();

    let output = run(backend_cmd(
        &server,
        home.path(),
        &[
            "offenses", "report", "--artist", "a1", "--category", "fraud", "--severity",
            "severe", "--title", "Tax fraud",
        ],
    ))
    .await;
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("evidence"));
}

#[tokio::test(flavor = "multi_thread")]
async fn whoami_prints_the_account() {
    let server = backend().await;
    let home = tempfile::tempdir().unwrap();

    let output = run(backend_cmd(&server, home.path(), &["-o", "plain", "auth", "whoami"])).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "me@example.com");
}
