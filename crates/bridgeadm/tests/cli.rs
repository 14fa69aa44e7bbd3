use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn bridgeadm() -> Command {
    let mut cmd = Command::cargo_bin("bridgeadm").unwrap();
    cmd.env_remove("BRIDGEADM_TOKEN")
        .env_remove("BRIDGEADM_HOMESERVER")
        .env_remove("RUST_LOG");
    cmd
}

fn registration(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_help_lists_commands() {
    bridgeadm()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("grant-ops"))
        .stdout(predicate::str::contains("migrate-users"))
        .stdout(predicate::str::contains("remove-idle-users"))
        .stdout(predicate::str::contains("remove-user"))
        .stdout(predicate::str::contains("parse-user"));
}

#[test]
fn test_parse_user_extracts_nick() {
    bridgeadm()
        .args([
            "--no-color",
            "parse-user",
            "--server",
            "irc.freenode.net",
            "--homeserver-domain",
            "matrix.org",
            "@irc.freenode.net_alice:matrix.org",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "@irc.freenode.net_alice:matrix.org -> alice",
        ));
}

#[test]
fn test_parse_user_fails_for_foreign_id() {
    bridgeadm()
        .args([
            "--no-color",
            "parse-user",
            "--server",
            "irc.freenode.net",
            "--homeserver-domain",
            "matrix.org",
            "@alice:matrix.org",
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("is not a bridged user"));
}

#[test]
fn test_credentials_required() {
    bridgeadm()
        .args([
            "remove-user",
            "-H",
            "https://matrix.org",
            "-u",
            "@spam:matrix.org",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--registration"));
}

#[test]
fn test_registration_and_token_conflict() {
    let reg = registration("as_token: reg-token\n");
    bridgeadm()
        .args(["remove-user", "-H", "https://matrix.org", "-t", "tok", "-r"])
        .arg(reg.path())
        .args(["-u", "@spam:matrix.org"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_room_id_sigil_checked() {
    bridgeadm()
        .args([
            "remove-idle-users",
            "-H",
            "https://matrix.org",
            "-t",
            "tok",
            "--room",
            "curBafw45738:matrix.org",
            "--since",
            "30",
            "-p",
            "@freenode_",
            "-u",
            "@appservice-irc:matrix.org",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("room id must start with '!'"));
}

#[test]
fn test_registration_without_token() {
    let reg = registration("id: irc_bridge\nsender_localpart: appservice-irc\n");
    bridgeadm()
        .args(["grant-ops", "-H", "https://matrix.org", "-r"])
        .arg(reg.path())
        .args(["-u", "@matthew:matrix.org", "-a", "#freenode_#matrix:matrix.org"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot read as_token"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_grant_ops_against_homeserver() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/_matrix/client/r0/directory/room/%23freenode_%23matrix:matrix.org"))
        .and(header("authorization", "Bearer reg-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "room_id": "!r:matrix.org" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/_matrix/client/r0/rooms/!r:matrix.org/state/m.room.power_levels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "users": {} })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/_matrix/client/r0/rooms/!r:matrix.org/state/m.room.power_levels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "event_id": "$e" })))
        .expect(1)
        .mount(&server)
        .await;

    let reg = registration("as_token: reg-token\n");
    let uri = server.uri();
    let reg_path = reg.path().to_path_buf();
    tokio::task::spawn_blocking(move || {
        bridgeadm()
            .args(["--no-color", "grant-ops", "-H", &uri, "-r"])
            .arg(&reg_path)
            .args(["-u", "@matthew:matrix.org", "-a", "#freenode_#matrix:matrix.org"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Granted."));
    })
    .await
    .unwrap();
}
