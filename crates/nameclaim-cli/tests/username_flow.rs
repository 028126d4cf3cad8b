
use std::fs;

use fixtures::{nameclaim, write_profile};
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_check_rejects_short_and_malformed_names() {
    let dir = tempdir().unwrap();

    nameclaim(dir.path())
        .args(["check", "ab"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Username must be at least 3 characters.",
        ));

    nameclaim(dir.path())
        .args(["check", "a..b"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid username"));
}

#[test]
fn test_login_without_profile_fails() {
    let dir = tempdir().unwrap();

    nameclaim(dir.path())
        .arg("login")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No local profile configured"));
}

#[test]
fn test_claim_requires_sign_in() {
    let dir = tempdir().unwrap();
    write_profile(dir.path(), "u1", "Ada");

    nameclaim(dir.path())
        .args(["claim", "alice"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not signed in"));
}

#[test]
fn test_login_claim_whoami_round() {
    let dir = tempdir().unwrap();
    write_profile(dir.path(), "u1", "Ada");

    nameclaim(dir.path())
        .arg("login")
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed in as Ada (u1)"));

    nameclaim(dir.path())
        .args(["check", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("'alice' is available"));

    nameclaim(dir.path())
        .args(["claim", "Alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Claimed '@alice'"));

    nameclaim(dir.path())
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("username: @alice"));

    nameclaim(dir.path())
        .args(["check", "alice"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Username is taken"));

    let store: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("store.json")).unwrap())
            .unwrap();
    assert_eq!(store["usernames/alice"]["ownerId"], "u1");
    assert_eq!(store["users/u1"]["username"], "alice");
    assert_eq!(store["users/u1"]["displayName"], "Ada");
}

#[test]
fn test_second_user_cannot_claim_taken_name() {
    let dir = tempdir().unwrap();

    write_profile(dir.path(), "u1", "Ada");
    nameclaim(dir.path()).arg("login").assert().success();
    nameclaim(dir.path())
        .args(["claim", "alice"])
        .assert()
        .success();
    nameclaim(dir.path()).arg("logout").assert().success();

    write_profile(dir.path(), "u2", "Bob");
    nameclaim(dir.path()).arg("login").assert().success();
    nameclaim(dir.path())
        .args(["claim", "alice"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Username is taken"));

    nameclaim(dir.path())
        .args(["whoami", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"username\": null"));
}

#[test]
fn test_logout_clears_session() {
    let dir = tempdir().unwrap();
    write_profile(dir.path(), "u1", "Ada");

    nameclaim(dir.path()).arg("login").assert().success();
    nameclaim(dir.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed out"));
    nameclaim(dir.path())
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not signed in"));
}

#[test]
fn test_ephemeral_store_is_not_written() {
    let dir = tempdir().unwrap();
    write_profile(dir.path(), "u1", "Ada");

    nameclaim(dir.path()).arg("login").assert().success();
    nameclaim(dir.path())
        .args(["--ephemeral", "claim", "alice"])
        .assert()
        .success();

    assert!(!dir.path().join("store.json").exists());
}
