//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

fn catalog() -> Command {
    let mut cmd = Command::cargo_bin("catalog").unwrap();
    cmd.env_remove("DATABASE_URL").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    catalog()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("migrate"))
        .stdout(predicate::str::contains("seed"));
}

#[test]
fn test_serve_help() {
    catalog()
        .arg("serve")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Address to bind to"))
        .stdout(predicate::str::contains("--memory"))
        .stdout(predicate::str::contains("--database-url"));
}

#[test]
fn test_seed_help() {
    catalog()
        .arg("seed")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--skip-migrations"));
}

#[test]
fn test_migrate_requires_database_url() {
    catalog()
        .current_dir(std::env::temp_dir())
        .arg("migrate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("DATABASE_URL not set"));
}

#[test]
fn test_serve_rejects_bad_bind_address() {
    catalog()
        .arg("serve")
        .arg("--memory")
        .arg("--bind")
        .arg("not-an-address")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
