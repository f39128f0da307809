use assert_cmd::Command;
use assert_cmd::cargo;
use mockito::Server;
use predicates::prelude::*;
use std::path::Path;
use tempfile::tempdir;

const MANIFEST: &str = r#"# Fast symlink finder
[package]
name = "find-links"
version = "0.1.0" # bumped by relkit
edition = "2021"
description = "Fast symlink finder"

[dependencies.clap]
version = "4.5.0"
features = ["derive"]
"#;

fn relkit(dir: &Path) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("relkit"));
    cmd.current_dir(dir)
        .env_remove("RELKIT_MANIFEST")
        .env_remove("RELKIT_BUILD_STATE")
        .env_remove("RELKIT_ARCHIVE_HOST")
        .env_remove("BUILD_NUMBER")
        .env_remove("GITHUB_TOKEN");
    cmd
}

fn write_manifest(dir: &Path, content: &str) {
    std::fs::write(dir.join("Cargo.toml"), content).unwrap();
}

fn read_manifest(dir: &Path) -> String {
    std::fs::read_to_string(dir.join("Cargo.toml")).unwrap()
}

#[test]
fn test_set_version_minimal_manifest() {
    let dir = tempdir().unwrap();
    write_manifest(dir.path(), "[package]\nname = \"x\"\nversion = \"0.1.0\"\n");

    relkit(dir.path())
        .arg("set-version")
        .arg("0.2.0")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.2.0"));

    assert_eq!(
        read_manifest(dir.path()),
        "[package]\nname = \"x\"\nversion = \"0.2.0\"\n"
    );
}

#[test]
fn test_set_version_twice_is_byte_identical() {
    let dir = tempdir().unwrap();
    write_manifest(dir.path(), MANIFEST);

    relkit(dir.path()).args(["set-version", "1.0.0"]).assert().success();
    let first = read_manifest(dir.path());
    relkit(dir.path()).args(["set-version", "1.0.0"]).assert().success();
    let second = read_manifest(dir.path());

    assert_eq!(first, second);
    assert_eq!(
        first,
        MANIFEST.replace("version = \"0.1.0\"", "version = \"1.0.0\"")
    );
}

#[cfg(unix)]
#[test]
fn test_bump_keeps_manifest_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    write_manifest(dir.path(), MANIFEST);
    let manifest = dir.path().join("Cargo.toml");
    std::fs::set_permissions(&manifest, std::fs::Permissions::from_mode(0o644)).unwrap();

    relkit(dir.path()).args(["bump", "patch"]).assert().success();

    let mode = std::fs::metadata(&manifest).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o644);
    assert!(read_manifest(dir.path()).contains("version = \"0.1.1\""));
}

#[test]
fn test_build_number_recovers_from_binary_state() {
    let dir = tempdir().unwrap();
    let state = dir.path().join("counter");
    std::fs::write(&state, [0xff, 0xfe, 0x00]).unwrap();

    relkit(dir.path())
        .args(["--state", "counter", "build-number"])
        .assert()
        .success()
        .stdout("1\n");
    assert_eq!(std::fs::read_to_string(&state).unwrap(), "1\n");
}

#[test]
fn test_set_version_invalid_semver_leaves_manifest() {
    let dir = tempdir().unwrap();
    write_manifest(dir.path(), MANIFEST);

    relkit(dir.path())
        .args(["set-version", "1.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid version '1.0'"));

    assert_eq!(read_manifest(dir.path()), MANIFEST);
}

#[test]
fn test_bump_minor_keeps_dependency_version() {
    let dir = tempdir().unwrap();
    write_manifest(dir.path(), MANIFEST);

    relkit(dir.path())
        .args(["bump", "minor"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0 -> 0.2.0"));

    let manifest = read_manifest(dir.path());
    assert!(manifest.contains("version = \"0.2.0\" # bumped by relkit"));
    assert!(manifest.contains("version = \"4.5.0\""));

    relkit(dir.path())
        .arg("version")
        .assert()
        .success()
        .stdout("0.2.0\n");
}

#[test]
fn test_bump_invalid_kind_fails() {
    let dir = tempdir().unwrap();
    write_manifest(dir.path(), MANIFEST);

    relkit(dir.path()).args(["bump", "huge"]).assert().failure();
    assert_eq!(read_manifest(dir.path()), MANIFEST);
}

#[test]
fn test_bump_without_version_field_fails() {
    let dir = tempdir().unwrap();
    write_manifest(dir.path(), "[package]\nname = \"x\"\n");

    relkit(dir.path())
        .args(["bump", "patch"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No version field"));
}

#[test]
fn test_manifest_flag() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("pkg");
    std::fs::create_dir(&nested).unwrap();
    write_manifest(&nested, "[package]\nversion = \"1.0.0\"\n");

    relkit(dir.path())
        .args(["--manifest", "pkg/Cargo.toml", "bump", "major"])
        .assert()
        .success();

    assert_eq!(read_manifest(&nested), "[package]\nversion = \"2.0.0\"\n");
}

#[test]
fn test_build_number_sequence() {
    let dir = tempdir().unwrap();

    relkit(dir.path()).arg("build-number").assert().success().stdout("1\n");
    relkit(dir.path()).arg("build-number").assert().success().stdout("2\n");

    assert_eq!(
        std::fs::read_to_string(dir.path().join("build/build-number")).unwrap(),
        "2\n"
    );
}

#[test]
fn test_build_number_recovers_from_corrupt_state() {
    let dir = tempdir().unwrap();
    let state = dir.path().join("counter");
    std::fs::write(&state, "abc").unwrap();

    relkit(dir.path())
        .args(["--state", "counter", "build-number"])
        .assert()
        .success()
        .stdout("1\n");

    std::fs::write(&state, "41").unwrap();
    relkit(dir.path())
        .args(["--state", "counter", "build-number"])
        .assert()
        .success()
        .stdout("42\n");
}

#[test]
fn test_formula_end_to_end() {
    let mut server = Server::new();
    let archive = b"pretend this is a tarball".to_vec();
    let _mock = server
        .mock("GET", "/acme/find-links/archive/refs/tags/v0.2.0.tar.gz")
        .with_status(200)
        .with_body(&archive)
        .create();

    let dir = tempdir().unwrap();
    write_manifest(dir.path(), MANIFEST);

    relkit(dir.path())
        .args([
            "formula",
            "0.2.0",
            "--remote-url",
            "git@github.com:acme/find-links.git",
            "--archive-host",
            &server.url(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("find-links.rb"));

    let formula = std::fs::read_to_string(dir.path().join("Formula/find-links.rb")).unwrap();
    assert!(formula.starts_with("class FindLinks < Formula\n"));
    assert!(formula.contains("desc \"Fast symlink finder\""));
    assert!(formula.contains("homepage \"https://github.com/acme/find-links\""));
    assert!(formula.contains(&format!(
        "url \"{}/acme/find-links/archive/refs/tags/v0.2.0.tar.gz\"",
        server.url()
    )));
    assert!(formula.contains("head \"https://github.com/acme/find-links.git\", branch: \"main\""));
    assert!(formula.contains(
        "assert_match \"find-links\", shell_output(\"#{bin}/find-links --version\")"
    ));
    assert!(!formula.contains("{{"));

    let sha_line = formula
        .lines()
        .find(|l| l.trim_start().starts_with("sha256"))
        .unwrap();
    let digest = sha_line.trim().trim_start_matches("sha256 ").trim_matches('"');
    assert_eq!(digest.len(), 64);
    assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

    // A second run overwrites instead of accumulating files.
    relkit(dir.path())
        .args([
            "formula",
            "0.2.0",
            "--remote-url",
            "https://github.com/acme/find-links",
            "--archive-host",
            &server.url(),
        ])
        .assert()
        .success();
    assert_eq!(
        std::fs::read_dir(dir.path().join("Formula")).unwrap().count(),
        1
    );
}

#[test]
fn test_formula_missing_tag_fails_without_leftovers() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/acme/find-links/archive/refs/tags/v9.9.9.tar.gz")
        .with_status(404)
        .create();

    let dir = tempdir().unwrap();
    let scratch = tempdir().unwrap();
    write_manifest(dir.path(), MANIFEST);

    relkit(dir.path())
        .env("TMPDIR", scratch.path())
        .args([
            "formula",
            "9.9.9",
            "--remote-url",
            "https://github.com/acme/find-links",
            "--archive-host",
            &server.url(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"))
        .stderr(predicate::str::contains("v9.9.9.tar.gz"));

    assert!(!dir.path().join("Formula").exists());
    assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
}

#[test]
fn test_formula_bad_remote_fails_before_network() {
    let dir = tempdir().unwrap();
    write_manifest(dir.path(), MANIFEST);

    relkit(dir.path())
        .args([
            "formula",
            "0.2.0",
            "--remote-url",
            "https://github.com/acme",
            "--archive-host",
            "http://127.0.0.1:9",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("https://github.com/acme"));

    assert!(!dir.path().join("Formula").exists());
}
