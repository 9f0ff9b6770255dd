//! End-to-end tests for the contactpack console.
//!
//! These tests run the actual binary, feed a conversation on stdin and check
//! the printed replies and the delivered files.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test cli_e2e
//! ```

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::{TempDir, tempdir};

// ============================================================================
// Test Fixtures
// ============================================================================

fn setup_fixtures() -> TempDir {
    let dir = tempdir().expect("Failed to create temp dir");

    fs::write(dir.path().join("phones.txt"), "0811111111\nhello\n0822222222\n0811111111\n").unwrap();
    fs::write(
        dir.path().join("contacts.vcf"),
        "BEGIN:VCARD\nVERSION:3.0\nFN:Ani\nTEL;TYPE=CELL:0833333333\nEND:VCARD\n",
    )
    .unwrap();

    dir
}

fn contactpack(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("contactpack").unwrap();
    cmd.arg("--work-dir")
        .arg(dir.join("work"))
        .arg("--out-dir")
        .arg(dir.join("out"))
        .arg("--retry-delay-ms")
        .arg("0");
    cmd
}

// ============================================================================
// Conversations
// ============================================================================

#[test]
fn test_count_conversation() {
    let dir = setup_fixtures();
    let input = format!(
        "/count\n@file {}\n@file {}\n/done\n",
        dir.path().join("phones.txt").display(),
        dir.path().join("contacts.vcf").display()
    );

    contactpack(dir.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("phones.txt: 3 kontak"))
        .stdout(predicate::str::contains("contacts.vcf: 1 kontak"))
        .stdout(predicate::str::contains("Total semua file: 4 kontak"));
}

#[test]
fn test_to_vcf_writes_output() {
    let dir = setup_fixtures();
    let input = format!(
        "/to_vcf\n@file {}\n/done\nTeman\nhasil\nsemua\n",
        dir.path().join("phones.txt").display()
    );

    contactpack(dir.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("📎 hasil.vcf"));

    let vcf = fs::read_to_string(dir.path().join("out/hasil.vcf")).unwrap();
    assert!(vcf.contains("FN:Teman 01\nTEL;TYPE=CELL:+0811111111"));
    assert!(vcf.contains("FN:Teman 02\nTEL;TYPE=CELL:+0822222222"));
    assert!(!vcf.contains("Teman 03"));
}

#[test]
fn test_to_txt_writes_output() {
    let dir = setup_fixtures();
    let input = format!("/to_txt\n@file {}\n/done\n", dir.path().join("contacts.vcf").display());

    contactpack(dir.path()).write_stdin(input).assert().success();

    let txt = fs::read_to_string(dir.path().join("out/contacts.txt")).unwrap();
    assert_eq!(txt, "+0833333333");
}

#[test]
fn test_split_with_choice_line() {
    let dir = setup_fixtures();
    let input = format!(
        "/split\n@choice split_kontak\n@file {}\n/done\n1\n",
        dir.path().join("phones.txt").display()
    );

    contactpack(dir.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("[split_kontak]"));

    assert!(dir.path().join("out/phones_4.txt").exists());
    assert!(!dir.path().join("out/phones_5.txt").exists());
}

#[test]
fn test_audit_log_is_written() {
    let dir = setup_fixtures();
    let input = format!("/count\n@file {}\n/done\n", dir.path().join("phones.txt").display());

    contactpack(dir.path())
        .arg("--audit-dir")
        .arg(dir.path().join("audit"))
        .arg("--user")
        .arg("7")
        .write_stdin(input)
        .assert()
        .success();

    let log = fs::read_to_string(dir.path().join("audit/7.csv")).unwrap();
    assert!(log.starts_with("user,file_name,timestamp"));
    assert!(log.contains("phones.txt"));
}

// ============================================================================
// Flags and edge cases
// ============================================================================

#[test]
fn test_help_flag() {
    Command::cargo_bin("contactpack")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--work-dir"))
        .stdout(predicate::str::contains("@file"));
}

#[test]
fn test_empty_input() {
    let dir = tempdir().unwrap();
    contactpack(dir.path())
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_help_command_lists_features() {
    let dir = tempdir().unwrap();
    contactpack(dir.path())
        .write_stdin("/help\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("/renamefile"));
}

#[test]
fn test_missing_upload_is_reported() {
    let dir = tempdir().unwrap();
    contactpack(dir.path())
        .write_stdin("/count\n@file does/not/exist.txt\n/done\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Gagal menerima file"))
        .stdout(predicate::str::contains("Belum ada file"));
}
