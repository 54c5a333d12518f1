//! Integration tests for the chunkwise CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn chunkwise() -> Command {
    Command::cargo_bin("chunkwise").unwrap()
}

#[test]
fn test_stdin_text_output() {
    chunkwise()
        .args(["-s", "3", "-o", "2", "--separator", ""])
        .write_stdin("dummy text")
        .assert()
        .success()
        .stdout("dum\n---\numm\n---\nmmy\n---\nmy\n---\ny t\n---\nte\n---\ntex\n---\next\n");
}

#[test]
fn test_empty_stdin_produces_no_chunks() {
    chunkwise()
        .args(["-s", "100", "-o", "0"])
        .write_stdin("")
        .assert()
        .success()
        .stdout("");
}

#[test]
fn test_file_json_output() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("doc.txt");
    fs::write(&path, "First paragraph here.\n\nSecond paragraph.").unwrap();

    let output = chunkwise()
        .args(["-s", "25", "-o", "0", "-f", "json"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());

    let chunks: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let chunks = chunks.as_array().unwrap();
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0]["text"], "First paragraph here.");
    assert_eq!(chunks[1]["text"], "Second paragraph.");
    assert_eq!(chunks[1]["metadata"]["start_offset"], 23);
    assert_eq!(chunks[0]["metadata"]["document"]["language"], "plaintext");
    assert_eq!(chunks[0]["id"].as_str().unwrap().len(), 64);
}

#[test]
fn test_directory_jsonl_with_auto_language() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("lib.rs"),
        "fn a() {\n    1\n}\nfn b() {\n    2\n}\nfn c() {\n    3\n}",
    )
    .unwrap();
    fs::write(dir.path().join("notes.md"), "# Notes\nshort").unwrap();
    fs::write(dir.path().join("data.bin"), "ignored").unwrap();

    let output = chunkwise()
        .args(["-s", "40", "-o", "0", "-f", "jsonl", "-l", "auto"])
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let lines: Vec<serde_json::Value> = String::from_utf8(output.stdout)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["metadata"]["document"]["source"], "lib.rs");
    assert_eq!(lines[1]["metadata"]["document"]["source"], "lib.rs");
    assert!(lines[1]["text"].as_str().unwrap().starts_with("fn c()"));
    assert_eq!(lines[2]["text"], "# Notes\nshort");
    assert_eq!(lines[2]["metadata"]["document_index"], 1);
}

#[test]
fn test_config_file_with_override() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("chunkwise.toml");
    fs::write(&config, "chunk_size = 100\nchunk_overlap = 0\n").unwrap();

    chunkwise()
        .arg("--config")
        .arg(&config)
        .args(["-s", "10"])
        .write_stdin("alpha beta gamma")
        .assert()
        .success()
        .stdout("alpha beta\n---\ngamma\n");
}

#[test]
fn test_stats_on_stderr() {
    chunkwise()
        .args(["-s", "10", "-o", "0", "--stats"])
        .write_stdin("alpha beta gamma")
        .assert()
        .success()
        .stderr(predicate::str::contains("chunks: 2"));
}

#[test]
fn test_invalid_overlap_fails() {
    chunkwise()
        .args(["-s", "10", "-o", "10"])
        .write_stdin("text")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Chunk overlap 10 must be smaller than chunk size 10",
        ));
}

#[test]
fn test_invalid_regex_fails() {
    chunkwise()
        .args(["-s", "10", "-o", "0", "--regex", "--separator", "("])
        .write_stdin("text")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid separator pattern"));
}

#[test]
fn test_missing_file_fails() {
    chunkwise()
        .arg("/nonexistent/input.txt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn test_unknown_language_fails() {
    chunkwise()
        .args(["-l", "cobol"])
        .write_stdin("text")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown language"));
}
