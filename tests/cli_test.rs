//! Command line tests
//!
//! Only the validation path is exercised: it must fail before any engine
//! is started, so no speech software is needed.

use std::process::Command;

#[test]
fn test_invalid_form_exits_before_synthesis() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("ttsvid.cfg");
    let output = dir.path().join("output.wav");

    let result = Command::new(env!("CARGO_BIN_EXE_ttsvid"))
        .args([
            "--config",
            config.to_str().unwrap(),
            "generate",
            "--voice",
            "/nonexistent/presenter.mp3",
            "--quotes",
            " \n ",
            "--pause",
            "7",
            "--output",
            output.to_str().unwrap(),
        ])
        .output()
        .expect("run ttsvid generate");

    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("'Presenter Voice'"));
    assert!(stderr.contains("at least one quote"));
    assert!(stderr.contains("'Pause Between Quotes'"));
    assert!(!output.exists());
}

#[test]
fn test_quotes_and_quotes_file_conflict() {
    let status = Command::new(env!("CARGO_BIN_EXE_ttsvid"))
        .args([
            "preview",
            "--quotes",
            "a",
            "--quotes-file",
            "quotes.txt",
        ])
        .output()
        .expect("run ttsvid preview");

    assert!(!status.status.success());
}

#[test]
fn test_zero_preview_count_exits_before_synthesis() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("ttsvid.cfg");
    let voice = dir.path().join("presenter.wav");
    let output = dir.path().join("preview.wav");
    std::fs::write(&voice, b"RIFF").unwrap();

    let result = Command::new(env!("CARGO_BIN_EXE_ttsvid"))
        .args([
            "--config",
            config.to_str().unwrap(),
            "preview",
            "--voice",
            voice.to_str().unwrap(),
            "--quotes",
            "first\nsecond",
            "--count",
            "0",
            "--output",
            output.to_str().unwrap(),
        ])
        .output()
        .expect("run ttsvid preview");

    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("at least 1 quote"));
    assert!(!stderr.contains("Starting XTTS"));
    assert!(!output.exists());
}
