//! Integration tests for the CLI
//!
//! These tests parse real argument lists and wire the pipeline against a
//! temporary data directory. No cloud service is contacted.

#![allow(clippy::panic)] // Allow panic! in tests for clear failure messages

use std::ffi::OsString;

use clap::Parser;
use infrastructure::{AppConfig, StorageBackend};
use presentation_cli::{Cli, build_service};
use secrecy::SecretString;

fn parse_args(args: &[&str]) -> Result<Cli, clap::Error> {
    let os_args: Vec<OsString> = std::iter::once("speaker")
        .chain(args.iter().copied())
        .map(OsString::from)
        .collect();
    Cli::try_parse_from(os_args)
}

fn configured(data_dir: &std::path::Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.speech.api_key = Some(SecretString::from("test-key"));
    config.intent.api_key = Some(SecretString::from("test-key"));
    config.intent.project_id = "speaker-test".to_string();
    config.storage.data_dir = data_dir.to_path_buf();
    config
}

#[test]
fn audio_file_path_is_required() {
    let err = parse_args(&[]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn unknown_flag_is_a_usage_error() {
    let err = parse_args(&["--audio-file-path", "a.raw", "--loud"]).unwrap_err();
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn all_flags_parse() {
    let cli = parse_args(&[
        "--session-id",
        "kitchen",
        "--language-code",
        "de-DE",
        "--audio-file-path",
        "gs://bucket/speech.flac",
        "--data-dir",
        "/var/lib/speaker",
        "--no-playback",
        "--json",
        "-vv",
    ])
    .unwrap();

    assert_eq!(cli.session_id.as_deref(), Some("kitchen"));
    assert_eq!(cli.language_code, "de-DE");
    assert_eq!(cli.audio_file_path, "gs://bucket/speech.flac");
    assert!(cli.no_playback);
    assert!(cli.json);
    assert_eq!(cli.verbose, 2);

    let request = cli.request().unwrap();
    assert_eq!(request.audio_path, "gs://bucket/speech.flac");
}

#[test]
fn overrides_reach_the_configuration() {
    let cli = parse_args(&[
        "--audio-file-path",
        "speech.raw",
        "--data-dir",
        "/tmp/speaker-data",
        "--no-playback",
        "-v",
    ])
    .unwrap();
    let mut config = AppConfig::default();

    cli.apply_overrides(&mut config);

    assert_eq!(
        config.storage.data_dir,
        std::path::PathBuf::from("/tmp/speaker-data")
    );
    assert!(!config.assistant.playback);
    assert_eq!(config.logging.filter.as_deref(), Some("info"));
}

#[test]
fn file_backend_builds_in_data_dir() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("nested");

    build_service(&configured(&data_dir)).unwrap();

    assert!(data_dir.join("entry").is_dir());
    assert!(data_dir.join("timestamp").is_dir());
}

#[test]
fn sqlite_backend_creates_database() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = configured(dir.path());
    config.storage.backend = StorageBackend::Sqlite;

    build_service(&config).unwrap();

    assert!(dir.path().join("events.db").exists());
}

#[test]
fn missing_project_is_reported_by_section() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = configured(dir.path());
    config.intent.project_id = String::new();

    let err = build_service(&config).unwrap_err();

    assert!(err.to_string().starts_with("intent:"), "{err}");
}
