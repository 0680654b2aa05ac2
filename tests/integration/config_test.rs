use mata_sentry::core::config::{SentryConfig, DEFAULT_HOST, DEFAULT_PORT};
use mata_sentry::SentryError;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_from_explicit_path() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("sentry_secret");
    fs::write(
        &path,
        "SERVER_HOST=192.168.1.20\nSERVER_PORT=4000\nSENTRY_SECRET=render-farm-key\n",
    )
    .unwrap();

    let config = SentryConfig::load(Some(&path)).unwrap();

    assert_eq!(config.server_host, "192.168.1.20");
    assert_eq!(config.server_port, 4000);
    assert_eq!(config.sentry_secret, "render-farm-key");
    assert_eq!(config.masked_secret(), "*".repeat("render-farm-key".len()));
}

#[test]
fn test_load_with_only_secret_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("sentry_secret");
    fs::write(&path, "# node 7\n\nSENTRY_SECRET=abc\n").unwrap();

    let config = SentryConfig::load_from(&path).unwrap();

    assert_eq!(config.server_host, DEFAULT_HOST);
    assert_eq!(config.server_port, DEFAULT_PORT);
    assert_eq!(config.server_address(), "localhost:3000");
}

#[test]
fn test_missing_secret_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("sentry_secret");
    fs::write(&path, "SERVER_HOST=collector\nSERVER_PORT=3000\n").unwrap();

    let err = SentryConfig::load(Some(&path)).unwrap_err();

    assert!(matches!(err, SentryError::MissingSecret(_)));
    assert!(err.is_fatal());
    assert!(err.to_string().contains("SENTRY_SECRET"));
}

#[test]
fn test_missing_file_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("sentry_secret");

    let err = SentryConfig::load(Some(&path)).unwrap_err();

    assert!(matches!(err, SentryError::Config(_)));
    assert!(err.is_fatal());
}

#[test]
fn test_candidates_end_with_config_file_name() {
    let candidates = SentryConfig::candidates();
    assert!(!candidates.is_empty());
    assert!(candidates
        .iter()
        .all(|path| path.file_name().unwrap() == "sentry_secret"));
}
