//! 設定ファイルテスト
//!
//! 保存・読み込みと既定値を検証

use ledgerlift::config::Config;
use ledgerlift_common::{DEFAULT_AUTH_URL, DEFAULT_BASE_URL};
use tempfile::tempdir;

/// ファイルが無ければ既定値
#[test]
fn test_missing_file_gives_defaults() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = Config::load_from(&dir.path().join("config.json")).expect("load failed");

    assert_eq!(config, Config::default());
    assert_eq!(config.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.auth_url, DEFAULT_AUTH_URL);
    assert!(config.api_key.is_none());
}

/// 保存と読み込み（親ディレクトリも作る）
#[test]
fn test_save_and_load() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("nested").join("config.json");

    let config = Config {
        api_key: Some("anon-key".to_string()),
        base_url: "https://staging.example.com/functions/v1/api".to_string(),
        ..Config::default()
    };
    config.save_to(&path).expect("save failed");

    let loaded = Config::load_from(&path).expect("load failed");
    assert_eq!(loaded, config);
}

/// 古い設定ファイルに無い項目は既定値で補う
#[test]
fn test_partial_file_filled_with_defaults() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"api_key":"k"}"#).unwrap();

    let loaded = Config::load_from(&path).expect("load failed");
    assert_eq!(loaded.api_key.as_deref(), Some("k"));
    assert_eq!(loaded.base_url, DEFAULT_BASE_URL);
}

/// 壊れたJSONはエラー
#[test]
fn test_corrupt_file_is_error() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{not json").unwrap();

    assert!(Config::load_from(&path).is_err());
}
