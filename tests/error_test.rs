//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use coffee_log::catalog::Catalog;
use coffee_log::error::CoffeeLogError;
use coffee_log::scanner;
use std::path::Path;
use tempfile::tempdir;

/// 存在しないパスをスキャンした場合
#[test]
fn test_scan_nonexistent_folder() {
    let result = scanner::scan_extractions(Path::new("/nonexistent/path/12345"), false);
    assert!(matches!(result, Err(CoffeeLogError::FolderNotFound(_))));
}

/// 空のフォルダをスキャンした場合
#[test]
fn test_scan_empty_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = scanner::scan_extractions(dir.path(), false);

    // 空フォルダはエラーではなく空のVecを返す
    assert!(result.unwrap().is_empty());
}

/// 壊れたカタログは空扱いにせずエラー
#[test]
fn test_corrupted_catalog() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("catalog.json");
    std::fs::write(&path, "{ invalid json }").unwrap();

    let result = Catalog::load(&path);
    assert!(matches!(result, Err(CoffeeLogError::InvalidCatalog(_))));
}

/// 未対応バージョンのカタログ
#[test]
fn test_catalog_version_mismatch() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("catalog.json");
    std::fs::write(&path, r#"{"version": 99, "nextId": 1}"#).unwrap();

    let err = Catalog::load(&path).unwrap_err();
    assert!(format!("{}", err).contains("99"));
}

/// CoffeeLogErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        CoffeeLogError::Config("テスト設定エラー".to_string()),
        CoffeeLogError::FileNotFound("bag.json".to_string()),
        CoffeeLogError::FolderNotFound("/path/to/folder".to_string()),
        CoffeeLogError::InvalidCatalog("壊れている".to_string()),
        CoffeeLogError::InvalidExtraction("名前なし".to_string()),
        CoffeeLogError::RoasterNotFound(1),
        CoffeeLogError::CoffeeNotFound(2),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: CoffeeLogError = io_err.into();

    assert!(matches!(err, CoffeeLogError::Io(_)));
    assert!(format!("{}", err).contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: CoffeeLogError = json_err.into();

    assert!(matches!(err, CoffeeLogError::JsonParse(_)));
}

/// common::Errorからの変換（透過的エラー）
#[test]
fn test_common_error_conversion() {
    let common_err = coffee_log_common::Error::Parse("JSONが見つかりません".to_string());
    let err: CoffeeLogError = common_err.into();

    assert!(matches!(err, CoffeeLogError::Common(_)));
    assert!(format!("{}", err).contains("JSONが見つかりません"));
}
