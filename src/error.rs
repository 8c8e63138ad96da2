use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoffeeLogError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("カタログファイルが不正: {0}")]
    InvalidCatalog(String),

    #[error("抽出データが不正: {0}")]
    InvalidExtraction(String),

    #[error("ロースターが見つかりません: {0}")]
    RoasterNotFound(u64),

    #[error("コーヒーが見つかりません: {0}")]
    CoffeeNotFound(u64),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] coffee_log_common::Error),
}

pub type Result<T> = std::result::Result<T, CoffeeLogError>;
