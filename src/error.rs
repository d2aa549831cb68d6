use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerLiftError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。`ledgerlift config --set-api-key YOUR_KEY` で設定してください")]
    MissingApiKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("不明なアップロード欄 `{field}`（このデモの欄: {expected}）")]
    UnknownSlot { field: String, expected: String },

    #[error("余分なファイル: {0}（空いているアップロード欄がありません）")]
    ExtraFile(String),

    #[error("デモが失敗しました")]
    DemoFailed,

    #[error("ログインしていません。`ledgerlift login` でサインインしてください")]
    NotSignedIn,

    #[error("アカウントのプロファイルを取得できませんでした。もう一度サインインしてください")]
    ProfileUnavailable,

    #[error("このデモにはエクスポート先がありません: {0}")]
    ExportUnavailable(String),

    #[error("レポート生成エラー: {0}")]
    Report(String),

    #[error("中断しました")]
    Interrupted,

    #[error(transparent)]
    Service(#[from] ledgerlift_common::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LedgerLiftError>;
