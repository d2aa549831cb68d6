//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    /// クライアント側の入力検証エラー（ファイル形式・サイズ・必須ファイル不足）
    #[error("{0}")]
    InputRejected(String),

    /// 非2xxレスポンスまたは通信失敗
    #[error("{message}")]
    RequestFailed {
        status: Option<u16>,
        message: String,
    },

    /// 画面遷移などによる中断（ユーザーには表示しない）
    #[error("request cancelled")]
    Cancelled,

    #[error("an upload is already in progress")]
    Busy,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

/// UI境界で区別するエラー種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InputRejected,
    RequestFailed,
    Cancelled,
}

impl Error {
    pub fn request_failed(status: Option<u16>, message: impl Into<String>) -> Self {
        Error::RequestFailed {
            status,
            message: message.into(),
        }
    }

    /// UIに出す種別へ変換
    ///
    /// 解析失敗や認証失敗もユーザーから見れば「リクエスト失敗」として扱う。
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InputRejected(_) | Error::Busy => ErrorKind::InputRejected,
            Error::Cancelled => ErrorKind::Cancelled,
            _ => ErrorKind::RequestFailed,
        }
    }

    /// ユーザー通知が必要かどうか（キャンセルは無言）
    pub fn should_notify(&self) -> bool {
        self.kind() != ErrorKind::Cancelled
    }
}

/// 通信レイヤのエラー（接続不可・CORS・DNSなど）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("network error: {0}")]
pub struct TransportError(pub String);

impl From<TransportError> for Error {
    fn from(_: TransportError) -> Self {
        Error::request_failed(None, crate::api::NETWORK_FAILURE_MESSAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_input_rejected() {
        let error = Error::InputRejected("File size must be less than 10MB".to_string());
        assert_eq!(format!("{}", error), "File size must be less than 10MB");
    }

    #[test]
    fn test_error_display_request_failed() {
        let error = Error::request_failed(Some(500), "Reconciliation failed");
        assert_eq!(format!("{}", error), "Reconciliation failed");
    }

    #[test]
    fn test_error_display_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error = Error::Json(json_error);
        assert!(format!("{}", error).contains("JSON error"));
    }

    #[test]
    fn test_error_kind_mapping() {
        assert_eq!(Error::InputRejected("x".into()).kind(), ErrorKind::InputRejected);
        assert_eq!(Error::Busy.kind(), ErrorKind::InputRejected);
        assert_eq!(Error::Cancelled.kind(), ErrorKind::Cancelled);
        assert_eq!(Error::request_failed(Some(404), "x").kind(), ErrorKind::RequestFailed);
        assert_eq!(Error::InvalidResponse("x".into()).kind(), ErrorKind::RequestFailed);
    }

    #[test]
    fn test_cancelled_is_silent() {
        assert!(!Error::Cancelled.should_notify());
        assert!(Error::InputRejected("x".into()).should_notify());
    }

    #[test]
    fn test_transport_error_conversion() {
        let err: Error = TransportError("dns".into()).into();
        match err {
            Error::RequestFailed { status, message } => {
                assert_eq!(status, None);
                assert!(message.contains("Failed to connect"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
