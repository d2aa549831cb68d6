//! HTTP抽象化
//!
//! CLI(reqwest)とWeb(fetch)で実装を差し替えるための最小限のインターフェース。
//! 上位レイヤ（api / auth / upload）はこのトレイトだけに依存する。

use crate::error::TransportError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// アップロード対象ファイルのハンドル
///
/// CLIではローカルパス、Webでは `web_sys::File` を包む。
pub trait FileSource {
    fn file_name(&self) -> &str;
    /// ブラウザ等が報告したMIMEタイプ（不明な場合は空文字）
    fn mime_type(&self) -> &str;
    fn size(&self) -> u64;

    /// 拡張子（小文字、ドットなし）
    fn extension(&self) -> Option<String> {
        let name = self.file_name();
        let (_, ext) = name.rsplit_once('.')?;
        if ext.is_empty() {
            None
        } else {
            Some(ext.to_ascii_lowercase())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// multipartの1パート
#[derive(Debug, Clone)]
pub struct FormPart<F> {
    pub field: String,
    pub file: F,
}

#[derive(Debug, Clone)]
pub enum RequestBody<F> {
    Empty,
    Json(serde_json::Value),
    Multipart(Vec<FormPart<F>>),
}

#[derive(Debug, Clone)]
pub struct HttpRequest<F> {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody<F>,
}

impl<F> HttpRequest<F> {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    pub fn bearer(self, token: &str) -> Self {
        let value = format!("Bearer {}", token);
        self.header("Authorization", &value)
    }

    pub fn json(mut self, value: serde_json::Value) -> Self {
        self.body = RequestBody::Json(value);
        self
    }

    pub fn multipart(mut self, parts: Vec<FormPart<F>>) -> Self {
        self.body = RequestBody::Multipart(parts);
        self
    }

    pub fn header_value(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// HTTPレスポンス（ステータスと生ボディ）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HttpReply {
    pub status: u16,
    pub status_text: String,
    pub body: Vec<u8>,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            status_text: String::new(),
            body: body.into(),
        }
    }

    pub fn with_status_text(mut self, text: &str) -> Self {
        self.status_text = text.to_string();
        self
    }

    /// 2xx判定
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }
}

/// HTTPクライアント
///
/// WASMでは `Send` を満たせないため `?Send`。
#[async_trait(?Send)]
pub trait HttpClient {
    type File: FileSource + Clone;

    async fn send(&self, request: HttpRequest<Self::File>) -> Result<HttpReply, TransportError>;
}

#[cfg(test)]
pub(crate) mod mock {
    //! テスト用のモッククライアント

    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    #[derive(Debug, Clone, PartialEq)]
    pub struct MockFile {
        pub name: String,
        pub mime: String,
        pub size: u64,
    }

    impl MockFile {
        pub fn new(name: &str, mime: &str, size: u64) -> Self {
            Self {
                name: name.to_string(),
                mime: mime.to_string(),
                size,
            }
        }
    }

    impl FileSource for MockFile {
        fn file_name(&self) -> &str {
            &self.name
        }
        fn mime_type(&self) -> &str {
            &self.mime
        }
        fn size(&self) -> u64 {
            self.size
        }
    }

    pub const MB: u64 = 1024 * 1024;

    /// キューに積んだ応答を順に返し、送信内容を記録する
    #[derive(Default)]
    pub struct MockHttpClient {
        pub replies: RefCell<VecDeque<Result<HttpReply, TransportError>>>,
        pub requests: RefCell<Vec<HttpRequest<MockFile>>>,
    }

    impl MockHttpClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(self, status: u16, body: &str) -> Self {
            self.replies
                .borrow_mut()
                .push_back(Ok(HttpReply::new(status, body.as_bytes().to_vec())));
            self
        }

        pub fn fail(self, message: &str) -> Self {
            self.replies
                .borrow_mut()
                .push_back(Err(TransportError(message.to_string())));
            self
        }

        pub fn request_count(&self) -> usize {
            self.requests.borrow().len()
        }

        pub fn last_request(&self) -> Option<HttpRequest<MockFile>> {
            self.requests.borrow().last().cloned()
        }
    }

    #[async_trait(?Send)]
    impl HttpClient for MockHttpClient {
        type File = MockFile;

        async fn send(&self, request: HttpRequest<MockFile>) -> Result<HttpReply, TransportError> {
            self.requests.borrow_mut().push(request);
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError("no reply queued".into())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockFile;
    use super::*;

    #[test]
    fn test_extension_lowercased() {
        let file = MockFile::new("Statement.CSV", "", 10);
        assert_eq!(file.extension().as_deref(), Some("csv"));
    }

    #[test]
    fn test_extension_missing() {
        assert_eq!(MockFile::new("README", "", 1).extension(), None);
        assert_eq!(MockFile::new("trailing.", "", 1).extension(), None);
    }

    #[test]
    fn test_request_builder_bearer() {
        let req: HttpRequest<MockFile> = HttpRequest::post("https://api.example.com/x").bearer("tok");
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.header_value("authorization"), Some("Bearer tok"));
    }

    #[test]
    fn test_reply_success_range() {
        assert!(HttpReply::new(200, "").is_success());
        assert!(HttpReply::new(204, "").is_success());
        assert!(!HttpReply::new(302, "").is_success());
        assert!(!HttpReply::new(500, "").is_success());
    }

    #[test]
    fn test_reply_json() {
        let reply = HttpReply::new(200, r#"{"a":1}"#);
        let value: serde_json::Value = reply.json().expect("json");
        assert_eq!(value["a"], 1);
    }
}
