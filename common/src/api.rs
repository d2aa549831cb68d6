//! バックエンドAPIクライアント
//!
//! 外部のサーバーレスAPI（`.../functions/v1/make-server-53c2e113`）への
//! リクエスト形状とBearer認証を一箇所にまとめる。
//! 解析ロジックはすべてサーバー側にあり、ここではJSONの送受信のみ行う。

use crate::auth::SessionUser;
use crate::error::{Error, Result, TransportError};
use crate::http::{FormPart, HttpClient, HttpReply, HttpRequest};
use serde::Serialize;

/// デプロイ既定のベースURL
pub const DEFAULT_BASE_URL: &str =
    "https://ledgerlift.supabase.co/functions/v1/make-server-53c2e113";

/// 通信失敗時にユーザーへ出す文言
pub const NETWORK_FAILURE_MESSAGE: &str = "Failed to connect to the server. Please try again.";

const TRACK_ENDPOINT: &str = "track-demo";

/// APIクライアント
#[derive(Clone, Debug)]
pub struct ApiClient<C> {
    client: C,
    base_url: String,
    api_key: String,
}

impl<C: HttpClient> ApiClient<C> {
    pub fn new(client: C, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            api_key: api_key.into(),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// エンドポイント名から絶対URLを組み立てる
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    /// multipartでファイルを送信（ステータス判定は呼び出し側）
    pub async fn post_files(
        &self,
        endpoint: &str,
        parts: Vec<FormPart<C::File>>,
    ) -> std::result::Result<HttpReply, TransportError> {
        let request = HttpRequest::post(self.url(endpoint))
            .bearer(&self.api_key)
            .multipart(parts);
        self.client.send(request).await
    }

    pub async fn post_json(
        &self,
        endpoint: &str,
        body: serde_json::Value,
    ) -> std::result::Result<HttpReply, TransportError> {
        let request = HttpRequest::post(self.url(endpoint))
            .bearer(&self.api_key)
            .header("Content-Type", "application/json")
            .json(body);
        self.client.send(request).await
    }

    /// 計算済みの結果をそのまま送り返し、スプレッドシート/CSVのバイト列を受け取る
    pub async fn export<R: Serialize>(&self, endpoint: &str, result: &R) -> Result<Vec<u8>> {
        let body = serde_json::to_value(result)?;
        let reply = self.post_json(endpoint, body).await?;
        if !reply.is_success() {
            return Err(Error::request_failed(Some(reply.status), error_message(&reply)));
        }
        Ok(reply.body)
    }

    /// アプリ側のユーザープロファイルを取得
    ///
    /// 404は「プロファイルなし」として `Ok(None)`。
    pub async fn fetch_profile(&self, user_id: &str) -> Result<Option<SessionUser>> {
        let request = HttpRequest::get(self.url(&format!("auth/user/{}", user_id)))
            .bearer(&self.api_key);
        let reply = self.client.send(request).await?;

        if reply.status == 404 {
            return Ok(None);
        }
        if !reply.is_success() {
            return Err(Error::request_failed(Some(reply.status), error_message(&reply)));
        }

        let value: serde_json::Value = reply.json()?;
        // `{ "user": {...} }` と素のオブジェクトの両方を受け付ける
        let user = value.get("user").cloned().unwrap_or(value);
        if user.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(user)?))
    }

    /// 利用状況ビーコン（失敗しても無視）
    pub async fn track(&self, event: &AnalyticsEvent) {
        let body = match serde_json::to_value(event) {
            Ok(body) => body,
            Err(e) => {
                log::debug!("analytics event not serializable: {}", e);
                return;
            }
        };
        match self.post_json(TRACK_ENDPOINT, body).await {
            Ok(reply) if !reply.is_success() => {
                log::debug!("analytics beacon rejected with status {}", reply.status);
            }
            Ok(_) => {}
            Err(e) => log::debug!("analytics beacon failed: {}", e),
        }
    }
}

/// 非2xxレスポンスから表示用メッセージを取り出す
///
/// 優先順位: `error` → `details` → ステータステキスト → ステータスコード
pub fn error_message(reply: &HttpReply) -> String {
    if let Ok(value) = reply.json::<serde_json::Value>() {
        for key in ["error", "details"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                if !text.trim().is_empty() {
                    return text.to_string();
                }
            }
        }
    }

    if !reply.status_text.trim().is_empty() {
        return format!("Request failed: {}", reply.status_text);
    }

    format!("Request failed with status {}", reply.status)
}

/// デモ試行の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttemptOutcome {
    Success,
    Failure,
}

/// デモ試行ごとに送る分析イベント
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsEvent {
    pub event: &'static str,
    pub demo: &'static str,
    pub outcome: AttemptOutcome,
    pub file_count: usize,
}

impl AnalyticsEvent {
    pub fn demo_attempt(demo: &'static str, outcome: AttemptOutcome, file_count: usize) -> Self {
        Self {
            event: "demo_attempt",
            demo,
            outcome,
            file_count,
        }
    }
}
