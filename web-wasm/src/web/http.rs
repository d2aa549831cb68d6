//! fetch APIによる `HttpClient` 実装
//!
//! multipartは `FormData` に詰め、Content-Typeはブラウザに任せる。
//! 送信中のFutureを破棄すると `AbortController` でリクエストも中断する。

use async_trait::async_trait;
use ledgerlift_common::http::{FileSource, HttpClient, HttpReply, HttpRequest, RequestBody};
use ledgerlift_common::TransportError;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    AbortController, AbortSignal, FormData, Headers, Request, RequestInit, RequestMode, Response,
};

/// `<input type="file">` やドロップで得たファイル
#[derive(Debug, Clone, PartialEq)]
pub struct BrowserFile {
    file: web_sys::File,
    name: String,
    mime: String,
}

impl BrowserFile {
    pub fn new(file: web_sys::File) -> Self {
        Self {
            name: file.name(),
            mime: file.type_(),
            file,
        }
    }

    /// FileListを配列に
    pub fn from_list(list: &web_sys::FileList) -> Vec<Self> {
        (0..list.length())
            .filter_map(|i| list.get(i))
            .map(Self::new)
            .collect()
    }
}

impl FileSource for BrowserFile {
    fn file_name(&self) -> &str {
        &self.name
    }

    fn mime_type(&self) -> &str {
        &self.mime
    }

    fn size(&self) -> u64 {
        self.file.size().max(0.0) as u64
    }
}

fn js_error(context: &str, value: JsValue) -> TransportError {
    TransportError(format!("{}: {:?}", context, value))
}

/// リクエスト1件分の `AbortController`
///
/// 破棄時に `abort()` するので、送信中のFutureを落とせばブラウザ側の送受信も止まる。
#[derive(Debug)]
pub struct FetchAbort {
    controller: AbortController,
}

impl FetchAbort {
    pub fn new() -> Result<Self, TransportError> {
        let controller = AbortController::new().map_err(|e| js_error("AbortController作成失敗", e))?;
        Ok(Self { controller })
    }

    pub fn signal(&self) -> AbortSignal {
        self.controller.signal()
    }
}

impl Drop for FetchAbort {
    fn drop(&mut self) {
        self.controller.abort();
    }
}

/// `window.fetch` によるクライアント
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchClient;

impl FetchClient {
    fn build(request: HttpRequest<BrowserFile>, signal: &AbortSignal) -> Result<Request, TransportError> {
        let headers = Headers::new().map_err(|e| js_error("Headers作成失敗", e))?;
        for (key, value) in &request.headers {
            headers
                .set(key, value)
                .map_err(|e| js_error("Header設定失敗", e))?;
        }

        let opts = RequestInit::new();
        opts.set_method(request.method.as_str());
        opts.set_mode(RequestMode::Cors);
        opts.set_signal(Some(signal));

        match request.body {
            RequestBody::Empty => {}
            RequestBody::Json(value) => {
                let body = serde_json::to_string(&value)
                    .map_err(|e| TransportError(format!("JSON変換失敗: {}", e)))?;
                opts.set_body(&JsValue::from_str(&body));
            }
            RequestBody::Multipart(parts) => {
                let form = FormData::new().map_err(|e| js_error("FormData作成失敗", e))?;
                for part in &parts {
                    form.append_with_blob_and_filename(&part.field, &part.file.file, part.file.file_name())
                        .map_err(|e| js_error("FormData追加失敗", e))?;
                }
                opts.set_body(&form);
            }
        }
        opts.set_headers(&headers);

        Request::new_with_str_and_init(&request.url, &opts).map_err(|e| js_error("Request作成失敗", e))
    }
}

#[async_trait(?Send)]
impl HttpClient for FetchClient {
    type File = BrowserFile;

    async fn send(&self, request: HttpRequest<BrowserFile>) -> Result<HttpReply, TransportError> {
        // 本文の読み込みが終わるまで保持する
        let abort = FetchAbort::new()?;
        let request = Self::build(request, &abort.signal())?;
        let window =
            web_sys::window().ok_or_else(|| TransportError("windowを取得できません".to_string()))?;

        let value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| js_error("fetch失敗", e))?;
        let response: Response = value.dyn_into().map_err(|e| js_error("Response変換失敗", e))?;

        let buffer = response
            .array_buffer()
            .map_err(|e| js_error("本文読み込み失敗", e))?;
        let buffer = JsFuture::from(buffer)
            .await
            .map_err(|e| js_error("本文読み込み失敗", e))?;
        let body = js_sys::Uint8Array::new(&buffer).to_vec();
        // 完了後のabortは何も起こさない
        drop(abort);

        Ok(HttpReply::new(response.status(), body).with_status_text(&response.status_text()))
    }
}
