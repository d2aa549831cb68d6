//! reqwestによる `HttpClient` とローカルファイル

use async_trait::async_trait;
use ledgerlift_common::http::{FileSource, HttpClient, HttpReply, HttpRequest, Method, RequestBody};
use ledgerlift_common::TransportError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{LedgerLiftError, Result};

/// アップロード対象のローカルファイル
#[derive(Debug, Clone)]
pub struct LocalFile {
    path: PathBuf,
    name: String,
    mime: String,
    size: u64,
    contents: Option<Arc<[u8]>>,
}

/// 存在しない場合だけ `FileNotFound`、それ以外はIOエラーのまま返す
fn file_error(path: &Path, error: std::io::Error) -> LedgerLiftError {
    if error.kind() == ErrorKind::NotFound {
        LedgerLiftError::FileNotFound(path.display().to_string())
    } else {
        LedgerLiftError::Io(error)
    }
}

impl LocalFile {
    /// メタデータを読んで作成（中身は `load` で読む）
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path).map_err(|e| file_error(path, e))?;
        if !metadata.is_file() {
            return Err(LedgerLiftError::FileNotFound(path.display().to_string()));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        // 推測できない拡張子は空にして拡張子判定に任せる
        let mime = mime_guess::from_path(path)
            .first()
            .map(|m| m.essence_str().to_string())
            .unwrap_or_default();

        Ok(Self {
            path: path.to_path_buf(),
            name,
            mime,
            size: metadata.len(),
            contents: None,
        })
    }

    /// 中身を読み込んだコピーを返す
    ///
    /// 検証後・送信前に呼ぶ。読み込み失敗は送信エラーではなくファイルのエラーになる。
    pub fn load(&self) -> Result<Self> {
        let bytes = std::fs::read(&self.path).map_err(|e| file_error(&self.path, e))?;
        Ok(Self {
            size: bytes.len() as u64,
            contents: Some(Arc::from(bytes)),
            ..self.clone()
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.contents.is_some()
    }
}

impl FileSource for LocalFile {
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

#[derive(Debug, Clone, Default)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    pub fn new() -> Self {
        Self::default()
    }

    async fn multipart(parts: Vec<ledgerlift_common::FormPart<LocalFile>>) -> std::result::Result<reqwest::multipart::Form, TransportError> {
        let mut form = reqwest::multipart::Form::new();
        for part in parts {
            let bytes = match &part.file.contents {
                Some(contents) => contents.to_vec(),
                None => tokio::fs::read(part.file.path())
                    .await
                    .map_err(|e| TransportError(format!("{}の読み込み失敗: {}", part.file.path().display(), e)))?,
            };
            let mut file_part = reqwest::multipart::Part::bytes(bytes).file_name(part.file.name.clone());
            if !part.file.mime.is_empty() {
                file_part = file_part
                    .mime_str(&part.file.mime)
                    .map_err(|e| TransportError(format!("MIMEタイプ不正: {}", e)))?;
            }
            form = form.part(part.field, file_part);
        }
        Ok(form)
    }
}

#[async_trait(?Send)]
impl HttpClient for ReqwestClient {
    type File = LocalFile;

    async fn send(&self, request: HttpRequest<LocalFile>) -> std::result::Result<HttpReply, TransportError> {
        tracing::debug!(method = request.method.as_str(), url = %request.url, "sending request");

        let mut builder = match request.method {
            Method::Get => self.inner.get(&request.url),
            Method::Post => self.inner.post(&request.url),
        };
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(parts) => builder.multipart(Self::multipart(parts).await?),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError(format!("リクエスト失敗: {}", e)))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError(format!("レスポンス読み込み失敗: {}", e)))?;

        tracing::debug!(status = status.as_u16(), bytes = body.len(), "received reply");
        Ok(HttpReply::new(status.as_u16(), body.to_vec())
            .with_status_text(status.canonical_reason().unwrap_or_default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_error_kinds() {
        let path = Path::new("bank.csv");
        let missing = file_error(path, std::io::Error::from(ErrorKind::NotFound));
        assert!(matches!(missing, LedgerLiftError::FileNotFound(p) if p == "bank.csv"));

        let denied = file_error(path, std::io::Error::from(ErrorKind::PermissionDenied));
        match denied {
            LedgerLiftError::Io(e) => assert_eq!(e.kind(), ErrorKind::PermissionDenied),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_loaded_contents_survive_file_removal() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("bank.csv");
        std::fs::write(&path, "a,b\n").unwrap();

        let file = LocalFile::open(&path).unwrap().load().unwrap();
        std::fs::remove_file(&path).unwrap();

        let parts = vec![ledgerlift_common::FormPart {
            field: "bank_file".to_string(),
            file,
        }];
        assert!(ReqwestClient::multipart(parts).await.is_ok());
    }
}
