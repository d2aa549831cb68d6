//! ブラウザAPIのラッパー
//!
//! `ledgerlift-common` のトレイト（HttpClient / KeyValueStore）をブラウザ上で実装する。

pub mod download;
pub mod http;
pub mod router;
pub mod storage;

pub use http::{BrowserFile, FetchAbort, FetchClient};
pub use storage::BrowserStorage;
