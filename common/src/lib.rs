//! LedgerLift Common Library
//!
//! CLIとWeb(WASM)で共有されるアップロード処理・結果型・ストア

pub mod api;
pub mod auth;
pub mod demos;
pub mod error;
pub mod format;
pub mod http;
pub mod notice;
pub mod payload;
pub mod routes;
pub mod storage;
pub mod theme;
pub mod upload;

#[cfg(feature = "excel")]
pub mod report;

pub use api::{AnalyticsEvent, ApiClient, AttemptOutcome, DEFAULT_BASE_URL, NETWORK_FAILURE_MESSAGE};
pub use auth::{
    AuthEvent, AuthProvider, DEFAULT_AUTH_URL, AuthService, AuthState, AuthStore, ProfileLookup, Session, SessionEvents,
    SessionUser, SignUpDetails, SupabaseAuth, Subscription,
};
pub use demos::{DemoKind, DemoSpec};
pub use error::{Error, ErrorKind, Result, TransportError};
pub use http::{FileSource, FormPart, HttpClient, HttpReply, HttpRequest, Method, RequestBody};
pub use notice::{Notice, NoticeLevel};
pub use payload::{ResultPayload, ResultTable, SummaryCard, Tone};
pub use routes::Route;
pub use storage::{KeyValueStore, MemoryStore};
pub use theme::{Theme, ThemeStore};
pub use upload::{UploadController, UploadPhase};
