//! アプリ全体で共有するコンテキスト（認証・テーマ・トースト）

pub mod auth;
pub mod theme;
pub mod toast;

pub use auth::{provide_auth, use_auth, AuthContext};
pub use theme::{provide_theme, use_theme, ThemeContext};
pub use toast::{provide_toasts, use_toasts, Toast, ToastContext};

use ledgerlift_common::ApiClient;
use leptos::prelude::*;

use crate::web::FetchClient;

pub type WebApi = ApiClient<FetchClient>;

pub fn provide_api(api: WebApi) {
    provide_context(api);
}

pub fn use_api() -> WebApi {
    expect_context::<WebApi>()
}
