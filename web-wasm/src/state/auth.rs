//! 認証コンテキスト
//!
//! `AuthService` の結果をリアクティブな `AuthState` に載せる。
//! コンテキストの寿命のあいだセッション通知を購読し、破棄時に解除する。
//! ルーターには認証状態を信号として渡すだけで、ここからは遷移しない。

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use ledgerlift_common::{
    ApiClient, AuthService, AuthState, Result, Session, SessionUser, SignUpDetails, Subscription,
    SupabaseAuth,
};

use crate::config::AppConfig;
use crate::web::{BrowserStorage, FetchClient};

type WebAuthService = AuthService<SupabaseAuth<FetchClient, BrowserStorage>, ApiClient<FetchClient>>;

#[derive(Clone, Copy)]
pub struct AuthContext {
    state: RwSignal<AuthState>,
    service: StoredValue<Rc<WebAuthService>, LocalStorage>,
    subscription: StoredValue<Option<Subscription>, LocalStorage>,
}

impl AuthContext {
    fn new(config: &AppConfig) -> Self {
        let provider = SupabaseAuth::new(
            FetchClient,
            config.auth_url.clone(),
            config.api_key.clone(),
            BrowserStorage,
        );
        let service = Rc::new(AuthService::new(provider, config.api_client()));

        let state = RwSignal::new(AuthState::initializing());
        let subscription = service.events().subscribe(move |event| {
            state.try_update(|s| s.apply(event));
        });

        Self {
            state,
            service: StoredValue::new_local(service),
            subscription: StoredValue::new_local(Some(subscription)),
        }
    }

    pub fn state(&self) -> Signal<AuthState> {
        self.state.into()
    }

    pub fn user(&self) -> Signal<Option<SessionUser>> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.user.clone()))
    }

    pub fn session(&self) -> Signal<Option<Session>> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.session.clone()))
    }

    /// ルーター注入用
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.is_authenticated()))
    }

    pub fn loading_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.loading))
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription
            .try_with_value(|s| s.is_some())
            .unwrap_or(false)
    }

    fn service(&self) -> Option<Rc<WebAuthService>> {
        self.service.try_get_value()
    }

    async fn init(self) {
        let Some(service) = self.service() else { return };
        let next = service.init().await;
        self.state.try_set(next);
    }

    /// プロファイルを取得できなかった場合は `Ok(false)`
    pub async fn sign_in(self, email: String, password: String) -> Result<bool> {
        let Some(service) = self.service() else { return Ok(false) };
        let next = service.sign_in(&email, &password).await?;
        let authenticated = next.is_authenticated();
        self.state.try_set(next);
        Ok(authenticated)
    }

    /// メール確認待ちでセッションが無い場合は `Ok(false)`
    pub async fn sign_up(
        self,
        email: String,
        password: String,
        details: SignUpDetails,
    ) -> Result<bool> {
        let Some(service) = self.service() else { return Ok(false) };
        let next = service.sign_up(&email, &password, &details).await?;
        let has_session = next.session.is_some();
        self.state.try_set(next);
        Ok(has_session)
    }

    pub async fn sign_out(self) {
        let Some(service) = self.service() else { return };
        let session = self.state.with_untracked(|s| s.session.clone());
        let next = service.sign_out(session.as_ref()).await;
        self.state.try_set(next);
    }

    /// 購読を解除する
    pub fn teardown(&self) {
        self.subscription.try_update_value(|s| s.take());
    }
}

/// 保存済みセッションの復元を開始し、コンテキストに登録する
pub fn provide_auth(config: &AppConfig) -> AuthContext {
    let ctx = AuthContext::new(config);
    provide_context(ctx);
    on_cleanup(move || ctx.teardown());
    spawn_local(ctx.init());
    ctx
}

pub fn use_auth() -> AuthContext {
    expect_context::<AuthContext>()
}
