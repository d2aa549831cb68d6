//! 認証
//!
//! 資格情報の検証はホスト型の認証サービス（Supabase GoTrue）に任せ、
//! 成功後にアプリ側のプロファイルをバックエンドから取得する。
//! プロファイル取得の失敗はエラーにせず `user = None` とする。

use crate::api::ApiClient;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpReply, HttpRequest};
use crate::storage::KeyValueStore;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// 認証サービスの既定URL
pub const DEFAULT_AUTH_URL: &str = "https://ledgerlift.supabase.co";

/// セッションの保存キー
pub const SESSION_STORAGE_KEY: &str = "ledgerlift.auth.session";

/// アプリ側のユーザープロファイル
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "full_name")]
    pub full_name: String,
    #[serde(default, alias = "firm_id")]
    pub firm_id: String,
    #[serde(default, alias = "firm_name")]
    pub firm_name: String,
    #[serde(default)]
    pub role: String,
}

/// 認証サービスのセッション
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    /// 失効時刻（UNIX秒）
    pub expires_at: i64,
    pub user_id: String,
    #[serde(default)]
    pub email: String,
}

impl Session {
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at <= now
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(chrono::Utc::now().timestamp())
    }
}

/// サインアップ時の追加情報
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SignUpDetails {
    pub full_name: String,
    pub firm_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    SignedIn(Session),
    SignedOut,
    Expired,
}

type Listener = Rc<dyn Fn(&AuthEvent)>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

/// セッション変更の購読窓口
#[derive(Clone, Default)]
pub struct SessionEvents {
    inner: Rc<RefCell<Listeners>>,
}

impl fmt::Debug for SessionEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionEvents")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl SessionEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// 購読する。戻り値を破棄すると購読解除
    pub fn subscribe(&self, listener: impl Fn(&AuthEvent) + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.entries.push((id, Rc::new(listener)));
        Subscription {
            id,
            events: Rc::downgrade(&self.inner),
        }
    }

    pub fn emit(&self, event: &AuthEvent) {
        // コールバック内から購読・解除できるよう、呼ぶ前に借用を外す
        let listeners: Vec<Listener> = self
            .inner
            .borrow()
            .entries
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().entries.len()
    }
}

pub struct Subscription {
    id: u64,
    events: Weak<RefCell<Listeners>>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.events.upgrade() {
            inner.borrow_mut().entries.retain(|(id, _)| *id != self.id);
        }
    }
}

/// ホスト型認証サービス
#[async_trait(?Send)]
pub trait AuthProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session>;

    /// メール確認が必要な設定ではセッションが返らない
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        details: &SignUpDetails,
    ) -> Result<Option<Session>>;

    async fn sign_out(&self, session: &Session) -> Result<()>;

    /// 保存済みセッションを読み込む。失効していれば破棄して `Expired` を通知
    fn restore_session(&self) -> Option<Session>;

    fn current_session(&self) -> Option<Session>;

    fn events(&self) -> &SessionEvents;
}

/// アプリ側プロファイルの取得
#[async_trait(?Send)]
pub trait ProfileLookup {
    async fn lookup_profile(&self, user_id: &str) -> Result<Option<SessionUser>>;
}

#[async_trait(?Send)]
impl<C: HttpClient> ProfileLookup for ApiClient<C> {
    async fn lookup_profile(&self, user_id: &str) -> Result<Option<SessionUser>> {
        self.fetch_profile(user_id).await
    }
}

#[derive(Deserialize)]
struct GoTrueUser {
    id: String,
    #[serde(default)]
    email: String,
}

#[derive(Deserialize)]
struct GoTrueSession {
    access_token: String,
    #[serde(default)]
    refresh_token: String,
    #[serde(default)]
    expires_in: i64,
    #[serde(default)]
    expires_at: Option<i64>,
    user: GoTrueUser,
}

impl GoTrueSession {
    fn into_session(self, now: i64) -> Session {
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at: self.expires_at.unwrap_or(now + self.expires_in),
            user_id: self.user.id,
            email: self.user.email,
        }
    }
}

/// GoTrueのエラー本文からメッセージを取り出す
fn gotrue_error(reply: &HttpReply) -> String {
    if let Ok(value) = reply.json::<serde_json::Value>() {
        for key in ["error_description", "msg", "message", "error"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                if !text.trim().is_empty() {
                    return text.to_string();
                }
            }
        }
    }
    format!("Request failed with status {}", reply.status)
}

/// Supabase GoTrue REST API による実装
#[derive(Debug)]
pub struct SupabaseAuth<C, S> {
    client: C,
    auth_url: String,
    anon_key: String,
    store: S,
    events: SessionEvents,
    current: RefCell<Option<Session>>,
}

impl<C: HttpClient, S: KeyValueStore> SupabaseAuth<C, S> {
    pub fn new(client: C, auth_url: impl Into<String>, anon_key: impl Into<String>, store: S) -> Self {
        Self {
            client,
            auth_url: auth_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            store,
            events: SessionEvents::new(),
            current: RefCell::new(None),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    fn url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.auth_url, path)
    }

    fn request(&self, path: &str, bearer: &str) -> HttpRequest<C::File> {
        HttpRequest::post(self.url(path))
            .header("apikey", &self.anon_key)
            .header("Content-Type", "application/json")
            .bearer(bearer)
    }

    async fn send(&self, request: HttpRequest<C::File>) -> Result<HttpReply> {
        let reply = self.client.send(request).await?;
        if !reply.is_success() {
            return Err(Error::Auth(gotrue_error(&reply)));
        }
        Ok(reply)
    }

    fn store_session(&self, session: &Session) {
        match serde_json::to_string(session) {
            Ok(json) => {
                if let Err(e) = self.store.set(SESSION_STORAGE_KEY, &json) {
                    log::warn!("failed to persist session: {}", e);
                }
            }
            Err(e) => log::warn!("failed to serialize session: {}", e),
        }
        *self.current.borrow_mut() = Some(session.clone());
    }

    fn clear_session(&self) {
        self.store.remove(SESSION_STORAGE_KEY);
        *self.current.borrow_mut() = None;
    }

    fn signed_in(&self, session: Session) -> Session {
        self.store_session(&session);
        self.events.emit(&AuthEvent::SignedIn(session.clone()));
        session
    }
}

#[async_trait(?Send)]
impl<C: HttpClient, S: KeyValueStore> AuthProvider for SupabaseAuth<C, S> {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let request = self
            .request("token?grant_type=password", &self.anon_key)
            .json(serde_json::json!({ "email": email, "password": password }));
        let reply = self.send(request).await?;
        let body: GoTrueSession = reply
            .json()
            .map_err(|e| Error::InvalidResponse(e.to_string()))?;
        let session = body.into_session(chrono::Utc::now().timestamp());
        log::debug!("signed in as {}", session.user_id);
        Ok(self.signed_in(session))
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        details: &SignUpDetails,
    ) -> Result<Option<Session>> {
        let request = self.request("signup", &self.anon_key).json(serde_json::json!({
            "email": email,
            "password": password,
            "data": details,
        }));
        let reply = self.send(request).await?;
        // 自動確認ならセッション付き、メール確認待ちならユーザーのみ
        match reply.json::<GoTrueSession>() {
            Ok(body) => {
                let session = body.into_session(chrono::Utc::now().timestamp());
                Ok(Some(self.signed_in(session)))
            }
            Err(_) => {
                log::debug!("sign-up pending email confirmation");
                Ok(None)
            }
        }
    }

    async fn sign_out(&self, session: &Session) -> Result<()> {
        let request = self.request("logout", &session.access_token);
        let result = self.send(request).await.map(|_| ());
        // 失効に失敗してもローカルは消す
        self.clear_session();
        self.events.emit(&AuthEvent::SignedOut);
        result
    }

    fn restore_session(&self) -> Option<Session> {
        let raw = self.store.get(SESSION_STORAGE_KEY)?;
        let session: Session = match serde_json::from_str(&raw) {
            Ok(session) => session,
            Err(e) => {
                log::warn!("discarding unreadable stored session: {}", e);
                self.clear_session();
                return None;
            }
        };
        if session.is_expired() {
            log::debug!("stored session expired");
            self.clear_session();
            self.events.emit(&AuthEvent::Expired);
            return None;
        }
        *self.current.borrow_mut() = Some(session.clone());
        Some(session)
    }

    fn current_session(&self) -> Option<Session> {
        self.current.borrow().clone()
    }

    fn events(&self) -> &SessionEvents {
        &self.events
    }
}

/// 画面が参照する認証状態
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuthState {
    pub user: Option<SessionUser>,
    pub session: Option<Session>,
    pub loading: bool,
}

impl AuthState {
    /// 初期化前の状態
    pub fn initializing() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    /// プロファイルを取得できていないセッションは未ログイン扱い
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some() && self.user.is_some()
    }

    /// 認証サービスからの通知を反映する
    ///
    /// 別ユーザーでのサインインではプロファイルを捨てる（再取得は呼び出し側）。
    pub fn apply(&mut self, event: &AuthEvent) {
        match event {
            AuthEvent::SignedIn(session) => {
                let same_user = self
                    .user
                    .as_ref()
                    .map(|u| u.id == session.user_id)
                    .unwrap_or(false);
                if !same_user {
                    self.user = None;
                }
                self.session = Some(session.clone());
            }
            AuthEvent::SignedOut | AuthEvent::Expired => {
                self.user = None;
                self.session = None;
            }
        }
        self.loading = false;
    }
}

/// 認証サービスとプロファイル取得の組み合わせ
#[derive(Debug)]
pub struct AuthService<P, L> {
    provider: P,
    profiles: L,
}

impl<P: AuthProvider, L: ProfileLookup> AuthService<P, L> {
    pub fn new(provider: P, profiles: L) -> Self {
        Self { provider, profiles }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn events(&self) -> &SessionEvents {
        self.provider.events()
    }

    /// セッションに対応するプロファイル。取得失敗は `None`
    pub async fn profile_for(&self, session: &Session) -> Option<SessionUser> {
        match self.profiles.lookup_profile(&session.user_id).await {
            Ok(user) => user,
            Err(e) => {
                log::warn!("profile lookup failed for {}: {}", session.user_id, e);
                None
            }
        }
    }

    async fn state_for(&self, session: Option<Session>) -> AuthState {
        let user = match &session {
            Some(session) => self.profile_for(session).await,
            None => None,
        };
        AuthState {
            user,
            session,
            loading: false,
        }
    }

    /// 保存済みセッションから状態を復元
    pub async fn init(&self) -> AuthState {
        let session = self.provider.restore_session();
        self.state_for(session).await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthState> {
        let session = self.provider.sign_in(email, password).await?;
        Ok(self.state_for(Some(session)).await)
    }

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        details: &SignUpDetails,
    ) -> Result<AuthState> {
        let session = self.provider.sign_up(email, password, details).await?;
        Ok(self.state_for(session).await)
    }

    /// サインアウト。失効の成否にかかわらず空の状態を返す
    pub async fn sign_out(&self, session: Option<&Session>) -> AuthState {
        if let Some(session) = session {
            if let Err(e) = self.provider.sign_out(session).await {
                log::warn!("session revoke failed: {}", e);
            }
        }
        AuthState::default()
    }
}

/// 状態を保持し、生存中はセッション通知を購読するストア
pub struct AuthStore<P, L> {
    service: AuthService<P, L>,
    state: Rc<RefCell<AuthState>>,
    subscription: Option<Subscription>,
}

impl<P: AuthProvider, L: ProfileLookup> AuthStore<P, L> {
    pub fn new(service: AuthService<P, L>) -> Self {
        let state = Rc::new(RefCell::new(AuthState::initializing()));
        let target = Rc::clone(&state);
        let subscription = service
            .events()
            .subscribe(move |event| target.borrow_mut().apply(event));
        Self {
            service,
            state,
            subscription: Some(subscription),
        }
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn user(&self) -> Option<SessionUser> {
        self.state.borrow().user.clone()
    }

    pub fn session(&self) -> Option<Session> {
        self.state.borrow().session.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    fn replace(&self, next: AuthState) {
        *self.state.borrow_mut() = next;
    }

    pub async fn init(&self) {
        let next = self.service.init().await;
        self.replace(next);
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<()> {
        let next = self.service.sign_in(email, password).await?;
        self.replace(next);
        Ok(())
    }

    pub async fn sign_up(&self, email: &str, password: &str, details: &SignUpDetails) -> Result<()> {
        let next = self.service.sign_up(email, password, details).await?;
        self.replace(next);
        Ok(())
    }

    pub async fn sign_out(&self) {
        let session = self.session();
        let next = self.service.sign_out(session.as_ref()).await;
        self.replace(next);
    }

    /// 購読を解除する
    pub fn teardown(&mut self) {
        self.subscription = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::mock::MockHttpClient;
    use crate::storage::MemoryStore;
    use futures::executor::block_on;
    use std::cell::Cell;

    const TOKEN_REPLY: &str = r#"{
        "access_token": "at-1",
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": "rt-1",
        "user": {"id": "u1", "email": "ada@example.com"}
    }"#;

    const PROFILE_REPLY: &str =
        r#"{"user":{"id":"u1","email":"ada@example.com","fullName":"Ada Lovelace","firmId":"f1","firmName":"Lovelace & Co","role":"owner"}}"#;

    type Auth = SupabaseAuth<MockHttpClient, MemoryStore>;
    type Service = AuthService<Auth, ApiClient<MockHttpClient>>;

    fn auth(client: MockHttpClient, store: &MemoryStore) -> Auth {
        SupabaseAuth::new(client, "https://auth.example.com/", "anon", store.clone())
    }

    fn profiles(client: MockHttpClient) -> ApiClient<MockHttpClient> {
        ApiClient::new(client, "https://api.example.com/fn", "anon")
    }

    fn session(expires_at: i64) -> Session {
        Session {
            access_token: "at-0".into(),
            refresh_token: "rt-0".into(),
            expires_at,
            user_id: "u1".into(),
            email: "ada@example.com".into(),
        }
    }

    #[test]
    fn test_sign_in_fetches_profile() {
        let store = MemoryStore::new();
        let service: Service = AuthService::new(
            auth(MockHttpClient::new().reply(200, TOKEN_REPLY), &store),
            profiles(MockHttpClient::new().reply(200, PROFILE_REPLY)),
        );
        let state = block_on(service.sign_in("ada@example.com", "pw")).expect("sign in");
        assert_eq!(state.user.map(|u| u.firm_name), Some("Lovelace & Co".to_string()));
        assert_eq!(state.session.map(|s| s.access_token), Some("at-1".to_string()));
        assert!(store.get(SESSION_STORAGE_KEY).is_some());

        let request = service.provider().client().last_request().expect("sent");
        assert_eq!(request.url, "https://auth.example.com/auth/v1/token?grant_type=password");
        assert_eq!(request.header_value("apikey"), Some("anon"));
    }

    #[test]
    fn test_profile_failure_leaves_user_empty() {
        for profile in [
            MockHttpClient::new().reply(503, ""),
            MockHttpClient::new().reply(404, ""),
            MockHttpClient::new().fail("offline"),
        ] {
            let store = MemoryStore::new();
            let service: Service = AuthService::new(
                auth(MockHttpClient::new().reply(200, TOKEN_REPLY), &store),
                profiles(profile),
            );
            let state = block_on(service.sign_in("ada@example.com", "pw")).expect("no error");
            assert!(state.user.is_none());
            assert!(state.session.is_some());
            assert!(!state.loading);
        }
    }

    #[test]
    fn test_session_without_profile_is_signed_out() {
        let store = MemoryStore::new();
        let service: Service = AuthService::new(
            auth(MockHttpClient::new().reply(200, TOKEN_REPLY), &store),
            profiles(MockHttpClient::new().reply(503, "")),
        );
        let state = block_on(service.sign_in("ada@example.com", "pw")).expect("no error");
        assert!(state.session.is_some());
        assert!(!state.is_authenticated());

        let mut with_profile = state.clone();
        with_profile.user = Some(SessionUser {
            id: "u1".into(),
            email: "ada@example.com".into(),
            full_name: String::new(),
            firm_id: String::new(),
            firm_name: String::new(),
            role: String::new(),
        });
        assert!(with_profile.is_authenticated());
    }

    #[test]
    fn test_bad_credentials_error() {
        let store = MemoryStore::new();
        let provider = auth(
            MockHttpClient::new().reply(400, r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#),
            &store,
        );
        let err = block_on(provider.sign_in("ada@example.com", "nope")).unwrap_err();
        assert_eq!(err.to_string(), "Authentication failed: Invalid login credentials");
        assert!(provider.current_session().is_none());
    }

    #[test]
    fn test_sign_up_pending_confirmation() {
        let store = MemoryStore::new();
        let provider = auth(
            MockHttpClient::new().reply(200, r#"{"id":"u2","email":"new@example.com"}"#),
            &store,
        );
        let details = SignUpDetails {
            full_name: "New User".into(),
            firm_name: "New & Co".into(),
        };
        let session = block_on(provider.sign_up("new@example.com", "pw", &details)).expect("ok");
        assert!(session.is_none());
        let request = provider.client().last_request().expect("sent");
        match request.body {
            crate::http::RequestBody::Json(body) => {
                assert_eq!(body["data"]["firm_name"], "New & Co");
            }
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[test]
    fn test_sign_out_clears_even_if_revoke_fails() {
        let store = MemoryStore::new();
        let provider = auth(
            MockHttpClient::new().reply(200, TOKEN_REPLY).fail("offline"),
            &store,
        );
        let service: Service = AuthService::new(provider, profiles(MockHttpClient::new().reply(200, PROFILE_REPLY)));
        let mut auth_store = AuthStore::new(service);
        block_on(auth_store.sign_in("ada@example.com", "pw")).expect("sign in");
        assert!(auth_store.user().is_some());

        block_on(auth_store.sign_out());
        assert!(auth_store.user().is_none());
        assert!(auth_store.session().is_none());
        assert!(store.get(SESSION_STORAGE_KEY).is_none());
        auth_store.teardown();
    }

    #[test]
    fn test_restore_valid_session() {
        let store = MemoryStore::new();
        let saved = session(chrono::Utc::now().timestamp() + 3600);
        store
            .set(SESSION_STORAGE_KEY, &serde_json::to_string(&saved).expect("json"))
            .expect("set");
        let service: Service = AuthService::new(
            auth(MockHttpClient::new(), &store),
            profiles(MockHttpClient::new().reply(200, PROFILE_REPLY)),
        );
        let state = block_on(service.init());
        assert_eq!(state.session, Some(saved));
        assert_eq!(state.user.map(|u| u.full_name), Some("Ada Lovelace".to_string()));
    }

    #[test]
    fn test_expired_session_discarded_with_event() {
        let store = MemoryStore::new();
        store
            .set(SESSION_STORAGE_KEY, &serde_json::to_string(&session(1)).expect("json"))
            .expect("set");
        let provider = auth(MockHttpClient::new(), &store);
        let expired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&expired);
        let _sub = provider.events().subscribe(move |event| {
            if *event == AuthEvent::Expired {
                flag.set(true);
            }
        });

        assert!(provider.restore_session().is_none());
        assert!(expired.get());
        assert!(store.get(SESSION_STORAGE_KEY).is_none());
    }

    #[test]
    fn test_store_follows_events_until_teardown() {
        let store = MemoryStore::new();
        let service: Service = AuthService::new(
            auth(MockHttpClient::new(), &store),
            profiles(MockHttpClient::new()),
        );
        let events = service.events().clone();
        let mut auth_store = AuthStore::new(service);
        assert!(auth_store.is_loading());
        assert_eq!(events.listener_count(), 1);

        events.emit(&AuthEvent::SignedIn(session(i64::MAX)));
        assert!(auth_store.session().is_some());
        assert!(!auth_store.is_loading());

        events.emit(&AuthEvent::SignedOut);
        assert!(auth_store.session().is_none());

        auth_store.teardown();
        assert!(!auth_store.is_subscribed());
        assert_eq!(events.listener_count(), 0);
        events.emit(&AuthEvent::SignedIn(session(i64::MAX)));
        assert!(auth_store.session().is_none());
    }

    #[test]
    fn test_apply_keeps_profile_for_same_user() {
        let mut state = AuthState {
            user: Some(SessionUser {
                id: "u1".into(),
                email: String::new(),
                full_name: "Ada".into(),
                firm_id: String::new(),
                firm_name: String::new(),
                role: String::new(),
            }),
            session: None,
            loading: false,
        };
        state.apply(&AuthEvent::SignedIn(session(i64::MAX)));
        assert!(state.user.is_some());

        let mut other = session(i64::MAX);
        other.user_id = "u9".into();
        state.apply(&AuthEvent::SignedIn(other));
        assert!(state.user.is_none());
    }

    #[test]
    fn test_snake_case_profile_accepted() {
        let user: SessionUser =
            serde_json::from_str(r#"{"id":"u1","full_name":"Ada","firm_name":"Co"}"#).expect("parse");
        assert_eq!(user.full_name, "Ada");
        assert_eq!(user.firm_name, "Co");
    }
}
