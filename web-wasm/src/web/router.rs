//! ルーターサービス
//!
//! History APIの操作はこのモジュールに集約する。
//! 流れは「要求 → ガード → 履歴更新 → ルート信号更新」。
//! 認証状態は外から信号で注入し、認証モジュールには依存しない。

use leptos::prelude::*;
use ledgerlift_common::Route;
use wasm_bindgen::prelude::*;

fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// リダイレクト用（履歴を増やさない）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

fn scroll_to_top() {
    if let Some(window) = web_sys::window() {
        window.scroll_to_with_x_and_y(0.0, 0.0);
    }
}

/// 認証ガードの判定結果
fn guard(target: Route, is_authenticated: bool, auth_loading: bool) -> Route {
    if target.requires_auth() && !is_authenticated && !auth_loading {
        Route::auth_failure_redirect()
    } else if target.should_redirect_when_authenticated() && is_authenticated {
        Route::auth_success_redirect()
    } else {
        target
    }
}

#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: RwSignal<Route>,
    is_authenticated: Signal<bool>,
    /// 認証の初期化中はガードで追い出さない
    auth_loading: Signal<bool>,
}

impl RouterService {
    fn new(is_authenticated: Signal<bool>, auth_loading: Signal<bool>) -> Self {
        let initial = Route::from_path(&current_path());
        Self {
            current_route: RwSignal::new(initial),
            is_authenticated,
            auth_loading,
        }
    }

    pub fn current_route(&self) -> Signal<Route> {
        self.current_route.into()
    }

    pub fn navigate(&self, path: &str) {
        self.navigate_to_route(Route::from_path(path), true);
    }

    pub fn go(&self, route: Route) {
        self.navigate_to_route(route, true);
    }

    fn navigate_to_route(&self, target: Route, use_push: bool) {
        let resolved = guard(
            target.clone(),
            self.is_authenticated.get_untracked(),
            self.auth_loading.get_untracked(),
        );
        if resolved != target {
            web_sys::console::log_1(
                &format!("[Router] {} redirected to {}", target, resolved).into(),
            );
        }

        let path = resolved.to_path();
        if use_push {
            push_history_state(&path);
        } else {
            replace_history_state(&path);
        }
        self.current_route.set(resolved);
        scroll_to_top();
    }

    /// ブラウザの戻る・進む
    fn init_popstate_listener(&self) {
        let router = *self;
        let closure = Closure::<dyn Fn()>::new(move || {
            let target = Route::from_path(&current_path());
            let resolved = guard(
                target.clone(),
                router.is_authenticated.get_untracked(),
                router.auth_loading.get_untracked(),
            );
            if resolved != target {
                replace_history_state(&resolved.to_path());
            }
            router.current_route.set(resolved);
        });

        if let Some(window) = web_sys::window() {
            let _ = window.add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // アプリと同じ寿命なので解放しない
        closure.forget();
    }

    /// 認証状態が変わったら今いるページを再判定する
    fn setup_auth_redirect(&self) {
        let router = *self;
        Effect::new(move |_| {
            let is_auth = router.is_authenticated.get();
            let loading = router.auth_loading.get();
            let route = router.current_route.get_untracked();

            let resolved = guard(route.clone(), is_auth, loading);
            if resolved != route {
                web_sys::console::log_1(
                    &format!("[Router] auth state changed, redirecting to {}", resolved).into(),
                );
                router.navigate_to_route(resolved, false);
            }
        });
    }

    /// タブのタイトルを追従させる
    fn setup_document_title(&self) {
        let current_route = self.current_route;
        Effect::new(move |_| {
            let route = current_route.get();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                let title = match route {
                    Route::Home => route.title(),
                    other => format!("{} | LedgerLift", other.title()),
                };
                document.set_title(&title);
            }
        });
    }
}

fn provide_router(is_authenticated: Signal<bool>, auth_loading: Signal<bool>) -> RouterService {
    let router = RouterService::new(is_authenticated, auth_loading);
    router.init_popstate_listener();
    router.setup_auth_redirect();
    router.setup_document_title();
    provide_context(router);
    router
}

pub fn use_router() -> RouterService {
    expect_context::<RouterService>()
}

/// ルーターのルート。App直下に置く
#[component]
pub fn Router(
    is_authenticated: Signal<bool>,
    auth_loading: Signal<bool>,
    children: Children,
) -> impl IntoView {
    provide_router(is_authenticated, auth_loading);
    children()
}

/// 現在のルートに対応するビューを描画する
#[component]
pub fn RouterOutlet(matcher: fn(Route) -> AnyView) -> impl IntoView {
    let router = use_router();
    move || matcher(router.current_route().get())
}

/// SPA内遷移するリンク
#[component]
pub fn Link(
    #[prop(into)] to: String,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();
    let target = to.clone();
    let on_click = move |ev: web_sys::MouseEvent| {
        // 新しいタブで開く操作はブラウザに任せる
        if ev.ctrl_key() || ev.meta_key() || ev.shift_key() || ev.button() != 0 {
            return;
        }
        ev.prevent_default();
        router.navigate(&target);
    };

    view! {
        <a href=to class=class on:click=on_click>
            {children()}
        </a>
    }
}
