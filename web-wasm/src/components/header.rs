//! ヘッダーコンポーネント

use leptos::prelude::*;
use leptos::task::spawn_local;
use ledgerlift_common::{DemoKind, Route, Theme};

use crate::components::loaders::Skeleton;
use crate::state::{use_auth, use_theme, use_toasts};
use crate::web::router::Link;

#[component]
fn ThemeToggle() -> impl IntoView {
    let theme = use_theme();
    let label = move || match theme.theme().get() {
        Theme::ProfessionalLight => "Dark mode",
        Theme::PremiumDark => "Light mode",
    };

    view! {
        <button class="btn btn-tertiary btn-small theme-toggle" on:click=move |_| theme.toggle_theme()>
            {label}
        </button>
    }
}

#[component]
fn AccountMenu() -> impl IntoView {
    let auth = use_auth();
    let toasts = use_toasts();

    let on_sign_out = move |_| {
        spawn_local(async move {
            auth.sign_out().await;
            toasts.info("You have been signed out");
        });
    };

    move || {
        let state = auth.state().get();
        if state.loading {
            view! { <div class="account-menu"><Skeleton lines=1 /></div> }.into_any()
        } else if state.is_authenticated() {
            let name = state
                .user
                .as_ref()
                .map(|u| if u.full_name.is_empty() { u.email.clone() } else { u.full_name.clone() })
                .unwrap_or_default();
            view! {
                <div class="account-menu">
                    <Link to=Route::Dashboard.to_path() class="nav-link">{name}</Link>
                    <button class="btn btn-secondary btn-small" on:click=on_sign_out>"Sign out"</button>
                </div>
            }
            .into_any()
        } else {
            view! {
                <div class="account-menu">
                    <Link to=Route::Login.to_path() class="nav-link">"Sign in"</Link>
                    <Link to=Route::Signup.to_path() class="btn btn-primary btn-small">"Start free trial"</Link>
                </div>
            }
            .into_any()
        }
    }
}

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <Link to="/" class="brand">
                <span class="brand-mark">"LL"</span>
                <span class="brand-name">"LedgerLift"</span>
            </Link>
            <nav class="main-nav">
                <Link to=Route::Features.to_path() class="nav-link">"Features"</Link>
                <Link to=Route::Pricing.to_path() class="nav-link">"Pricing"</Link>
                <Link to=Route::Blog.to_path() class="nav-link">"Blog"</Link>
                <Link to=Route::for_demo(DemoKind::BankRec).to_path() class="nav-link">"Try a demo"</Link>
            </nav>
            <div class="header-actions">
                <ThemeToggle />
                <AccountMenu />
            </div>
        </header>
    }
}
