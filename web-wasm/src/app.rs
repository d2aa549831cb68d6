//! メインアプリケーションコンポーネント

use leptos::prelude::*;
use ledgerlift_common::{DemoKind, Route};

use crate::components::{footer::Footer, header::Header, loaders::LazyPage, toast_host::ToastHost};
use crate::config::AppConfig;
use crate::pages::{
    auth::{LoginPage, SignupPage},
    blog::{BlogPage, BlogPostPage},
    dashboard::DashboardPage,
    demo::demo_view,
    features::FeaturesPage,
    home::HomePage,
    not_found::NotFoundPage,
    pricing::PricingPage,
};
use crate::state::{provide_api, provide_auth, provide_theme, provide_toasts};
use crate::web::router::{Link, Router, RouterOutlet};

fn render_page(route: Route) -> AnyView {
    match route {
        Route::Home => view! { <HomePage /> }.into_any(),
        Route::Pricing => view! { <PricingPage /> }.into_any(),
        Route::Features => view! { <FeaturesPage /> }.into_any(),
        Route::Blog => view! { <BlogPage /> }.into_any(),
        Route::BlogPost(slug) => view! { <BlogPostPage slug=slug /> }.into_any(),
        Route::Login => view! { <LoginPage /> }.into_any(),
        Route::Signup => view! { <SignupPage /> }.into_any(),
        Route::Dashboard => view! { <DashboardPage /> }.into_any(),
        Route::InvoiceService => demo_view(DemoKind::Invoice),
        Route::Demo(kind) => demo_view(kind),
        Route::NotFound => view! { <NotFoundPage /> }.into_any(),
    }
}

/// ルートとページの対応表。重いページはローダーを挟む
fn route_matcher(route: Route) -> AnyView {
    if route.is_heavy() {
        view! { <LazyPage>{render_page(route.clone())}</LazyPage> }.into_any()
    } else {
        render_page(route)
    }
}

#[component]
pub fn App() -> impl IntoView {
    let config = AppConfig::from_build_env();
    provide_api(config.api_client());
    provide_toasts();
    provide_theme();
    let auth = provide_auth(&config);

    view! {
        <Router is_authenticated=auth.is_authenticated_signal() auth_loading=auth.loading_signal()>
            <div class="app">
                <Header />
                <main class="main-content">
                    <ErrorBoundary fallback={|errors: ArcRwSignal<Errors>| {
                        view! {
                            <section class="section error-page">
                                <h1>"Something went wrong"</h1>
                                <ul>
                                    {move || {
                                        errors
                                            .read()
                                            .iter()
                                            .map(|(_, e)| view! { <li>{e.to_string()}</li> })
                                            .collect_view()
                                    }}
                                </ul>
                                <Link to="/" class="btn btn-primary">"Back to home"</Link>
                            </section>
                        }
                    }}>
                        <RouterOutlet matcher=route_matcher />
                    </ErrorBoundary>
                </main>
                <Footer />
                <ToastHost />
            </div>
        </Router>
    }
}
