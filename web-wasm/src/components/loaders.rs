//! ローディング表示

use gloo::timers::callback::Timeout;
use leptos::prelude::*;

#[component]
pub fn Spinner() -> impl IntoView {
    view! { <span class="spinner" aria-hidden="true"></span> }
}

#[component]
pub fn PageLoader() -> impl IntoView {
    view! {
        <div class="page-loader" role="status">
            <Spinner />
            <p class="text-muted">"Loading…"</p>
        </div>
    }
}

/// 行数分のスケルトン
#[component]
pub fn Skeleton(#[prop(default = 3)] lines: usize) -> impl IntoView {
    view! {
        <div class="skeleton" aria-hidden="true">
            {(0..lines).map(|_| view! { <div class="skeleton-line"></div> }).collect_view()}
        </div>
    }
}

/// 重いページは1ティック遅らせ、その間はローダーを出す
#[component]
pub fn LazyPage(children: ChildrenFn) -> impl IntoView {
    let ready = RwSignal::new(false);
    Timeout::new(0, move || {
        ready.try_set(true);
    })
    .forget();

    view! {
        <Show when=move || ready.get() fallback=|| view! { <PageLoader /> }>
            {children()}
        </Show>
    }
}
