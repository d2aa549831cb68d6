use leptos::prelude::*;
use ledgerlift_common::{DemoSpec, Route};

use crate::content::FEATURES;
use crate::web::router::Link;

#[component]
pub fn DemoGrid() -> impl IntoView {
    view! {
        <div class="demo-grid">
            {DemoSpec::all()
                .map(|spec| {
                    view! {
                        <article class="demo-card">
                            <h3>{spec.title}</h3>
                            <p class="text-muted">{spec.tagline}</p>
                            <Link to=Route::for_demo(spec.kind).to_path() class="btn btn-secondary btn-small">
                                "Try it"
                            </Link>
                        </article>
                    }
                })
                .collect_view()}
        </div>
    }
}

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <section class="hero">
            <h1>"Month-end, without the manual matching"</h1>
            <p class="lead">
                "LedgerLift reads invoices, reconciles statements and summarises annual reports \
                 so your team only reviews the exceptions."
            </p>
            <div class="hero-actions">
                <Link to=Route::Signup.to_path() class="btn btn-primary">"Start free trial"</Link>
                <Link to=Route::Features.to_path() class="btn btn-tertiary">"See how it works"</Link>
            </div>
        </section>

        <section class="section">
            <h2>"Try it with your own files"</h2>
            <p class="text-muted">"No account needed. Files are processed and discarded."</p>
            <DemoGrid />
        </section>

        <section class="section">
            <h2>"Built for accounting firms"</h2>
            <ul class="feature-list">
                {FEATURES
                    .iter()
                    .take(4)
                    .map(|feature| view! { <li><strong>{feature.title}</strong>": "{feature.description}</li> })
                    .collect_view()}
            </ul>
        </section>
    }
}
