use leptos::prelude::*;

use crate::web::router::Link;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <section class="section not-found">
            <h1 class="text-error">"404"</h1>
            <p class="lead">"Page not found"</p>
            <Link to="/" class="btn btn-primary">"Back to home"</Link>
        </section>
    }
}
