use leptos::prelude::*;
use ledgerlift_common::Route;

use crate::content::FEATURES;
use crate::web::router::Link;

#[component]
pub fn FeaturesPage() -> impl IntoView {
    view! {
        <section class="section">
            <h1>"Features"</h1>
            <p class="lead">"Everything runs in the cloud. Upload a file, review the result, export it."</p>
            <div class="feature-grid">
                {FEATURES
                    .iter()
                    .map(|feature| {
                        let demo_link = feature.demo.map(|kind| {
                            view! {
                                <Link to=Route::for_demo(kind).to_path() class="btn btn-secondary btn-small">
                                    "Open demo"
                                </Link>
                            }
                        });
                        view! {
                            <article class="feature-card">
                                <h3>{feature.title}</h3>
                                <p>{feature.description}</p>
                                {demo_link}
                            </article>
                        }
                    })
                    .collect_view()}
            </div>
        </section>
    }
}
