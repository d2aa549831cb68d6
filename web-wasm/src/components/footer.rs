use leptos::prelude::*;
use ledgerlift_common::{DemoSpec, Route};

use crate::web::router::Link;

#[component]
pub fn Footer() -> impl IntoView {
    let year = js_sys::Date::new_0().get_full_year();

    view! {
        <footer class="footer">
            <div class="footer-columns">
                <div>
                    <h4>"Product"</h4>
                    <Link to=Route::Features.to_path()>"Features"</Link>
                    <Link to=Route::Pricing.to_path()>"Pricing"</Link>
                    <Link to=Route::Blog.to_path()>"Blog"</Link>
                </div>
                <div>
                    <h4>"Demos"</h4>
                    {DemoSpec::all()
                        .map(|spec| {
                            view! { <Link to=Route::for_demo(spec.kind).to_path()>{spec.title}</Link> }
                        })
                        .collect_view()}
                </div>
            </div>
            <p class="text-muted">{format!("© {} LedgerLift. Built for accounting firms.", year)}</p>
        </footer>
    }
}
