use leptos::prelude::*;
use ledgerlift_common::Route;

use crate::content::PRICING_TIERS;
use crate::web::router::Link;

#[component]
pub fn PricingPage() -> impl IntoView {
    view! {
        <section class="section">
            <h1>"Simple pricing for every practice"</h1>
            <p class="lead">"Every plan starts with a 14-day free trial."</p>
            <div class="pricing-grid">
                {PRICING_TIERS
                    .iter()
                    .map(|tier| {
                        let class = if tier.highlighted { "pricing-card highlighted" } else { "pricing-card" };
                        view! {
                            <article class=class>
                                <h2>{tier.name}</h2>
                                <p class="price">
                                    <span class="amount">{tier.price}</span>
                                    <span class="text-muted">" "{tier.period}</span>
                                </p>
                                <p>{tier.description}</p>
                                <ul>
                                    {tier.features.iter().map(|f| view! { <li>{*f}</li> }).collect_view()}
                                </ul>
                                <Link to=Route::Signup.to_path() class="btn btn-primary">{tier.cta}</Link>
                            </article>
                        }
                    })
                    .collect_view()}
            </div>
        </section>
    }
}
