//! ダッシュボード（要ログイン）

use leptos::prelude::*;

use crate::components::loaders::Skeleton;
use crate::pages::home::DemoGrid;
use crate::state::use_auth;

#[component]
fn ProfileCard() -> impl IntoView {
    let auth = use_auth();

    move || {
        let state = auth.state().get();
        if state.loading {
            return view! { <div class="card profile-card"><Skeleton lines=3 /></div> }.into_any();
        }
        match state.user {
            Some(user) => {
                let greeting = if user.full_name.is_empty() {
                    format!("Welcome, {}", user.email)
                } else {
                    format!("Welcome, {}", user.full_name)
                };
                view! {
                    <div class="card profile-card">
                        <h2>{greeting}</h2>
                        <dl>
                            <dt>"Firm"</dt>
                            <dd>{user.firm_name}</dd>
                            <dt>"Role"</dt>
                            <dd>{user.role}</dd>
                            <dt>"Email"</dt>
                            <dd>{user.email}</dd>
                        </dl>
                    </div>
                }
                .into_any()
            }
            None => view! { <div class="card profile-card"><Skeleton lines=3 /></div> }.into_any(),
        }
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    view! {
        <section class="section dashboard">
            <h1>"Dashboard"</h1>
            <ProfileCard />
            <h2>"Run a workflow"</h2>
            <DemoGrid />
        </section>
    }
}
