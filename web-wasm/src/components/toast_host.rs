//! トースト表示領域

use leptos::prelude::*;

use crate::state::{use_toasts, Toast};

#[component]
pub fn ToastHost() -> impl IntoView {
    let toasts = use_toasts();

    view! {
        <div class="toast-host" aria-live="assertive">
            <For
                each=move || toasts.toasts().get()
                key=|toast: &Toast| toast.id
                children=move |toast: Toast| {
                    let id = toast.id;
                    let class = format!("toast toast-{}", toast.notice.level.as_str());
                    view! {
                        <div class=class role="status">
                            <span>{toast.notice.message}</span>
                            <button class="toast-close" aria-label="Dismiss" on:click=move |_| toasts.dismiss(id)>
                                "×"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
