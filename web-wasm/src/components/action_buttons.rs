//! 送信・リセット・エクスポートのボタン群

use leptos::prelude::*;

#[component]
pub fn ActionButtons<FS, FR, FE>(
    can_submit: Signal<bool>,
    is_uploading: Signal<bool>,
    has_result: Signal<bool>,
    /// エクスポート先があるデモだけ表示
    show_export: bool,
    exporting: Signal<bool>,
    on_submit: FS,
    on_reset: FR,
    on_export: FE,
) -> impl IntoView
where
    FS: Fn(()) + 'static + Clone,
    FR: Fn(()) + 'static + Clone,
    FE: Fn(()) + 'static + Clone,
{
    let export_button = show_export.then(|| {
        view! {
            <button
                class="btn btn-secondary"
                disabled=move || !has_result.get() || exporting.get()
                on:click={
                    let on_export = on_export.clone();
                    move |_| on_export(())
                }
            >
                {move || if exporting.get() { "Exporting..." } else { "Export results" }}
            </button>
        }
    });

    view! {
        <div class="export-buttons">
            <button
                class="btn btn-primary"
                disabled=move || !can_submit.get()
                on:click={
                    let on_submit = on_submit.clone();
                    move |_| on_submit(())
                }
            >
                {move || if is_uploading.get() { "Processing..." } else { "Run demo" }}
            </button>

            <button
                class="btn btn-tertiary"
                on:click={
                    let on_reset = on_reset.clone();
                    move |_| on_reset(())
                }
            >
                "Reset"
            </button>

            {export_button}
        </div>
    }
}
