//! デモページ
//!
//! 6つのデモは `DemoSpec` と結果型だけが異なるので、本体は `demo_page` 1つ。
//! コントローラはページと同じ寿命で、ページ破棄時に送信中のリクエストを中断する。

use leptos::prelude::*;
use leptos::task::spawn_local;
use ledgerlift_common::demos::{self, DemoKind, DemoSpec};
use ledgerlift_common::http::FileSource;
use ledgerlift_common::payload::{
    ApRecResult, BankRecResult, ExpenseResult, InvoiceExtraction, TenKAnalysis,
};
use ledgerlift_common::{Error, ResultPayload, UploadController};

use crate::components::action_buttons::ActionButtons;
use crate::components::processing::ProcessingStatus;
use crate::components::result_view::{ErrorPanel, ResultView};
use crate::components::upload_area::{FileSummary, UploadSlot, UploadSlotProps};
use crate::state::{use_api, use_toasts};
use crate::web::{download, BrowserFile};

type Controller<R> = UploadController<BrowserFile, R>;

pub fn demo_page<R: ResultPayload>(spec: &'static DemoSpec) -> impl IntoView {
    let api = use_api();
    let toasts = use_toasts();
    let controller = RwSignal::new_local(Controller::<R>::new(spec));
    let exporting = RwSignal::new(false);

    on_cleanup(move || {
        controller.try_update_untracked(|c| c.teardown());
    });

    // コントローラに溜まった通知をトーストへ
    let flush_notices = move || {
        if let Some(notices) = controller.try_update_untracked(|c| c.take_notices()) {
            toasts.extend(notices);
        }
    };

    let is_uploading = Signal::derive(move || controller.with(|c| c.is_uploading()));
    let can_submit = Signal::derive(move || controller.with(|c| c.can_submit()));
    let has_result = Signal::derive(move || controller.with(|c| c.result().is_some()));

    let select_files = move |field: &'static str, files: Vec<BrowserFile>| {
        let outcome = controller.try_update(|c| c.select(field, files));
        if let Some(Err(Error::Busy)) = outcome {
            toasts.error(Error::Busy.to_string());
        }
        flush_notices();
    };

    let clear_slot = move |field: &'static str| {
        controller.update(|c| {
            if let Err(e) = c.remove(field) {
                log::debug!("{}: {}", spec.id, e);
            }
        });
    };

    let on_submit = {
        let api = api.clone();
        move |_: ()| {
            let Some(started) = controller.try_update(|c| c.begin_submit()) else {
                return;
            };
            flush_notices();
            let submission = match started {
                Ok(submission) => submission,
                Err(e) => {
                    log::debug!("{}: submit rejected: {}", spec.id, e);
                    return;
                }
            };

            let api = api.clone();
            spawn_local(async move {
                let completion = submission.send(&api).await;
                // ページ破棄後は信号が無いので何もしない
                let event = controller.try_update(|c| c.complete(completion)).flatten();
                flush_notices();
                if let Some(event) = event {
                    api.track(&event).await;
                }
            });
        }
    };

    let on_reset = move |_: ()| {
        controller.update(|c| c.reset());
    };

    let on_export = {
        let api = api.clone();
        move |_: ()| {
            let Some(endpoint) = spec.export_endpoint else { return };
            let Some(result) = controller
                .try_with_untracked(|c| c.result().cloned())
                .flatten()
            else {
                return;
            };

            exporting.set(true);
            let api = api.clone();
            spawn_local(async move {
                match api.export(endpoint, &result).await {
                    Ok(bytes) => match download::save_bytes(&bytes, spec.export_file_name) {
                        Ok(()) => toasts.success("Export downloaded"),
                        Err(e) => {
                            log::warn!("{}: export save failed: {}", spec.id, e);
                            toasts.error("Could not save the export file");
                        }
                    },
                    Err(e) => toasts.error(e.to_string()),
                }
                exporting.try_set(false);
            });
        }
    };

    let slots = spec
        .slots
        .iter()
        .map(|slot| {
            let field = slot.field;
            let files = Signal::derive(move || {
                controller.with(|c| {
                    c.selection()
                        .files(field)
                        .iter()
                        .map(|f| (f.file_name().to_string(), f.size()))
                        .collect::<Vec<FileSummary>>()
                })
            });
            // `slot` is reserved by `view!`, so the props are built directly.
            UploadSlot(
                UploadSlotProps::builder()
                    .slot(slot)
                    .files(files)
                    .disabled(is_uploading)
                    .on_files(move |picked: Vec<BrowserFile>| select_files(field, picked))
                    .on_clear(move |_: ()| clear_slot(field))
                    .build(),
            )
        })
        .collect_view();

    let timeline = spec.timeline();
    let error = move || controller.with(|c| c.error().map(str::to_string));
    let rendered = move || controller.with(|c| c.result().map(|r| (r.summary_cards(), r.tables())));

    view! {
        <section class="section demo-page">
            <header class="demo-header">
                <h1>{spec.title}</h1>
                <p class="lead">{spec.tagline}</p>
            </header>

            <div class="upload-grid">{slots}</div>

            <ActionButtons
                can_submit=can_submit
                is_uploading=is_uploading
                has_result=has_result
                show_export=spec.export_endpoint.is_some()
                exporting=exporting.into()
                on_submit=on_submit
                on_reset=on_reset
                on_export=on_export
            />

            <Show when=move || is_uploading.get()>
                <ProcessingStatus timeline=timeline />
            </Show>

            {move || error().map(|message| view! { <ErrorPanel message=message /> })}

            {move || {
                rendered().map(|(cards, tables)| view! { <ResultView cards=cards tables=tables /> })
            }}
        </section>
    }
}

#[component]
pub fn InvoiceServicePage() -> impl IntoView {
    demo_page::<InvoiceExtraction>(&demos::INVOICE)
}

#[component]
pub fn TenKDemo() -> impl IntoView {
    demo_page::<TenKAnalysis>(&demos::TEN_K)
}

#[component]
pub fn BankRecDemo() -> impl IntoView {
    demo_page::<BankRecResult>(&demos::BANK_REC)
}

#[component]
pub fn ApRecDemo() -> impl IntoView {
    demo_page::<ApRecResult>(&demos::AP_REC)
}

#[component]
pub fn ExpenseDemo() -> impl IntoView {
    demo_page::<ExpenseResult>(&demos::EXPENSES)
}

/// 売掛金の照合は買掛金と同じ結果形式
#[component]
pub fn ArRecDemo() -> impl IntoView {
    demo_page::<ApRecResult>(&demos::AR_REC)
}

pub fn demo_view(kind: DemoKind) -> AnyView {
    match kind {
        DemoKind::Invoice => view! { <InvoiceServicePage /> }.into_any(),
        DemoKind::TenK => view! { <TenKDemo /> }.into_any(),
        DemoKind::BankRec => view! { <BankRecDemo /> }.into_any(),
        DemoKind::ApRec => view! { <ApRecDemo /> }.into_any(),
        DemoKind::Expenses => view! { <ExpenseDemo /> }.into_any(),
        DemoKind::ArRec => view! { <ArRecDemo /> }.into_any(),
    }
}
