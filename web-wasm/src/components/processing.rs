//! 処理中表示コンポーネント
//!
//! 送信中のあいだだけ描画される。段階は経過時間のみで決まり、
//! アップロードの状態には影響しない。

use std::time::Duration;

use gloo::timers::callback::Interval;
use leptos::prelude::*;
use ledgerlift_common::upload::StageTimeline;

const TICK_MS: u32 = 200;

#[component]
pub fn ProcessingStatus(timeline: StageTimeline) -> impl IntoView {
    let started = js_sys::Date::now();
    let elapsed_ms = RwSignal::new(0u64);

    let ticker = StoredValue::new_local(Some(Interval::new(TICK_MS, move || {
        let elapsed = (js_sys::Date::now() - started).max(0.0) as u64;
        elapsed_ms.try_set(elapsed);
    })));
    on_cleanup(move || {
        ticker.try_update_value(|t| t.take());
    });

    let position = move || timeline.position(Duration::from_millis(elapsed_ms.get()));
    let overall = move || position().map(|p| p.overall).unwrap_or(1.0);
    let active_index = move || position().map(|p| p.index).unwrap_or(0);
    let label = move || {
        position()
            .map(|p| {
                if p.finished {
                    format!("{}… almost there", p.label)
                } else {
                    format!("{}…", p.label)
                }
            })
            .unwrap_or_else(|| "Processing…".to_string())
    };

    view! {
        <div class="progress-container" role="status" aria-live="polite">
            <div class="progress-bar">
                <div
                    class="progress-fill"
                    style=move || format!("width: {:.0}%", overall() * 100.0)
                />
            </div>
            <p class="progress-text">{label}</p>
            <ol class="stage-list">
                {timeline
                    .stages()
                    .iter()
                    .enumerate()
                    .map(|(index, stage)| {
                        let class = move || {
                            let active = active_index();
                            if index < active {
                                "stage done"
                            } else if index == active {
                                "stage active"
                            } else {
                                "stage pending"
                            }
                        };
                        view! { <li class=class>{stage.label}</li> }
                    })
                    .collect_view()}
            </ol>
        </div>
    }
}
