//! アップロード枠コンポーネント
//!
//! クリックで隠しinputを開くか、ドラッグ&ドロップで受け付ける。
//! 検証はコントローラ側で行うので、ここでは受け取ったファイルを渡すだけ。

use leptos::html;
use leptos::prelude::*;
use ledgerlift_common::upload::SlotSpec;
use web_sys::DragEvent;

use crate::web::BrowserFile;

/// 選択済みファイルの表示用（名前・サイズ）
pub type FileSummary = (String, u64);

pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let bytes = bytes as f64;
    if bytes >= KB * KB {
        format!("{:.1} MB", bytes / (KB * KB))
    } else if bytes >= KB {
        format!("{:.0} KB", bytes / KB)
    } else {
        format!("{} B", bytes)
    }
}

#[component]
pub fn UploadSlot<F, C>(
    slot: &'static SlotSpec,
    files: Signal<Vec<FileSummary>>,
    disabled: Signal<bool>,
    on_files: F,
    on_clear: C,
) -> impl IntoView
where
    F: Fn(Vec<BrowserFile>) + 'static + Clone,
    C: Fn(()) + 'static + Clone,
{
    let (is_dragover, set_is_dragover) = signal(false);
    let input_ref = NodeRef::<html::Input>::new();

    let on_change = {
        let on_files = on_files.clone();
        move |_| {
            let Some(input) = input_ref.get() else { return };
            if let Some(list) = input.files() {
                let picked = BrowserFile::from_list(&list);
                if !picked.is_empty() {
                    on_files(picked);
                }
            }
            // 同じファイルを選び直しても change が発火するように
            input.set_value("");
        }
    };

    let on_drop = {
        let on_files = on_files.clone();
        move |ev: DragEvent| {
            ev.prevent_default();
            set_is_dragover.set(false);
            if disabled.get_untracked() {
                return;
            }
            if let Some(list) = ev.data_transfer().and_then(|dt| dt.files()) {
                let dropped = BrowserFile::from_list(&list);
                if !dropped.is_empty() {
                    on_files(dropped);
                }
            }
        }
    };

    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        if !disabled.get_untracked() {
            set_is_dragover.set(true);
        }
    };

    let on_dragleave = move |_: DragEvent| {
        set_is_dragover.set(false);
    };

    let on_click = move |_| {
        if disabled.get_untracked() {
            return;
        }
        if let Some(input) = input_ref.get() {
            input.click();
        }
    };

    let hint = format!(
        "{} up to {}{}",
        slot.accept.description,
        slot.max_size_label(),
        if slot.multiple { ", multiple files allowed" } else { "" }
    );

    view! {
        <div class="upload-slot">
            <label class="upload-label">
                {slot.label}
                {(!slot.required).then(|| view! { <span class="text-muted">" (optional)"</span> })}
            </label>
            <input
                type="file"
                class="hidden"
                node_ref=input_ref
                accept=slot.accept.accept_attribute()
                multiple=slot.multiple
                on:change=on_change
            />
            <div
                class=move || {
                    let mut classes = vec!["upload-area"];
                    if is_dragover.get() {
                        classes.push("dragover");
                    }
                    if disabled.get() {
                        classes.push("disabled");
                    }
                    if !files.with(|f| f.is_empty()) {
                        classes.push("has-file");
                    }
                    classes.join(" ")
                }
                on:drop=on_drop
                on:dragover=on_dragover
                on:dragleave=on_dragleave
                on:click=on_click
            >
                <div class="upload-icon">"⬆"</div>
                <p>"Drag & drop or click to choose"</p>
                <p class="text-muted">{hint}</p>
            </div>
            <Show when=move || !files.with(|f| f.is_empty())>
                <ul class="selected-files">
                    {move || {
                        files
                            .get()
                            .into_iter()
                            .map(|(name, size)| {
                                view! {
                                    <li>
                                        <span class="file-name">{name}</span>
                                        <span class="file-size text-muted">{format_size(size)}</span>
                                    </li>
                                }
                            })
                            .collect_view()
                    }}
                </ul>
            </Show>
            <button
                class="btn btn-tertiary btn-small"
                disabled=move || disabled.get() || files.with(|f| f.is_empty())
                on:click={
                    let on_clear = on_clear.clone();
                    move |_| on_clear(())
                }
            >
                "Remove"
            </button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
