//! トースト通知
//!
//! 一定時間で自動的に消える。手動で閉じることもできる。

use gloo::timers::callback::Timeout;
use leptos::prelude::*;
use ledgerlift_common::Notice;

/// 表示時間
pub const TOAST_DURATION_MS: u32 = 3_000;

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub notice: Notice,
}

#[derive(Clone, Copy)]
pub struct ToastContext {
    toasts: RwSignal<Vec<Toast>>,
    next_id: StoredValue<u64>,
}

impl ToastContext {
    fn new() -> Self {
        Self {
            toasts: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(1),
        }
    }

    pub fn toasts(&self) -> Signal<Vec<Toast>> {
        self.toasts.into()
    }

    pub fn push(&self, notice: Notice) {
        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);
        self.toasts.update(|list| list.push(Toast { id, notice }));

        let ctx = *self;
        Timeout::new(TOAST_DURATION_MS, move || ctx.dismiss(id)).forget();
    }

    pub fn extend(&self, notices: Vec<Notice>) {
        for notice in notices {
            self.push(notice);
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(Notice::success(message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(Notice::error(message));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(Notice::info(message));
    }

    pub fn dismiss(&self, id: u64) {
        // 画面破棄後のタイマーは何もしない
        self.toasts.try_update(|list| list.retain(|t| t.id != id));
    }
}

pub fn provide_toasts() -> ToastContext {
    let ctx = ToastContext::new();
    provide_context(ctx);
    ctx
}

pub fn use_toasts() -> ToastContext {
    expect_context::<ToastContext>()
}
