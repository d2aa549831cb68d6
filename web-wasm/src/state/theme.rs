//! テーマのコンテキスト
//!
//! `ThemeStore` をlocalStorageで包み、変更を `<html>` のクラスに反映する。

use leptos::prelude::*;
use ledgerlift_common::{Theme, ThemeStore};

use crate::web::BrowserStorage;

const ALL_THEMES: [Theme; 2] = [Theme::ProfessionalLight, Theme::PremiumDark];

fn apply_root_class(theme: Theme) {
    let Some(root) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
    else {
        return;
    };
    let classes = root.class_list();
    for class in ALL_THEMES.iter().flat_map(|t| t.root_class().split_whitespace()) {
        let _ = classes.remove_1(class);
    }
    for class in theme.root_class().split_whitespace() {
        let _ = classes.add_1(class);
    }
}

#[derive(Clone, Copy)]
pub struct ThemeContext {
    store: StoredValue<ThemeStore<BrowserStorage>>,
    theme: RwSignal<Theme>,
}

impl ThemeContext {
    fn new() -> Self {
        let store = ThemeStore::new(BrowserStorage);
        let theme = RwSignal::new(store.theme());
        Self {
            store: StoredValue::new(store),
            theme,
        }
    }

    pub fn theme(&self) -> Signal<Theme> {
        self.theme.into()
    }

    pub fn set_theme(&self, theme: Theme) {
        self.store.update_value(|store| store.set_theme(theme));
        self.theme.set(theme);
    }

    pub fn toggle_theme(&self) {
        if let Some(next) = self.store.try_update_value(|store| store.toggle_theme()) {
            self.theme.set(next);
        }
    }
}

/// 起動時に同期的に読み込み、以後の変更を `<html>` に反映する
pub fn provide_theme() -> ThemeContext {
    let ctx = ThemeContext::new();
    let theme = ctx.theme;
    Effect::new(move |_| apply_root_class(theme.get()));
    provide_context(ctx);
    ctx
}

pub fn use_theme() -> ThemeContext {
    expect_context::<ThemeContext>()
}
