//! 表示テーマ
//!
//! 起動時にストアから同期的に読み込み、変更のたびに書き戻す。

use crate::storage::KeyValueStore;

pub const THEME_STORAGE_KEY: &str = "ledgerlift-theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    ProfessionalLight,
    PremiumDark,
}

impl Theme {
    pub fn id(&self) -> &'static str {
        match self {
            Theme::ProfessionalLight => "professional-light",
            Theme::PremiumDark => "premium-dark",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim() {
            "professional-light" => Some(Theme::ProfessionalLight),
            "premium-dark" => Some(Theme::PremiumDark),
            _ => None,
        }
    }

    /// ルート要素に付けるクラス名
    pub fn root_class(&self) -> &'static str {
        match self {
            Theme::ProfessionalLight => "theme-professional-light",
            Theme::PremiumDark => "theme-premium-dark dark",
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::PremiumDark)
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::ProfessionalLight => Theme::PremiumDark,
            Theme::PremiumDark => Theme::ProfessionalLight,
        }
    }
}

#[derive(Debug)]
pub struct ThemeStore<S> {
    store: S,
    theme: Theme,
}

impl<S: KeyValueStore> ThemeStore<S> {
    /// 保存値を読んで初期化する（未保存・不明値は既定テーマ）
    pub fn new(store: S) -> Self {
        let theme = store
            .get(THEME_STORAGE_KEY)
            .and_then(|id| Theme::from_id(&id))
            .unwrap_or_default();
        Self { store, theme }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        if let Err(e) = self.store.set(THEME_STORAGE_KEY, theme.id()) {
            // 保存できなくても表示は切り替える
            log::warn!("failed to persist theme: {}", e);
        }
    }

    pub fn toggle_theme(&mut self) -> Theme {
        let next = self.theme.toggled();
        self.set_theme(next);
        next
    }
}
