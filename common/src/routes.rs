//! ルート定義
//!
//! DOMに依存しない純粋なルート表。パス解析・認証ガード・リダイレクト先を持つ。

use crate::demos::DemoKind;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Home,
    Pricing,
    Features,
    Blog,
    BlogPost(String),
    Login,
    Signup,
    /// 認証が必要
    Dashboard,
    InvoiceService,
    Demo(DemoKind),
    NotFound,
}

impl Route {
    pub fn from_path(path: &str) -> Self {
        // クエリ・フラグメント・末尾スラッシュは無視
        let path = path.split(['?', '#']).next().unwrap_or("/");
        let trimmed = path.trim_end_matches('/');
        let path = if trimmed.is_empty() { "/" } else { trimmed };

        match path {
            "/" => Self::Home,
            "/pricing" => Self::Pricing,
            "/features" => Self::Features,
            "/blog" => Self::Blog,
            "/login" => Self::Login,
            "/signup" => Self::Signup,
            "/dashboard" => Self::Dashboard,
            "/invoice-service" => Self::InvoiceService,
            _ => {
                if let Some(slug) = path.strip_prefix("/blog/") {
                    if !slug.is_empty() && !slug.contains('/') {
                        return Self::BlogPost(slug.to_string());
                    }
                } else if let Some(id) = path.strip_prefix("/demo/") {
                    if let Some(kind) = DemoKind::from_id(id) {
                        if kind != DemoKind::Invoice {
                            return Self::Demo(kind);
                        }
                    }
                }
                Self::NotFound
            }
        }
    }

    pub fn to_path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Pricing => "/pricing".to_string(),
            Self::Features => "/features".to_string(),
            Self::Blog => "/blog".to_string(),
            Self::BlogPost(slug) => format!("/blog/{}", slug),
            Self::Login => "/login".to_string(),
            Self::Signup => "/signup".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
            Self::InvoiceService | Self::Demo(DemoKind::Invoice) => "/invoice-service".to_string(),
            Self::Demo(kind) => format!("/demo/{}", kind.id()),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// デモ種別に対応するページ
    pub fn for_demo(kind: DemoKind) -> Self {
        match kind {
            DemoKind::Invoice => Self::InvoiceService,
            other => Self::Demo(other),
        }
    }

    pub fn demo_kind(&self) -> Option<DemoKind> {
        match self {
            Self::InvoiceService => Some(DemoKind::Invoice),
            Self::Demo(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::Dashboard)
    }

    /// 認証済みなら離れるべきページ（ログイン・登録）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login | Self::Signup)
    }

    /// 遅延読み込み扱いのページ（ローディング表示を挟む）
    pub fn is_heavy(&self) -> bool {
        self.demo_kind().is_some() || matches!(self, Self::Dashboard)
    }

    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }

    pub fn title(&self) -> String {
        match self {
            Self::Home => "LedgerLift".to_string(),
            Self::Pricing => "Pricing".to_string(),
            Self::Features => "Features".to_string(),
            Self::Blog => "Blog".to_string(),
            Self::BlogPost(slug) => slug.replace('-', " "),
            Self::Login => "Sign in".to_string(),
            Self::Signup => "Create account".to_string(),
            Self::Dashboard => "Dashboard".to_string(),
            Self::InvoiceService => DemoKind::Invoice.spec().title.to_string(),
            Self::Demo(kind) => kind.spec().title.to_string(),
            Self::NotFound => "Page not found".to_string(),
        }
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}
