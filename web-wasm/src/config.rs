//! ビルド時設定
//!
//! デプロイごとの値はビルド時の環境変数から埋め込む。

use ledgerlift_common::{ApiClient, DEFAULT_AUTH_URL, DEFAULT_BASE_URL};
use log::LevelFilter;

use crate::web::FetchClient;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub base_url: String,
    /// 公開用の匿名キー（バックエンドとGoTrueで共通）
    pub api_key: String,
    pub auth_url: String,
    pub log_level: LevelFilter,
}

impl AppConfig {
    pub fn from_build_env() -> Self {
        Self::from_values(
            option_env!("LEDGERLIFT_BASE_URL"),
            option_env!("LEDGERLIFT_API_KEY"),
            option_env!("LEDGERLIFT_AUTH_URL"),
            option_env!("LEDGERLIFT_LOG"),
        )
    }

    fn from_values(
        base_url: Option<&str>,
        api_key: Option<&str>,
        auth_url: Option<&str>,
        log_level: Option<&str>,
    ) -> Self {
        let non_empty = |v: Option<&str>| v.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string);
        Self {
            base_url: non_empty(base_url).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key: non_empty(api_key).unwrap_or_default(),
            auth_url: non_empty(auth_url).unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
            log_level: log_level
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(LevelFilter::Info),
        }
    }

    pub fn api_client(&self) -> ApiClient<FetchClient> {
        ApiClient::new(FetchClient, self.base_url.clone(), self.api_key.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_values(None, None, Some("  "), None);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.auth_url, DEFAULT_AUTH_URL);
        assert!(config.api_key.is_empty());
        assert_eq!(config.log_level, LevelFilter::Info);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_values(
            Some("https://staging.example.com/fn"),
            Some("anon"),
            None,
            Some("debug"),
        );
        assert_eq!(config.base_url, "https://staging.example.com/fn");
        assert_eq!(config.api_key, "anon");
        assert_eq!(config.log_level, LevelFilter::Debug);
    }
}
