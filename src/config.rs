use crate::error::{LedgerLiftError, Result};
use ledgerlift_common::{DEFAULT_AUTH_URL, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const API_KEY_ENV: &str = "LEDGERLIFT_API_KEY";
const BASE_URL_ENV: &str = "LEDGERLIFT_BASE_URL";
const AUTH_URL_ENV: &str = "LEDGERLIFT_AUTH_URL";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: String,
    pub auth_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.into(),
            auth_url: DEFAULT_AUTH_URL.into(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| LedgerLiftError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("ledgerlift"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// 認証セッションの保存先
    pub fn session_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("session.json"))
    }

    /// 環境変数を優先
    pub fn get_api_key(&self) -> Result<String> {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.is_empty() {
                return Ok(key);
            }
        }

        self.api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or(LedgerLiftError::MissingApiKey)
    }

    pub fn base_url(&self) -> String {
        env_or(BASE_URL_ENV, &self.base_url)
    }

    pub fn auth_url(&self) -> String {
        env_or(AUTH_URL_ENV, &self.auth_url)
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.api_key = Some(key);
        self.save()
    }

    pub fn set_base_url(&mut self, url: String) -> Result<()> {
        self.base_url = url;
        self.save()
    }

    pub fn set_auth_url(&mut self, url: String) -> Result<()> {
        self.auth_url = url;
        self.save()
    }
}

fn env_or(name: &str, fallback: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}
