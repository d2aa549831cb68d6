//! localStorageによる `KeyValueStore`

use ledgerlift_common::{Error, KeyValueStore, Result};

/// ブラウザのlocalStorage
///
/// 利用できない環境（プライベートモード等）では読み込みは常に空、書き込みはエラー。
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let storage =
            Self::storage().ok_or_else(|| Error::Storage("localStorage is unavailable".to_string()))?;
        storage
            .set_item(key, value)
            .map_err(|e| Error::Storage(format!("{:?}", e)))
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}
