//! ブラウザ上で動かすlocalStorageのテスト
//!
//! wasm-pack test --headless --chrome で実行する

#![cfg(target_arch = "wasm32")]

use ledgerlift_common::theme::THEME_STORAGE_KEY;
use ledgerlift_common::{KeyValueStore, Theme, ThemeStore};
use ledgerlift_web::web::BrowserStorage;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn browser_storage_set_get_remove() {
    let storage = BrowserStorage;
    storage.set("ledgerlift-test", "value").expect("set failed");
    assert_eq!(storage.get("ledgerlift-test").as_deref(), Some("value"));

    storage.remove("ledgerlift-test");
    assert_eq!(storage.get("ledgerlift-test"), None);
}

#[wasm_bindgen_test]
fn theme_survives_reload() {
    BrowserStorage.remove(THEME_STORAGE_KEY);

    let mut store = ThemeStore::new(BrowserStorage);
    let toggled = store.toggle_theme();
    assert_eq!(
        BrowserStorage.get(THEME_STORAGE_KEY).as_deref(),
        Some(toggled.id())
    );

    // 再読み込み相当
    let reloaded = ThemeStore::new(BrowserStorage);
    assert_eq!(reloaded.theme(), toggled);
    assert_ne!(reloaded.theme(), Theme::default());

    BrowserStorage.remove(THEME_STORAGE_KEY);
}
