//! LedgerLift Web App (Leptos + WASM)

mod app;
pub mod components;
pub mod config;
pub mod content;
pub mod logger;
pub mod pages;
pub mod state;
pub mod web;

use wasm_bindgen::prelude::*;

use crate::config::AppConfig;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    logger::init(AppConfig::from_build_env().log_level);
    log::info!("LedgerLift web starting");
    leptos::mount::mount_to_body(app::App);
}
