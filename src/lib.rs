//! LedgerLift CLI
//!
//! 共通ライブラリのアップロード処理・認証を端末から使う。

pub mod account;
pub mod cli;
pub mod client;
pub mod config;
pub mod demo;
pub mod error;
pub mod render;
pub mod session_store;
