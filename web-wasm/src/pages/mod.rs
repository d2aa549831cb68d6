//! ページコンポーネント

pub mod auth;
pub mod blog;
pub mod dashboard;
pub mod demo;
pub mod features;
pub mod home;
pub mod not_found;
pub mod pricing;
