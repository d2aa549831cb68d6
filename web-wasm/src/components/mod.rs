pub mod action_buttons;
pub mod footer;
pub mod header;
pub mod loaders;
pub mod processing;
pub mod result_view;
pub mod toast_host;
pub mod upload_area;
