//! デモのアップロード処理
//!
//! 選択 → 検証 → 送信 → 結果表示 → リセット のライフサイクルを
//! UIから切り離して実装する。Web(Leptos)とCLIの両方がこれを使う。

pub mod controller;
pub mod policy;
pub mod selection;
pub mod stages;

pub use controller::{Completion, Outcome, RequestHandle, Submission, UploadController, UploadPhase};
pub use policy::{AcceptList, SlotSpec, DOCUMENT_MAX_BYTES, MB, SPREADSHEET_MAX_BYTES};
pub use selection::Selection;
pub use stages::{Stage, StagePosition, StageTimeline};
