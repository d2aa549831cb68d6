//! アップロード枠ごとの受付ポリシー（形式・サイズ上限）

use crate::http::FileSource;

pub const MB: u64 = 1024 * 1024;

/// CSV/スプレッドシート入力の上限
pub const SPREADSHEET_MAX_BYTES: u64 = 5 * MB;

/// PDF/画像入力の上限
pub const DOCUMENT_MAX_BYTES: u64 = 10 * MB;

/// 受付可能なMIMEタイプと拡張子
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceptList {
    /// エラーメッセージ用の表示名（"CSV or Excel" など）
    pub description: &'static str,
    pub mime_types: &'static [&'static str],
    pub extensions: &'static [&'static str],
}

impl AcceptList {
    pub const SPREADSHEET: AcceptList = AcceptList {
        description: "CSV or Excel",
        mime_types: &[
            "text/csv",
            "application/csv",
            "application/vnd.ms-excel",
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        ],
        extensions: &["csv", "xls", "xlsx"],
    };

    pub const PDF: AcceptList = AcceptList {
        description: "PDF",
        mime_types: &["application/pdf"],
        extensions: &["pdf"],
    };

    pub const PDF_OR_IMAGE: AcceptList = AcceptList {
        description: "PDF or image (PNG, JPG)",
        mime_types: &["application/pdf", "image/png", "image/jpeg", "image/jpg", "image/webp"],
        extensions: &["pdf", "png", "jpg", "jpeg", "webp"],
    };

    /// MIMEタイプか拡張子のどちらかが一致すれば受付
    ///
    /// ブラウザはCSVのMIMEを空や独自値で報告することがあるため拡張子も見る。
    pub fn accepts<F: FileSource>(&self, file: &F) -> bool {
        let mime = file.mime_type().trim().to_ascii_lowercase();
        if !mime.is_empty() && self.mime_types.iter().any(|m| *m == mime) {
            return true;
        }
        file.extension()
            .map(|ext| self.extensions.iter().any(|e| *e == ext))
            .unwrap_or(false)
    }

    /// `<input accept="...">` 用の文字列
    pub fn accept_attribute(&self) -> String {
        self.extensions
            .iter()
            .map(|e| format!(".{}", e))
            .chain(self.mime_types.iter().map(|m| m.to_string()))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// アップロード枠（multipartのフィールド1つ分）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSpec {
    /// multipartのフィールド名
    pub field: &'static str,
    pub label: &'static str,
    pub accept: AcceptList,
    pub max_bytes: u64,
    /// 複数ファイルを受け付けるか（領収書など）
    pub multiple: bool,
    pub required: bool,
}

impl SlotSpec {
    /// 1ファイル分の検証。NGならユーザー向けメッセージを返す
    pub fn validate<F: FileSource>(&self, file: &F) -> Result<(), String> {
        let message = if !self.accept.accepts(file) {
            format!(
                "Invalid file type. Please upload a {} file.",
                self.accept.description
            )
        } else if file.size() > self.max_bytes {
            format!("File size must be less than {}", self.max_size_label())
        } else {
            return Ok(());
        };

        if self.multiple {
            Err(format!("{}: {}", file.file_name(), message))
        } else {
            Err(message)
        }
    }

    /// "10MB" 形式のサイズ表記
    pub fn max_size_label(&self) -> String {
        if self.max_bytes % MB == 0 {
            format!("{}MB", self.max_bytes / MB)
        } else {
            format!("{:.1}MB", self.max_bytes as f64 / MB as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::mock::MockFile;

    const LEDGER: SlotSpec = SlotSpec {
        field: "ledger_file",
        label: "Ledger",
        accept: AcceptList::SPREADSHEET,
        max_bytes: SPREADSHEET_MAX_BYTES,
        multiple: false,
        required: true,
    };

    const RECEIPTS: SlotSpec = SlotSpec {
        field: "receipts",
        label: "Receipts",
        accept: AcceptList::PDF_OR_IMAGE,
        max_bytes: DOCUMENT_MAX_BYTES,
        multiple: true,
        required: true,
    };

    #[test]
    fn test_accepts_by_mime() {
        let file = MockFile::new("export", "text/csv", 10);
        assert!(AcceptList::SPREADSHEET.accepts(&file));
    }

    #[test]
    fn test_accepts_by_extension_when_mime_missing() {
        let file = MockFile::new("ledger.XLSX", "", 10);
        assert!(AcceptList::SPREADSHEET.accepts(&file));
    }

    #[test]
    fn test_rejects_wrong_type() {
        let file = MockFile::new("photo.png", "image/png", 10);
        assert!(!AcceptList::SPREADSHEET.accepts(&file));
        assert_eq!(
            LEDGER.validate(&file),
            Err("Invalid file type. Please upload a CSV or Excel file.".to_string())
        );
    }

    #[test]
    fn test_size_at_limit_is_accepted() {
        let file = MockFile::new("ledger.csv", "text/csv", SPREADSHEET_MAX_BYTES);
        assert_eq!(LEDGER.validate(&file), Ok(()));
    }

    #[test]
    fn test_size_over_limit_is_rejected() {
        let file = MockFile::new("ledger.csv", "text/csv", SPREADSHEET_MAX_BYTES + 1);
        assert_eq!(
            LEDGER.validate(&file),
            Err("File size must be less than 5MB".to_string())
        );
    }

    #[test]
    fn test_multi_file_slot_prefixes_name() {
        let file = MockFile::new("lunch.png", "image/png", 11 * MB);
        assert_eq!(
            RECEIPTS.validate(&file),
            Err("lunch.png: File size must be less than 10MB".to_string())
        );
    }

    #[test]
    fn test_accept_attribute() {
        let attr = AcceptList::PDF.accept_attribute();
        assert_eq!(attr, ".pdf,application/pdf");
    }

    #[test]
    fn test_max_size_label_fraction() {
        let slot = SlotSpec {
            max_bytes: MB + MB / 2,
            ..LEDGER
        };
        assert_eq!(slot.max_size_label(), "1.5MB");
    }
}
