//! デモ定義
//!
//! 各デモページの違いは入力枠・エンドポイント・処理段階・結果型だけなので、
//! それらを静的なテーブルにまとめ、アップロード処理本体は1つにする。

use crate::upload::policy::{AcceptList, SlotSpec, DOCUMENT_MAX_BYTES, SPREADSHEET_MAX_BYTES};
use crate::upload::stages::{Stage, StageTimeline};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DemoKind {
    Invoice,
    TenK,
    BankRec,
    ApRec,
    Expenses,
    ArRec,
}

impl DemoKind {
    pub const ALL: [DemoKind; 6] = [
        DemoKind::Invoice,
        DemoKind::TenK,
        DemoKind::BankRec,
        DemoKind::ApRec,
        DemoKind::Expenses,
        DemoKind::ArRec,
    ];

    pub fn spec(&self) -> &'static DemoSpec {
        match self {
            DemoKind::Invoice => &INVOICE,
            DemoKind::TenK => &TEN_K,
            DemoKind::BankRec => &BANK_REC,
            DemoKind::ApRec => &AP_REC,
            DemoKind::Expenses => &EXPENSES,
            DemoKind::ArRec => &AR_REC,
        }
    }

    pub fn id(&self) -> &'static str {
        self.spec().id
    }

    pub fn from_id(id: &str) -> Option<Self> {
        let id = id.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }
}

/// デモ1つ分の定義
#[derive(Debug)]
pub struct DemoSpec {
    pub kind: DemoKind,
    /// URL・分析イベント・CLI引数で使う識別子
    pub id: &'static str,
    pub title: &'static str,
    pub tagline: &'static str,
    pub endpoint: &'static str,
    pub export_endpoint: Option<&'static str>,
    /// エクスポート保存時の既定ファイル名
    pub export_file_name: &'static str,
    pub slots: &'static [SlotSpec],
    pub stages: &'static [Stage],
    pub success_message: &'static str,
}

impl DemoSpec {
    pub fn slot(&self, field: &str) -> Option<&'static SlotSpec> {
        self.slots.iter().find(|slot| slot.field == field)
    }

    pub fn timeline(&self) -> StageTimeline {
        StageTimeline::new(self.stages)
    }

    pub fn all() -> impl Iterator<Item = &'static DemoSpec> {
        DemoKind::ALL.into_iter().map(|kind| kind.spec())
    }
}

const fn spreadsheet(field: &'static str, label: &'static str) -> SlotSpec {
    SlotSpec {
        field,
        label,
        accept: AcceptList::SPREADSHEET,
        max_bytes: SPREADSHEET_MAX_BYTES,
        multiple: false,
        required: true,
    }
}

pub static INVOICE: DemoSpec = DemoSpec {
    kind: DemoKind::Invoice,
    id: "invoice",
    title: "Invoice Processing",
    tagline: "Extract supplier, dates and totals from any invoice in seconds.",
    endpoint: "analyze-invoice",
    export_endpoint: None,
    export_file_name: "invoice.csv",
    slots: &[SlotSpec {
        field: "file",
        label: "Invoice",
        accept: AcceptList::PDF_OR_IMAGE,
        max_bytes: DOCUMENT_MAX_BYTES,
        multiple: false,
        required: true,
    }],
    stages: &[
        Stage::new("Uploading invoice", 800),
        Stage::new("Reading document", 1500),
        Stage::new("Extracting fields", 2000),
        Stage::new("Validating totals", 1000),
    ],
    success_message: "Invoice processed successfully!",
};

pub static TEN_K: DemoSpec = DemoSpec {
    kind: DemoKind::TenK,
    id: "10k",
    title: "10-K Financial Analysis",
    tagline: "Turn an annual report into clean multi-year financial statements.",
    endpoint: "analyze-10k",
    export_endpoint: Some("export-10k"),
    export_file_name: "10k-analysis.xlsx",
    slots: &[SlotSpec {
        field: "file",
        label: "10-K filing",
        accept: AcceptList::PDF,
        max_bytes: DOCUMENT_MAX_BYTES,
        multiple: false,
        required: true,
    }],
    stages: &[
        Stage::new("Uploading filing", 1000),
        Stage::new("Parsing document", 2500),
        Stage::new("Extracting income statement", 3000),
        Stage::new("Extracting balance sheet", 3000),
        Stage::new("Building summary", 1500),
    ],
    success_message: "10-K analysed successfully!",
};

pub static BANK_REC: DemoSpec = DemoSpec {
    kind: DemoKind::BankRec,
    id: "bank-rec",
    title: "Bank Reconciliation",
    tagline: "Match bank statement lines against your ledger automatically.",
    endpoint: "analyze-bank-rec",
    export_endpoint: Some("export-bank-rec"),
    export_file_name: "bank-reconciliation.xlsx",
    slots: &[
        spreadsheet("bank_file", "Bank statement"),
        spreadsheet("ledger_file", "General ledger"),
    ],
    stages: &[
        Stage::new("Uploading files", 800),
        Stage::new("Parsing transactions", 1500),
        Stage::new("Matching transactions", 2500),
        Stage::new("Identifying exceptions", 1500),
    ],
    success_message: "Reconciliation complete!",
};

pub static AP_REC: DemoSpec = DemoSpec {
    kind: DemoKind::ApRec,
    id: "ap-rec",
    title: "Accounts Payable Reconciliation",
    tagline: "Reconcile supplier statements with your AP ledger.",
    endpoint: "reconcile-ap",
    export_endpoint: Some("export-ap-rec"),
    export_file_name: "ap-reconciliation.xlsx",
    slots: &[
        spreadsheet("vendor_statement", "Supplier statement"),
        spreadsheet("ap_ledger", "AP ledger"),
    ],
    stages: &[
        Stage::new("Uploading files", 800),
        Stage::new("Reading invoices", 1500),
        Stage::new("Matching invoices", 2500),
        Stage::new("Checking for duplicates", 1200),
        Stage::new("Calculating balances", 1000),
    ],
    success_message: "AP reconciliation complete!",
};

pub static EXPENSES: DemoSpec = DemoSpec {
    kind: DemoKind::Expenses,
    id: "expenses",
    title: "Expense Reconciliation",
    tagline: "Match card transactions to receipts and flag what's missing.",
    endpoint: "reconcile-expenses",
    export_endpoint: Some("export-expenses"),
    export_file_name: "expense-reconciliation.xlsx",
    slots: &[
        spreadsheet("transactions", "Card transactions"),
        SlotSpec {
            field: "receipts",
            label: "Receipts",
            accept: AcceptList::PDF_OR_IMAGE,
            max_bytes: DOCUMENT_MAX_BYTES,
            multiple: true,
            required: true,
        },
    ],
    stages: &[
        Stage::new("Uploading files", 1000),
        Stage::new("Reading receipts", 3000),
        Stage::new("Matching receipts", 2500),
        Stage::new("Categorising spend", 1500),
    ],
    success_message: "Expense reconciliation complete!",
};

pub static AR_REC: DemoSpec = DemoSpec {
    kind: DemoKind::ArRec,
    id: "ar-rec",
    title: "Accounts Receivable Reconciliation",
    tagline: "Reconcile customer statements with your AR ledger.",
    endpoint: "ar-reconcile",
    export_endpoint: Some("ar-export"),
    export_file_name: "ar-reconciliation.xlsx",
    slots: &[
        spreadsheet("customer_statement", "Customer statement"),
        spreadsheet("ar_ledger", "AR ledger"),
    ],
    stages: &[
        Stage::new("Uploading files", 800),
        Stage::new("Reading invoices", 1500),
        Stage::new("Matching receipts to invoices", 2500),
        Stage::new("Calculating balances", 1000),
    ],
    success_message: "AR reconciliation complete!",
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_from_id_round_trips_every_kind() {
        for kind in DemoKind::ALL {
            assert_eq!(DemoKind::from_id(kind.id()), Some(kind));
            assert_eq!(kind.spec().kind, kind);
        }
        assert_eq!(DemoKind::from_id("BANK-REC"), Some(DemoKind::BankRec));
        assert_eq!(DemoKind::from_id("payroll"), None);
    }

    #[test]
    fn test_ids_and_endpoints_unique() {
        let ids: HashSet<_> = DemoSpec::all().map(|d| d.id).collect();
        let endpoints: HashSet<_> = DemoSpec::all().map(|d| d.endpoint).collect();
        assert_eq!(ids.len(), DemoKind::ALL.len());
        assert_eq!(endpoints.len(), DemoKind::ALL.len());
    }

    #[test]
    fn test_every_demo_has_required_slot_and_stages() {
        for demo in DemoSpec::all() {
            assert!(demo.slots.iter().any(|s| s.required), "{}", demo.id);
            assert!(!demo.stages.is_empty(), "{}", demo.id);
            assert!(demo.timeline().total_ms() > 0);
        }
    }

    #[test]
    fn test_size_ceilings_by_input_type() {
        assert_eq!(INVOICE.slot("file").map(|s| s.max_bytes), Some(DOCUMENT_MAX_BYTES));
        assert_eq!(BANK_REC.slot("bank_file").map(|s| s.max_bytes), Some(SPREADSHEET_MAX_BYTES));
        assert_eq!(EXPENSES.slot("receipts").map(|s| s.multiple), Some(true));
        assert!(BANK_REC.slot("receipts").is_none());
    }

    #[test]
    fn test_invoice_has_no_export() {
        assert!(INVOICE.export_endpoint.is_none());
        assert_eq!(AR_REC.export_endpoint, Some("ar-export"));
    }
}
