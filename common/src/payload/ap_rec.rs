//! 買掛金（AP）照合の結果
//!
//! 売掛金（AR）照合も同じ形のレスポンスを返すため、この型を共用する。
//! その場合 `vendor_*` は取引先明細側を指す。

use super::{lenient_count, lenient_f64, ResultPayload, ResultTable, SummaryCard, Tone};
use crate::format::{format_count, format_currency, format_date, or_dash, DEFAULT_CURRENCY};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApRecSummary {
    #[serde(deserialize_with = "lenient_count")]
    pub total_vendor_invoices: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub total_ledger_invoices: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub matched_count: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub mismatch_count: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub missing_in_ledger_count: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub missing_in_vendor_count: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub duplicate_count: u64,
    #[serde(deserialize_with = "lenient_f64")]
    pub vendor_balance: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub ledger_balance: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub difference: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApInvoice {
    pub invoice_number: String,
    pub date: String,
    pub vendor: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApMatch {
    pub invoice_number: String,
    pub date: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApMismatch {
    pub invoice_number: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub vendor_amount: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub ledger_amount: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub difference: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApRecResult {
    pub summary: ApRecSummary,
    pub matched: Vec<ApMatch>,
    pub mismatches: Vec<ApMismatch>,
    pub missing_in_ledger: Vec<ApInvoice>,
    pub missing_in_vendor: Vec<ApInvoice>,
    pub duplicates: Vec<ApInvoice>,
}

impl ApRecResult {
    /// 例外（不一致・欠落・重複）の合計件数
    pub fn exception_count(&self) -> u64 {
        let s = &self.summary;
        s.mismatch_count + s.missing_in_ledger_count + s.missing_in_vendor_count + s.duplicate_count
    }

    pub fn is_balanced(&self) -> bool {
        self.summary.difference.abs() < 0.005
    }
}

fn money(amount: f64) -> String {
    format_currency(amount, DEFAULT_CURRENCY)
}

fn invoice_table(title: &str, invoices: &[ApInvoice]) -> ResultTable {
    let mut table = ResultTable::new(title, &["Invoice", "Date", "Counterparty", "Amount"]);
    for invoice in invoices {
        table.push(vec![
            or_dash(&invoice.invoice_number),
            format_date(&invoice.date),
            or_dash(&invoice.vendor),
            money(invoice.amount),
        ]);
    }
    table
}

impl ResultPayload for ApRecResult {
    fn summary_cards(&self) -> Vec<SummaryCard> {
        let s = &self.summary;
        vec![
            SummaryCard::count("Statement invoices", s.total_vendor_invoices),
            SummaryCard::count("Ledger invoices", s.total_ledger_invoices),
            SummaryCard::new("Matched", format_count(s.matched_count), Tone::Positive),
            SummaryCard::new(
                "Amount mismatches",
                format_count(s.mismatch_count),
                Tone::for_exceptions(s.mismatch_count),
            ),
            SummaryCard::new(
                "Missing in ledger",
                format_count(s.missing_in_ledger_count),
                Tone::for_exceptions(s.missing_in_ledger_count),
            ),
            SummaryCard::new(
                "Missing in statement",
                format_count(s.missing_in_vendor_count),
                Tone::for_exceptions(s.missing_in_vendor_count),
            ),
            SummaryCard::new(
                "Duplicates",
                format_count(s.duplicate_count),
                Tone::for_exceptions(s.duplicate_count),
            ),
            SummaryCard::new("Statement balance", money(s.vendor_balance), Tone::Neutral),
            SummaryCard::new("Ledger balance", money(s.ledger_balance), Tone::Neutral),
            SummaryCard::new(
                "Difference",
                money(s.difference),
                if self.is_balanced() {
                    Tone::Positive
                } else {
                    Tone::Negative
                },
            ),
        ]
    }

    fn tables(&self) -> Vec<ResultTable> {
        let mut matched = ResultTable::new("Matched invoices", &["Invoice", "Date", "Amount"]);
        for m in &self.matched {
            matched.push(vec![
                or_dash(&m.invoice_number),
                format_date(&m.date),
                money(m.amount),
            ]);
        }

        let mut mismatches = ResultTable::new(
            "Amount mismatches",
            &["Invoice", "Statement amount", "Ledger amount", "Difference", "Reason"],
        );
        for m in &self.mismatches {
            mismatches.push(vec![
                or_dash(&m.invoice_number),
                money(m.vendor_amount),
                money(m.ledger_amount),
                money(m.difference),
                or_dash(&m.reason),
            ]);
        }

        vec![
            matched,
            mismatches,
            invoice_table("Missing in ledger", &self.missing_in_ledger),
            invoice_table("Missing in statement", &self.missing_in_vendor),
            invoice_table("Duplicates", &self.duplicates),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "summary": {
            "total_vendor_invoices": 12,
            "total_ledger_invoices": 11,
            "matched_count": 9,
            "mismatch_count": 1,
            "missing_in_ledger_count": 2,
            "missing_in_vendor_count": 0,
            "duplicate_count": 1,
            "vendor_balance": 15420.5,
            "ledger_balance": 14100.0,
            "difference": 1320.5
        },
        "matched": [{"invoice_number": "INV-001", "date": "2024-02-01", "amount": 500}],
        "mismatches": [{"invoice_number": "INV-004", "vendor_amount": 1200, "ledger_amount": 1020, "difference": 180, "reason": "Amount differs"}],
        "missing_in_ledger": [
            {"invoice_number": "INV-010", "date": "2024-02-20", "vendor": "Northwind", "amount": 640.5},
            {"invoice_number": "INV-011", "date": "2024-02-21", "vendor": "Northwind", "amount": 500}
        ],
        "missing_in_vendor": [],
        "duplicates": [{"invoice_number": "INV-002", "date": "2024-02-03", "vendor": "Northwind", "amount": 75}]
    }"#;

    fn sample() -> ApRecResult {
        serde_json::from_str(SAMPLE).expect("parse")
    }

    #[test]
    fn test_exception_count() {
        assert_eq!(sample().exception_count(), 4);
    }

    #[test]
    fn test_difference_tone() {
        let result = sample();
        let cards = result.summary_cards();
        let diff = cards.iter().find(|c| c.label == "Difference").expect("card");
        assert_eq!(diff.value, "£1,320.50");
        assert_eq!(diff.tone, Tone::Negative);

        let mut balanced = result.clone();
        balanced.summary.difference = 0.0;
        let cards = balanced.summary_cards();
        assert_eq!(cards.last().map(|c| c.tone), Some(Tone::Positive));
    }

    #[test]
    fn test_tables_cover_every_set() {
        let tables = sample().tables();
        let sizes: Vec<usize> = tables.iter().map(|t| t.rows.len()).collect();
        assert_eq!(sizes, vec![1, 1, 2, 0, 1]);
        assert_eq!(tables[1].rows[0][4], "Amount differs");
    }

    #[test]
    fn test_missing_set_is_rejected() {
        let json = r#"{"summary": {}, "matched": [], "mismatches": []}"#;
        assert!(serde_json::from_str::<ApRecResult>(json).is_err());
    }
}
