//! 経費（カード明細 × 領収書）照合の結果

use super::{lenient_count, lenient_f64, ResultPayload, ResultTable, SummaryCard, Tone};
use crate::format::{format_count, format_currency, format_date, format_percent, or_dash, DEFAULT_CURRENCY};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpenseSummary {
    #[serde(deserialize_with = "lenient_count")]
    pub total_transactions: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub total_receipts: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub matched_count: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub unmatched_count: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub orphaned_receipt_count: u64,
    #[serde(deserialize_with = "lenient_f64")]
    pub total_amount: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub matched_amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardTransaction {
    pub date: String,
    pub merchant: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub amount: f64,
    pub category: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Receipt {
    pub file_name: String,
    pub merchant: String,
    pub date: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseMatch {
    pub transaction: CardTransaction,
    pub receipt: Receipt,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryTotal {
    pub category: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub amount: f64,
    #[serde(deserialize_with = "lenient_count")]
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseResult {
    pub summary: ExpenseSummary,
    pub matches: Vec<ExpenseMatch>,
    pub unmatched_transactions: Vec<CardTransaction>,
    pub orphaned_receipts: Vec<Receipt>,
    /// 古いバックエンドは返さないので省略可
    #[serde(default)]
    pub category_breakdown: Vec<CategoryTotal>,
}

impl ExpenseResult {
    /// 金額ベースの領収書カバー率（0〜100）
    pub fn coverage_percent(&self) -> f64 {
        let s = &self.summary;
        if s.total_amount.abs() < f64::EPSILON {
            0.0
        } else {
            (s.matched_amount / s.total_amount * 100.0).clamp(0.0, 100.0)
        }
    }
}

fn money(amount: f64) -> String {
    format_currency(amount, DEFAULT_CURRENCY)
}

impl ResultPayload for ExpenseResult {
    fn summary_cards(&self) -> Vec<SummaryCard> {
        let s = &self.summary;
        vec![
            SummaryCard::count("Card transactions", s.total_transactions),
            SummaryCard::count("Receipts", s.total_receipts),
            SummaryCard::new("Matched", format_count(s.matched_count), Tone::Positive),
            SummaryCard::new(
                "Missing receipts",
                format_count(s.unmatched_count),
                Tone::for_exceptions(s.unmatched_count),
            ),
            SummaryCard::new(
                "Orphaned receipts",
                format_count(s.orphaned_receipt_count),
                Tone::for_exceptions(s.orphaned_receipt_count),
            ),
            SummaryCard::new("Total spend", money(s.total_amount), Tone::Neutral),
            SummaryCard::new("Receipt coverage", format_percent(self.coverage_percent()), Tone::Neutral),
        ]
    }

    fn tables(&self) -> Vec<ResultTable> {
        let mut matches = ResultTable::new(
            "Matched expenses",
            &["Date", "Merchant", "Amount", "Receipt", "Confidence"],
        );
        for m in &self.matches {
            matches.push(vec![
                format_date(&m.transaction.date),
                or_dash(&m.transaction.merchant),
                money(m.transaction.amount),
                or_dash(&m.receipt.file_name),
                format_percent(m.confidence * 100.0),
            ]);
        }

        let mut unmatched = ResultTable::new(
            "Transactions without receipts",
            &["Date", "Merchant", "Amount", "Category"],
        );
        for tx in &self.unmatched_transactions {
            unmatched.push(vec![
                format_date(&tx.date),
                or_dash(&tx.merchant),
                money(tx.amount),
                or_dash(&tx.category),
            ]);
        }

        let mut orphaned = ResultTable::new(
            "Receipts without transactions",
            &["File", "Merchant", "Date", "Amount"],
        );
        for r in &self.orphaned_receipts {
            orphaned.push(vec![
                or_dash(&r.file_name),
                or_dash(&r.merchant),
                format_date(&r.date),
                money(r.amount),
            ]);
        }

        let mut categories = ResultTable::new("Spend by category", &["Category", "Transactions", "Amount"]);
        for c in &self.category_breakdown {
            categories.push(vec![
                or_dash(&c.category),
                format_count(c.count),
                money(c.amount),
            ]);
        }

        vec![matches, unmatched, orphaned, categories]
    }
}
