//! 銀行照合の結果

use super::{lenient_count, lenient_f64, ResultPayload, ResultTable, SummaryCard, Tone};
use crate::format::{
    format_count, format_currency, format_date, format_percent, or_dash, DEFAULT_CURRENCY,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BankRecSummary {
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_bank_transactions: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_ledger_transactions: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub matched_count: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub unmatched_bank_count: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub unmatched_ledger_count: u64,
    /// 照合率（0〜100）
    #[serde(default, deserialize_with = "lenient_f64")]
    pub match_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankTransaction {
    pub date: String,
    pub description: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub amount: f64,
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedPair {
    pub bank_transaction: BankTransaction,
    pub ledger_transaction: BankTransaction,
    /// 一致度（0〜1）
    #[serde(default, deserialize_with = "lenient_f64")]
    pub confidence: f64,
    #[serde(default)]
    pub match_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankRecResult {
    pub summary: BankRecSummary,
    pub matched_pairs: Vec<MatchedPair>,
    pub unmatched_bank: Vec<BankTransaction>,
    pub unmatched_ledger: Vec<BankTransaction>,
}

fn transaction_row(tx: &BankTransaction) -> Vec<String> {
    vec![
        format_date(&tx.date),
        or_dash(&tx.description),
        format_currency(tx.amount, DEFAULT_CURRENCY),
        or_dash(&tx.reference),
    ]
}

impl ResultPayload for BankRecResult {
    fn summary_cards(&self) -> Vec<SummaryCard> {
        let s = &self.summary;
        vec![
            SummaryCard::count("Bank transactions", s.total_bank_transactions),
            SummaryCard::count("Ledger transactions", s.total_ledger_transactions),
            SummaryCard::new(
                "Matched",
                format_count(s.matched_count),
                Tone::Positive,
            ),
            SummaryCard::new(
                "Unmatched bank",
                format_count(s.unmatched_bank_count),
                Tone::for_exceptions(s.unmatched_bank_count),
            ),
            SummaryCard::new(
                "Unmatched ledger",
                format_count(s.unmatched_ledger_count),
                Tone::for_exceptions(s.unmatched_ledger_count),
            ),
            SummaryCard::new("Match rate", format_percent(s.match_rate), Tone::Neutral),
        ]
    }

    fn tables(&self) -> Vec<ResultTable> {
        let mut matched = ResultTable::new(
            "Matched transactions",
            &["Date", "Bank description", "Ledger description", "Amount", "Confidence", "Match type"],
        );
        for pair in &self.matched_pairs {
            matched.push(vec![
                format_date(&pair.bank_transaction.date),
                or_dash(&pair.bank_transaction.description),
                or_dash(&pair.ledger_transaction.description),
                format_currency(pair.bank_transaction.amount, DEFAULT_CURRENCY),
                format_percent(pair.confidence * 100.0),
                or_dash(&pair.match_type),
            ]);
        }

        let headers = ["Date", "Description", "Amount", "Reference"];
        let mut bank = ResultTable::new("Unmatched bank transactions", &headers);
        for tx in &self.unmatched_bank {
            bank.push(transaction_row(tx));
        }
        let mut ledger = ResultTable::new("Unmatched ledger entries", &headers);
        for tx in &self.unmatched_ledger {
            ledger.push(transaction_row(tx));
        }

        vec![matched, bank, ledger]
    }
}
