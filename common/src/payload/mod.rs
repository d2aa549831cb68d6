//! デモごとの結果ペイロード
//!
//! バックエンドが返すJSONを型付きで受け、画面・端末・Excelで共通の
//! 「サマリーカード + 表」に変換する。
//! 数値の葉は欠損時0（`#[serde(default)]`）、構造（配列・summary）は必須。

pub mod ap_rec;
pub mod bank_rec;
pub mod expense;
pub mod invoice;
pub mod ten_k;

pub use ap_rec::{ApInvoice, ApMatch, ApMismatch, ApRecResult, ApRecSummary};
pub use bank_rec::{BankRecResult, BankRecSummary, BankTransaction, MatchedPair};
pub use expense::{CardTransaction, CategoryTotal, ExpenseMatch, ExpenseResult, ExpenseSummary, Receipt};
pub use invoice::InvoiceExtraction;
pub use ten_k::{BalanceSheet, IncomeStatement, TenKAnalysis};

use crate::http::HttpReply;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// カードの色味
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Positive,
    Warning,
    Negative,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Neutral => "neutral",
            Tone::Positive => "positive",
            Tone::Warning => "warning",
            Tone::Negative => "negative",
        }
    }

    /// 件数が0なら良好、それ以外は注意
    pub fn for_exceptions(count: u64) -> Self {
        if count == 0 {
            Tone::Positive
        } else {
            Tone::Warning
        }
    }
}

/// サマリーカード1枚
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryCard {
    pub label: String,
    pub value: String,
    pub tone: Tone,
}

impl SummaryCard {
    pub fn new(label: &str, value: impl Into<String>, tone: Tone) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
            tone,
        }
    }

    pub fn count(label: &str, count: u64) -> Self {
        Self::new(label, crate::format::format_count(count), Tone::Neutral)
    }
}

/// 結果の表
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultTable {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ResultTable {
    pub fn new(title: &str, headers: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// 結果ペイロード共通のふるまい
pub trait ResultPayload: DeserializeOwned + Serialize + Clone + 'static {
    /// 受信直後の境界検証・正規化。NGなら理由を返す
    fn validate(&mut self) -> Result<(), String> {
        Ok(())
    }

    fn summary_cards(&self) -> Vec<SummaryCard>;

    fn tables(&self) -> Vec<ResultTable>;
}

/// 数値・数値文字列（"1,234.50"）・null を受け付け、解釈できなければ0
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(number_from_value).unwrap_or(0.0))
}

/// JSON値1つを数値として読む（`lenient_f64` と同じ規則）
pub(crate) fn number_from_value(value: &serde_json::Value) -> f64 {
    match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();
            cleaned.parse().unwrap_or(0.0)
        }
        _ => 0.0,
    }
}

/// 件数用。`12`・`12.0`・`"12"` を受け付け、負数や解釈不能は0
pub(crate) fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = lenient_f64(deserializer)?;
    Ok(if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    })
}

/// 2xxレスポンスを型付き結果へ
pub fn decode<R: ResultPayload>(reply: &HttpReply) -> Result<R, String> {
    let mut payload: R = reply
        .json()
        .map_err(|e| format!("unexpected response shape: {}", e))?;
    payload.validate()?;
    Ok(payload)
}
