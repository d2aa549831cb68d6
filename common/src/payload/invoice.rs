//! 請求書読み取り結果

use super::{lenient_f64, ResultPayload, ResultTable, SummaryCard, Tone};
use crate::format::{format_currency, format_date, or_dash};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceExtraction {
    #[serde(alias = "supplierName")]
    pub supplier_name: String,
    #[serde(alias = "invoiceNumber")]
    pub invoice_number: String,
    #[serde(alias = "invoiceDate")]
    pub invoice_date: String,
    #[serde(alias = "dueDate")]
    pub due_date: String,
    #[serde(alias = "netAmount", deserialize_with = "lenient_f64")]
    pub net_amount: f64,
    #[serde(alias = "vatAmount", deserialize_with = "lenient_f64")]
    pub vat_amount: f64,
    #[serde(alias = "totalAmount", deserialize_with = "lenient_f64")]
    pub total_amount: f64,
    pub currency: String,
}

impl InvoiceExtraction {
    /// 明細どおりなら 税抜 + VAT = 合計（1ペニー未満の誤差は許容）
    pub fn totals_consistent(&self) -> bool {
        (self.net_amount + self.vat_amount - self.total_amount).abs() < 0.01
    }

    fn money(&self, amount: f64) -> String {
        format_currency(amount, &self.currency)
    }
}

impl ResultPayload for InvoiceExtraction {
    fn summary_cards(&self) -> Vec<SummaryCard> {
        vec![
            SummaryCard::new("Supplier", or_dash(&self.supplier_name), Tone::Neutral),
            SummaryCard::new("Invoice number", or_dash(&self.invoice_number), Tone::Neutral),
            SummaryCard::new(
                "Total amount",
                self.money(self.total_amount),
                if self.totals_consistent() {
                    Tone::Positive
                } else {
                    Tone::Warning
                },
            ),
        ]
    }

    fn tables(&self) -> Vec<ResultTable> {
        let mut table = ResultTable::new("Extracted fields", &["Field", "Value"]);
        let rows = [
            ("Supplier name", or_dash(&self.supplier_name)),
            ("Invoice number", or_dash(&self.invoice_number)),
            ("Invoice date", format_date(&self.invoice_date)),
            ("Due date", format_date(&self.due_date)),
            ("Net amount", self.money(self.net_amount)),
            ("VAT amount", self.money(self.vat_amount)),
            ("Total amount", self.money(self.total_amount)),
            ("Currency", or_dash(&self.currency)),
        ];
        for (label, value) in rows {
            table.push(vec![label.to_string(), value]);
        }
        vec![table]
    }
}
