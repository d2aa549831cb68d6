//! 10-K（年次報告書）分析の結果
//!
//! 損益計算書は直近3期、貸借対照表は直近2期に揃える。
//! 配列は古い順に並ぶ前提で、不足分は先頭を0（年度は空）で埋める。

use super::{number_from_value, ResultPayload, ResultTable, SummaryCard, Tone};
use crate::format::{format_compact_currency, format_percent, or_dash};
use serde::{Deserialize, Deserializer, Serialize};

pub const INCOME_STATEMENT_YEARS: usize = 3;
pub const BALANCE_SHEET_YEARS: usize = 2;

fn lenient_series<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?;
    Ok(values
        .unwrap_or_default()
        .iter()
        .map(number_from_value)
        .collect())
}

fn lenient_years<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?;
    Ok(values
        .unwrap_or_default()
        .into_iter()
        .map(|v| match v {
            serde_json::Value::String(s) => s,
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        })
        .collect())
}

/// 長さを `len` に揃える（長ければ末尾=直近を残す、短ければ先頭を埋める）
fn fit_to<T: Clone>(values: &mut Vec<T>, len: usize, filler: T) {
    if values.len() > len {
        values.drain(..values.len() - len);
    } else if values.len() < len {
        let mut padded = vec![filler; len - values.len()];
        padded.append(values);
        *values = padded;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncomeStatement {
    #[serde(deserialize_with = "lenient_years")]
    pub years: Vec<String>,
    #[serde(deserialize_with = "lenient_series")]
    pub revenue: Vec<f64>,
    #[serde(deserialize_with = "lenient_series")]
    pub cost_of_revenue: Vec<f64>,
    #[serde(deserialize_with = "lenient_series")]
    pub gross_profit: Vec<f64>,
    #[serde(deserialize_with = "lenient_series")]
    pub operating_income: Vec<f64>,
    #[serde(deserialize_with = "lenient_series")]
    pub net_income: Vec<f64>,
}

impl IncomeStatement {
    fn is_blank(&self) -> bool {
        [
            &self.revenue,
            &self.cost_of_revenue,
            &self.gross_profit,
            &self.operating_income,
            &self.net_income,
        ]
        .iter()
        .all(|series| series.is_empty())
    }

    fn normalize(&mut self) {
        let n = INCOME_STATEMENT_YEARS;
        fit_to(&mut self.years, n, String::new());
        for series in [
            &mut self.revenue,
            &mut self.cost_of_revenue,
            &mut self.gross_profit,
            &mut self.operating_income,
            &mut self.net_income,
        ] {
            fit_to(series, n, 0.0);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceSheet {
    #[serde(deserialize_with = "lenient_years")]
    pub years: Vec<String>,
    #[serde(deserialize_with = "lenient_series")]
    pub total_assets: Vec<f64>,
    #[serde(deserialize_with = "lenient_series")]
    pub total_liabilities: Vec<f64>,
    #[serde(deserialize_with = "lenient_series")]
    pub shareholders_equity: Vec<f64>,
    #[serde(deserialize_with = "lenient_series")]
    pub cash: Vec<f64>,
}

impl BalanceSheet {
    fn is_blank(&self) -> bool {
        [
            &self.total_assets,
            &self.total_liabilities,
            &self.shareholders_equity,
            &self.cash,
        ]
        .iter()
        .all(|series| series.is_empty())
    }

    fn normalize(&mut self) {
        let n = BALANCE_SHEET_YEARS;
        fit_to(&mut self.years, n, String::new());
        for series in [
            &mut self.total_assets,
            &mut self.total_liabilities,
            &mut self.shareholders_equity,
            &mut self.cash,
        ] {
            fit_to(series, n, 0.0);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenKAnalysis {
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub fiscal_year: String,
    #[serde(default)]
    pub currency: String,
    pub income_statement: IncomeStatement,
    pub balance_sheet: BalanceSheet,
}

impl TenKAnalysis {
    fn money(&self, amount: f64) -> String {
        let currency = if self.currency.is_empty() { "USD" } else { &self.currency };
        format_compact_currency(amount, currency)
    }

    /// 直近期の売上総利益率（%）。売上0なら `None`
    pub fn gross_margin(&self) -> Option<f64> {
        let revenue = *self.income_statement.revenue.last()?;
        let gross = *self.income_statement.gross_profit.last()?;
        if revenue.abs() < f64::EPSILON {
            None
        } else {
            Some(gross / revenue * 100.0)
        }
    }

    fn year_headers(first: &str, years: &[String]) -> Vec<String> {
        std::iter::once(first.to_string())
            .chain(years.iter().enumerate().map(|(i, y)| {
                if y.trim().is_empty() {
                    format!("Year {}", i + 1)
                } else {
                    y.clone()
                }
            }))
            .collect()
    }

    fn series_row(&self, label: &str, series: &[f64]) -> Vec<String> {
        std::iter::once(label.to_string())
            .chain(series.iter().map(|v| self.money(*v)))
            .collect()
    }
}

impl ResultPayload for TenKAnalysis {
    fn validate(&mut self) -> Result<(), String> {
        if self.income_statement.is_blank() && self.balance_sheet.is_blank() {
            return Err("the filing contained no financial statements".to_string());
        }
        self.income_statement.normalize();
        self.balance_sheet.normalize();
        Ok(())
    }

    fn summary_cards(&self) -> Vec<SummaryCard> {
        let latest = |series: &[f64]| series.last().copied().unwrap_or(0.0);
        let net_income = latest(&self.income_statement.net_income);
        vec![
            SummaryCard::new("Company", or_dash(&self.company_name), Tone::Neutral),
            SummaryCard::new("Fiscal year", or_dash(&self.fiscal_year), Tone::Neutral),
            SummaryCard::new(
                "Revenue",
                self.money(latest(&self.income_statement.revenue)),
                Tone::Neutral,
            ),
            SummaryCard::new(
                "Net income",
                self.money(net_income),
                if net_income < 0.0 {
                    Tone::Negative
                } else {
                    Tone::Positive
                },
            ),
            SummaryCard::new(
                "Gross margin",
                self.gross_margin().map(format_percent).unwrap_or_else(|| "-".to_string()),
                Tone::Neutral,
            ),
            SummaryCard::new(
                "Total assets",
                self.money(latest(&self.balance_sheet.total_assets)),
                Tone::Neutral,
            ),
        ]
    }

    fn tables(&self) -> Vec<ResultTable> {
        let is = &self.income_statement;
        let mut income = ResultTable {
            title: "Income statement".to_string(),
            headers: Self::year_headers("Line item", &is.years),
            rows: Vec::new(),
        };
        income.push(self.series_row("Revenue", &is.revenue));
        income.push(self.series_row("Cost of revenue", &is.cost_of_revenue));
        income.push(self.series_row("Gross profit", &is.gross_profit));
        income.push(self.series_row("Operating income", &is.operating_income));
        income.push(self.series_row("Net income", &is.net_income));

        let bs = &self.balance_sheet;
        let mut balance = ResultTable {
            title: "Balance sheet".to_string(),
            headers: Self::year_headers("Line item", &bs.years),
            rows: Vec::new(),
        };
        balance.push(self.series_row("Total assets", &bs.total_assets));
        balance.push(self.series_row("Total liabilities", &bs.total_liabilities));
        balance.push(self.series_row("Shareholders' equity", &bs.shareholders_equity));
        balance.push(self.series_row("Cash", &bs.cash));

        vec![income, balance]
    }
}
