//! 表示用フォーマット（通貨・日付・割合）
//!
//! 結果データの加工はここでの整形だけに留める。

use chrono::{DateTime, NaiveDate};

/// 通貨未指定時の既定
pub const DEFAULT_CURRENCY: &str = "GBP";

fn currency_symbol(code: &str) -> Option<&'static str> {
    match code.trim().to_ascii_uppercase().as_str() {
        "GBP" | "£" => Some("£"),
        "USD" | "$" => Some("$"),
        "EUR" | "€" => Some("€"),
        "JPY" | "¥" => Some("¥"),
        _ => None,
    }
}

/// 整数部を3桁区切りにする
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// 非有限値は0扱い
pub fn safe_number(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// 小数点以下 `decimals` 桁、3桁区切り
pub fn format_number(value: f64, decimals: usize) -> String {
    let value = safe_number(value);
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (formatted.clone(), None),
    };
    let sign = if value < 0.0 && formatted.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, group_thousands(&int_part), frac),
        None => format!("{}{}", sign, group_thousands(&int_part)),
    }
}

/// 通貨表示（例: `£1,234.56`, `-$20.00`, `CHF 10.00`）
pub fn format_currency(amount: f64, currency: &str) -> String {
    let code = if currency.trim().is_empty() {
        DEFAULT_CURRENCY
    } else {
        currency
    };
    let number = format_number(amount, 2);
    let (sign, digits) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest.to_string()),
        None => ("", number),
    };
    match currency_symbol(code) {
        Some(symbol) => format!("{}{}{}", sign, symbol, digits),
        None => format!("{}{} {}", sign, code.trim().to_ascii_uppercase(), digits),
    }
}

/// 大きな金額の短縮表示（10-K向け）
pub fn format_compact_currency(amount: f64, currency: &str) -> String {
    let amount = safe_number(amount);
    let abs = amount.abs();
    let (scaled, suffix) = if abs >= 1e9 {
        (amount / 1e9, "B")
    } else if abs >= 1e6 {
        (amount / 1e6, "M")
    } else if abs >= 1e3 {
        (amount / 1e3, "K")
    } else {
        return format_currency(amount, currency);
    };
    let code = if currency.trim().is_empty() {
        DEFAULT_CURRENCY
    } else {
        currency
    };
    let number = format_number(scaled, 1);
    let (sign, digits) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest.to_string()),
        None => ("", number),
    };
    match currency_symbol(code) {
        Some(symbol) => format!("{}{}{}{}", sign, symbol, digits, suffix),
        None => format!("{}{} {}{}", sign, code.trim().to_ascii_uppercase(), digits, suffix),
    }
}

/// 割合表示。値は0〜100のパーセント値
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", safe_number(value))
}

/// 件数表示
pub fn format_count(count: u64) -> String {
    group_thousands(&count.to_string())
}

/// ISO日付を `15 Jan 2024` 形式に。解釈できなければそのまま、空なら `-`
pub fn format_date(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return "-".to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%d %b %Y").to_string();
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return datetime.format("%d %b %Y").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%d/%m/%Y") {
        return date.format("%d %b %Y").to_string();
    }
    raw.to_string()
}

/// 空文字を `-` に
pub fn or_dash(value: &str) -> String {
    if value.trim().is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("1234"), "1,234");
        assert_eq!(group_thousands("1234567"), "1,234,567");
        assert_eq!(group_thousands("123456"), "123,456");
    }

    #[test]
    fn test_format_currency_symbols() {
        assert_eq!(format_currency(1234.5, "GBP"), "£1,234.50");
        assert_eq!(format_currency(99.999, "usd"), "$100.00");
        assert_eq!(format_currency(0.0, ""), "£0.00");
        assert_eq!(format_currency(10.0, "CHF"), "CHF 10.00");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(-20.0, "USD"), "-$20.00");
        assert_eq!(format_currency(-0.001, "USD"), "$0.00");
    }

    #[test]
    fn test_non_finite_is_zero() {
        assert_eq!(format_currency(f64::NAN, "EUR"), "€0.00");
        assert_eq!(format_percent(f64::INFINITY), "0.0%");
    }

    #[test]
    fn test_format_compact_currency() {
        assert_eq!(format_compact_currency(394_328_000_000.0, "USD"), "$394.3B");
        assert_eq!(format_compact_currency(2_500_000.0, "GBP"), "£2.5M");
        assert_eq!(format_compact_currency(-12_000.0, "USD"), "-$12.0K");
        assert_eq!(format_compact_currency(950.0, "USD"), "$950.00");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(87.456), "87.5%");
    }

    #[test]
    fn test_format_date_variants() {
        assert_eq!(format_date("2024-01-15"), "15 Jan 2024");
        assert_eq!(format_date("2024-03-02T10:00:00Z"), "02 Mar 2024");
        assert_eq!(format_date("31/12/2023"), "31 Dec 2023");
        assert_eq!(format_date("next Tuesday"), "next Tuesday");
        assert_eq!(format_date("  "), "-");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(1_250), "1,250");
    }
}
