//! 結果の端末表示

use ledgerlift_common::{ResultTable, SummaryCard, Tone};
use std::fmt::Write;

/// 1セルの最大表示幅（超えたら省略）
const MAX_CELL_WIDTH: usize = 40;

fn tone_marker(tone: Tone) -> &'static str {
    match tone {
        Tone::Neutral => " ",
        Tone::Positive => "✔",
        Tone::Warning => "!",
        Tone::Negative => "✘",
    }
}

fn truncate(cell: &str) -> String {
    if cell.chars().count() <= MAX_CELL_WIDTH {
        return cell.to_string();
    }
    let mut cut: String = cell.chars().take(MAX_CELL_WIDTH - 1).collect();
    cut.push('…');
    cut
}

fn pad(cell: &str, width: usize) -> String {
    let len = cell.chars().count();
    format!("{}{}", cell, " ".repeat(width.saturating_sub(len)))
}

pub fn render_cards(cards: &[SummaryCard]) -> String {
    let width = cards.iter().map(|c| c.label.chars().count()).max().unwrap_or(0);
    let mut out = String::new();
    for card in cards {
        let _ = writeln!(out, "{} {}  {}", tone_marker(card.tone), pad(&card.label, width), card.value);
    }
    out
}

pub fn render_table(table: &ResultTable) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", table.title);

    if table.is_empty() {
        let _ = writeln!(out, "  (no items)");
        return out;
    }

    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(|cell| truncate(cell)).collect())
        .collect();

    let mut widths: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            let len = cell.chars().count();
            match widths.get_mut(i) {
                Some(w) => *w = (*w).max(len),
                None => widths.push(len),
            }
        }
    }

    let line = |cells: &[String]| -> String {
        let padded: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, w)| pad(cells.get(i).map(String::as_str).unwrap_or(""), *w))
            .collect();
        format!("  {}", padded.join("  ").trim_end())
    };

    let _ = writeln!(out, "{}", line(&table.headers));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "  {}", rule.join("  "));
    for row in &rows {
        let _ = writeln!(out, "{}", line(row));
    }
    out
}

/// サマリーカードと全表をまとめて整形
pub fn render_result(cards: &[SummaryCard], tables: &[ResultTable]) -> String {
    let mut out = render_cards(cards);
    for table in tables {
        out.push('\n');
        out.push_str(&render_table(table));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_columns_aligned() {
        let mut table = ResultTable::new("Matches", &["Date", "Amount"]);
        table.push(vec!["15 Jan 2024".into(), "$1,200.00".into()]);
        table.push(vec!["2 Feb 2024".into(), "$5.00".into()]);

        let text = render_table(&table);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Matches");
        assert_eq!(lines[1], "  Date         Amount");
        assert_eq!(lines[3], "  15 Jan 2024  $1,200.00");
        assert_eq!(lines[4], "  2 Feb 2024   $5.00");
    }

    #[test]
    fn test_empty_table() {
        let table = ResultTable::new("Exceptions", &["Item"]);
        assert_eq!(render_table(&table), "Exceptions\n  (no items)\n");
    }

    #[test]
    fn test_long_cell_truncated() {
        let long = "x".repeat(60);
        let cell = truncate(&long);
        assert_eq!(cell.chars().count(), MAX_CELL_WIDTH);
        assert!(cell.ends_with('…'));
    }

    #[test]
    fn test_cards_marked_by_tone() {
        let cards = vec![
            SummaryCard::new("Matched", "12", Tone::Positive),
            SummaryCard::new("Exceptions", "3", Tone::Warning),
        ];
        let text = render_cards(&cards);
        assert!(text.contains("✔ Matched     12"));
        assert!(text.contains("! Exceptions  3"));
    }
}
