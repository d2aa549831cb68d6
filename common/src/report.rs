//! Excelレポート生成
//!
//! 結果ペイロードのサマリーカードと表をそのままワークブックに書き出す。
//! 1枚目が「Summary」、以降は表ごとに1シート。

use crate::payload::{ResultPayload, ResultTable, SummaryCard};
use rust_xlsxwriter::*;

/// Excelのシート名制約（31文字、一部記号不可）に合わせる
fn sheet_name(title: &str, used: &mut Vec<String>) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '-',
            other => other,
        })
        .take(28)
        .collect();
    let base = if cleaned.trim().is_empty() {
        "Sheet".to_string()
    } else {
        cleaned.trim().to_string()
    };

    let mut name = base.clone();
    let mut n = 2;
    while used.iter().any(|u| u.eq_ignore_ascii_case(&name)) {
        name = format!("{} {}", base, n);
        n += 1;
    }
    used.push(name.clone());
    name
}

fn write_summary(
    worksheet: &mut Worksheet,
    title: &str,
    cards: &[SummaryCard],
    title_format: &Format,
    label_format: &Format,
    value_format: &Format,
) -> Result<(), String> {
    worksheet
        .set_column_width(0, 28)
        .map_err(|e| format!("列幅設定エラー: {}", e))?;
    worksheet
        .set_column_width(1, 24)
        .map_err(|e| format!("列幅設定エラー: {}", e))?;
    worksheet
        .write_string_with_format(0, 0, title, title_format)
        .map_err(|e| format!("タイトル書き込みエラー: {}", e))?;

    for (i, card) in cards.iter().enumerate() {
        let row = i as u32 + 2;
        worksheet
            .write_string_with_format(row, 0, &card.label, label_format)
            .map_err(|e| format!("ラベル書き込みエラー: {}", e))?;
        worksheet
            .write_string_with_format(row, 1, &card.value, value_format)
            .map_err(|e| format!("値書き込みエラー: {}", e))?;
    }
    Ok(())
}

fn write_table(
    worksheet: &mut Worksheet,
    table: &ResultTable,
    header_format: &Format,
    value_format: &Format,
) -> Result<(), String> {
    for (col, header) in table.headers.iter().enumerate() {
        let col = col as u16;
        worksheet
            .write_string_with_format(0, col, header, header_format)
            .map_err(|e| format!("見出し書き込みエラー: {}", e))?;
        worksheet
            .set_column_width(col, 20)
            .map_err(|e| format!("列幅設定エラー: {}", e))?;
    }

    for (r, row) in table.rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            worksheet
                .write_string_with_format(r as u32 + 1, c as u16, value, value_format)
                .map_err(|e| format!("値書き込みエラー: {}", e))?;
        }
    }

    if !table.headers.is_empty() {
        worksheet
            .set_freeze_panes(1, 0)
            .map_err(|e| format!("固定枠設定エラー: {}", e))?;
    }
    Ok(())
}

/// レポートをバッファに生成
///
/// # Arguments
/// * `title` - サマリーシート先頭に書く見出し（デモ名など）
/// * `result` - 結果ペイロード
pub fn generate_report_buffer<R: ResultPayload>(title: &str, result: &R) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();

    let title_format = Format::new().set_bold().set_font_size(14.0);

    let label_format = Format::new()
        .set_bold()
        .set_font_size(10.0)
        .set_font_color(Color::RGB(0x555555))
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xAAAAAA));

    let value_format = Format::new()
        .set_font_size(11.0)
        .set_align(FormatAlign::Left)
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xCCCCCC));

    let mut used = Vec::new();

    let summary = workbook.add_worksheet();
    summary
        .set_name(sheet_name("Summary", &mut used))
        .map_err(|e| format!("シート名設定エラー: {}", e))?;
    write_summary(
        summary,
        title,
        &result.summary_cards(),
        &title_format,
        &label_format,
        &value_format,
    )?;

    for table in result.tables() {
        let name = sheet_name(&table.title, &mut used);
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(&name)
            .map_err(|e| format!("シート名設定エラー: {}", e))?;
        write_table(worksheet, &table, &label_format, &value_format)?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}
