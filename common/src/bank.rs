//! 問題集ローダー
//!
//! アップロードされたExcel（またはCSV）の第1シートを、
//! AIへ参照データとして渡すカンマ区切りテキストに平坦化する。
//!
//! - 区切り: フィールドは `,`、行は `\n`
//! - `,` `"` 改行を含むフィールドはダブルクォートで囲む（`"` は `""` に）
//! - 全セルが空の行は出力しない

use crate::error::{Error, Result};
use crate::types::QuestionBank;
use calamine::{open_workbook_auto_from_rs, Data, ExcelDateTime, Reader};
use chrono::Timelike;
use std::io::Cursor;
use std::path::Path;

/// 入力ファイルの形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BankFormat {
    /// xlsx / xlsm / xlsb / xls / ods（calamineが自動判定）
    #[default]
    Workbook,
    /// UTF-8のCSVテキスト
    Csv,
}

impl BankFormat {
    /// 拡張子から形式を判定（`.csv` 以外はワークブック扱い）
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => BankFormat::Csv,
            _ => BankFormat::Workbook,
        }
    }
}

/// ワークブックのバイト列から問題集を生成
pub fn load(name: &str, bytes: &[u8]) -> Result<QuestionBank> {
    load_with_format(name, bytes, BankFormat::Workbook)
}

/// 形式を指定して問題集を生成
pub fn load_with_format(name: &str, bytes: &[u8], format: BankFormat) -> Result<QuestionBank> {
    let rows = match format {
        BankFormat::Workbook => read_first_sheet(bytes)?,
        BankFormat::Csv => parse_csv(decode_utf8(bytes)?)?,
    };

    let (text, count) = flatten_rows(&rows);
    if count == 0 {
        return Err(Error::BankDecode("第1シートにデータがありません".into()));
    }

    Ok(QuestionBank::new(name, text, count))
}

/// ファイルを読み込んで問題集を生成（形式は拡張子で判定）
pub fn load_file(path: &Path) -> Result<QuestionBank> {
    let bytes = std::fs::read(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    load_with_format(&name, &bytes, BankFormat::from_path(path))
}

fn read_first_sheet(bytes: &[u8]) -> Result<Vec<Vec<String>>> {
    let mut sheets = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| Error::BankDecode(e.to_string()))?;

    // 2枚目以降のシートは無視
    let range = sheets
        .worksheet_range_at(0)
        .ok_or_else(|| Error::BankDecode("シートがありません".into()))?
        .map_err(|e| Error::BankDecode(e.to_string()))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(render_cell).collect())
        .collect())
}

fn render_cell(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_number(*f),
        Data::Bool(true) => "TRUE".to_string(),
        Data::Bool(false) => "FALSE".to_string(),
        Data::DateTime(dt) => format_datetime(dt),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
    }
}

/// 整数値の浮動小数は小数点なしで出力（4.0 → "4"）
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn format_datetime(dt: &ExcelDateTime) -> String {
    match dt.as_datetime() {
        Some(ndt) if ndt.time().num_seconds_from_midnight() == 0 => {
            ndt.format("%Y-%m-%d").to_string()
        }
        Some(ndt) => ndt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => format_number(dt.as_f64()),
    }
}

/// 行データをCSVテキストに変換し、(テキスト, 出力行数) を返す
fn flatten_rows(rows: &[Vec<String>]) -> (String, usize) {
    let mut text = String::new();
    let mut count = 0;

    for row in rows {
        if row.iter().all(|field| field.is_empty()) {
            continue;
        }
        let line = row
            .iter()
            .map(|field| escape_field(field))
            .collect::<Vec<_>>()
            .join(",");
        text.push_str(&line);
        text.push('\n');
        count += 1;
    }

    (text, count)
}

/// CSVフィールドのエスケープ
pub fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn decode_utf8(bytes: &[u8]) -> Result<&str> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    std::str::from_utf8(bytes)
        .map_err(|e| Error::BankDecode(format!("CSVがUTF-8ではありません: {}", e)))
}

/// CSVテキストをレコード単位でパース（クォート内の改行・カンマに対応）
fn parse_csv(content: &str) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(Error::BankDecode("CSVのクォートが閉じられていません".into()));
    }

    // 最終行（末尾改行なし）
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    Ok(rows)
}
