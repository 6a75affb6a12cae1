//! Delimited-text statement reader.
//!
//! Bank portals export statements as `;`, `,` or tab separated text, often
//! with a UTF-8 BOM and a ragged tail (totals, signatures). The first
//! non-empty line is the header; every later line becomes a row keyed by it.
//!
//!   Дата операції;Сума;Призначення платежу
//!   15.01.2024;1 000,50;Оплата за послуги

use anyhow::{Context, Result};
use ledger_core::{CellValue, RawRow, Statement};
use log::debug;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use crate::error::IngestError;
use crate::workbook::{is_workbook, read_workbook};

const CANDIDATE_DELIMITERS: [u8; 3] = [b';', b'\t', b','];

fn numeric_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[+-]?\d+(?:\.\d+)?(?:[eE][+-]?\d+)?$").expect("static numeric pattern")
    })
}

/// Read a statement file from disk. Workbooks are picked by extension.
pub fn read_statement(path: impl AsRef<Path>) -> Result<Statement> {
    let path = path.as_ref();
    if is_workbook(path) {
        return read_workbook(path);
    }
    let bytes = fs::read(path).with_context(|| format!("opening {}", path.display()))?;
    let text = String::from_utf8(bytes)
        .with_context(|| format!("{} is not valid UTF-8", path.display()))?;
    read_statement_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Pick the candidate delimiter that appears most often in the header line.
/// Ties go to `;`, then tab, then `,`.
pub fn detect_delimiter(header_line: &str) -> u8 {
    let mut best = CANDIDATE_DELIMITERS[0];
    let mut best_count = 0;
    for d in CANDIDATE_DELIMITERS {
        let count = header_line.bytes().filter(|b| *b == d).count();
        if count > best_count {
            best = d;
            best_count = count;
        }
    }
    best
}

/// Type a raw text field the way a spreadsheet would: blank, plain number,
/// or text. Comma-decimal amounts stay text for the amount normalizer.
pub fn parse_cell(field: &str) -> CellValue {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return CellValue::Empty;
    }
    if numeric_re().is_match(trimmed) {
        if let Ok(n) = trimmed.parse::<f64>() {
            return CellValue::Number(n);
        }
    }
    CellValue::Text(trimmed.to_string())
}

pub fn read_statement_str(text: &str) -> Result<Statement> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let Some((offset, header_line)) = first_content_line(text) else {
        return Err(IngestError::EmptyStatement.into());
    };
    let delimiter = detect_delimiter(header_line);

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .has_headers(false)
        .from_reader(text[offset..].as_bytes());

    let mut records = rdr.records();
    let header = match records.next() {
        Some(record) => record.map_err(IngestError::from)?,
        None => return Err(IngestError::EmptyStatement.into()),
    };
    let header: Vec<String> = header.iter().map(str::to_string).collect();

    let mut body = Vec::new();
    for result in records {
        let record = result.map_err(IngestError::from)?;
        body.push(record.iter().map(parse_cell).collect::<Vec<_>>());
    }

    Ok(assemble(header, body))
}

/// Byte offset and text of the first line with anything but whitespace.
fn first_content_line(text: &str) -> Option<(usize, &str)> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if !line.trim().is_empty() {
            return Some((offset, line));
        }
        offset += line.len();
    }
    None
}

/// Key every record by the header. Blank header cells get `Колонка N`,
/// short records are padded with blanks and fully blank records dropped.
pub(crate) fn assemble(
    header: Vec<String>,
    records: impl IntoIterator<Item = Vec<CellValue>>,
) -> Statement {
    let columns: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let name = cell.trim();
            if name.is_empty() {
                format!("Колонка {}", idx + 1)
            } else {
                name.to_string()
            }
        })
        .collect();

    let mut rows = Vec::new();
    let mut skipped_blank = 0usize;
    for record in records {
        let mut cells = record.into_iter();
        let row: RawRow = columns
            .iter()
            .map(|column| (column.clone(), cells.next().unwrap_or_default()))
            .collect();

        if row.values().all(CellValue::is_blank) {
            skipped_blank += 1;
            continue;
        }
        rows.push(row);
    }

    debug!(
        "read statement: {} columns, {} rows, {} blank rows skipped",
        columns.len(),
        rows.len(),
        skipped_blank
    );

    Statement::new(columns, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parses_semicolon_export() {
        let text = "\u{feff}Дата операції;Сума;Призначення платежу\n\
                    15.01.2024;1 000,50;Оплата за послуги\n\
                    16.01.2024;250;\n\
                    ;;\n\
                    Разом;1250,50\n";

        let s = read_statement_str(text).unwrap();
        assert_eq!(s.columns, vec!["Дата операції", "Сума", "Призначення платежу"]);
        assert_eq!(s.rows.len(), 3);

        let first = &s.rows[0];
        assert_eq!(first["Дата операції"], CellValue::from("15.01.2024"));
        assert_eq!(first["Сума"], CellValue::from("1 000,50"));
        assert_eq!(s.rows[1]["Сума"], CellValue::Number(250.0));
        assert_eq!(s.rows[1]["Призначення платежу"], CellValue::Empty);

        // short trailing row is padded
        assert_eq!(s.rows[2]["Призначення платежу"], CellValue::Empty);
    }

    #[test]
    fn test_whitespace_lines_before_header() {
        let s = read_statement_str("   \n\t\nДата;Сума\n15.01.2024;10\n").unwrap();
        assert_eq!(s.columns, vec!["Дата", "Сума"]);
        assert_eq!(s.rows.len(), 1);
        assert_eq!(s.rows[0]["Сума"], CellValue::Number(10.0));
    }

    #[test]
    fn test_blank_headers_get_placeholder_names() {
        let s = read_statement_str("Date,,Amount\n2024-01-01,x,5\n").unwrap();
        assert_eq!(s.columns, vec!["Date", "Колонка 2", "Amount"]);
        assert_eq!(s.rows[0]["Колонка 2"], CellValue::from("x"));
    }

    #[test]
    fn test_tab_delimited() {
        let s = read_statement_str("Дата\tКредит\tДебет\n01.02.2024\t100.00\t\n").unwrap();
        assert_eq!(s.columns.len(), 3);
        assert_eq!(s.rows[0]["Кредит"], CellValue::Number(100.0));
        assert_eq!(s.rows[0]["Дебет"], CellValue::Empty);
    }

    #[test]
    fn test_empty_statement_is_an_error() {
        let err = read_statement_str("\n  \n").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<IngestError>(),
            Some(IngestError::EmptyStatement)
        ));
    }

    #[test]
    fn test_header_only_has_no_rows() {
        let s = read_statement_str("Дата;Сума\n").unwrap();
        assert!(s.is_empty());
        assert_eq!(s.columns.len(), 2);
    }

    #[test]
    fn test_delimiter_detection() {
        assert_eq!(detect_delimiter("a;b;c"), b';');
        assert_eq!(detect_delimiter("a,b,c"), b',');
        assert_eq!(detect_delimiter("a\tb,c\td"), b'\t');
        assert_eq!(detect_delimiter("single"), b';');
    }

    #[test]
    fn test_cell_typing() {
        assert_eq!(parse_cell(" 12.5 "), CellValue::Number(12.5));
        assert_eq!(parse_cell("-3"), CellValue::Number(-3.0));
        assert_eq!(parse_cell("12,5"), CellValue::from("12,5"));
        assert_eq!(parse_cell("15.01.2024"), CellValue::from("15.01.2024"));
        assert_eq!(parse_cell("   "), CellValue::Empty);
    }

    #[test]
    fn test_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Дата;Сума\n01.03.2024;10\n").unwrap();
        let s = read_statement(file.path()).unwrap();
        assert_eq!(s.rows.len(), 1);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = read_statement("/definitely/not/here.csv").unwrap_err();
        assert!(format!("{err:#}").contains("not/here.csv"));
    }
}
