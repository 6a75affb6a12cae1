//! Excel workbook export.
//!
//! Layout of the single sheet:
//!
//!   row 1  title (merged across the seven columns)
//!   row 2  year label
//!   row 4  headers, bold
//!   row 5+ ledger rows; summaries bold on a light blue fill
//!
//! Amounts are stored as numbers with a two-decimal format so the sheet stays
//! summable; unset category amounts are left empty.

use anyhow::{Context, Result};
use ledger_core::{AmountColumn, LedgerRow, Locale};
use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook, Worksheet};
use std::path::Path;

use crate::format::{row_cells, ExportOptions};

const HEADER_ROW: u32 = 3;
const FIRST_DATA_ROW: u32 = 4;
const SUMMARY_FILL: u32 = 0xF1F4FF;
const NUMBER_FORMAT: &str = "#,##0.00";
const MIN_WIDTH: usize = 10;

struct LedgerFormats {
    title: Format,
    subtitle: Format,
    header: Format,
    text: Format,
    number: Format,
    summary_text: Format,
    summary_number: Format,
}

impl LedgerFormats {
    fn new() -> Self {
        let summary = Format::new()
            .set_bold()
            .set_background_color(Color::RGB(SUMMARY_FILL));
        Self {
            title: Format::new().set_bold().set_align(FormatAlign::Center),
            subtitle: Format::new().set_align(FormatAlign::Center),
            header: Format::new().set_bold(),
            text: Format::new(),
            number: Format::new().set_num_format(NUMBER_FORMAT),
            summary_text: summary.clone(),
            summary_number: summary.set_num_format(NUMBER_FORMAT),
        }
    }
}

fn sheet_name(locale: Locale) -> &'static str {
    match locale {
        Locale::Uk => "Книга",
        Locale::En => "Ledger",
    }
}

/// Column widths in characters: the longest rendered cell plus two, never
/// under ten.
pub fn column_widths(rows: &[LedgerRow], locale: Locale) -> [usize; 7] {
    let mut widths = locale.headers().map(|h| h.chars().count() + 2);
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row_cells(row, locale)) {
            *w = (*w).max(cell.chars().count() + 2);
        }
    }
    widths.map(|w| w.max(MIN_WIDTH))
}

fn write_sheet(sheet: &mut Worksheet, rows: &[LedgerRow], opts: &ExportOptions) -> Result<()> {
    let formats = LedgerFormats::new();
    let headers = opts.locale.headers();
    let last_col = (headers.len() - 1) as u16;

    sheet.set_name(sheet_name(opts.locale))?;
    sheet.merge_range(0, 0, 0, last_col, opts.title(), &formats.title)?;
    sheet.merge_range(1, 0, 1, last_col, &opts.locale.year_label(opts.year), &formats.subtitle)?;

    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(HEADER_ROW, col as u16, *header, &formats.header)?;
    }

    for (idx, row) in rows.iter().enumerate() {
        let r = FIRST_DATA_ROW + idx as u32;
        let (text_fmt, number_fmt) = if row.is_summary() {
            (&formats.summary_text, &formats.summary_number)
        } else {
            (&formats.text, &formats.number)
        };

        sheet.write_string_with_format(r, 0, row.date_label(), text_fmt)?;
        for (offset, column) in AmountColumn::ALL.into_iter().enumerate() {
            let col = 1 + offset as u16;
            match row.amount(column) {
                Some(value) => {
                    sheet.write_number_with_format(r, col, value, number_fmt)?;
                }
                None if row.is_summary() => {
                    sheet.write_blank(r, col, number_fmt)?;
                }
                None => {}
            }
        }
        sheet.write_number_with_format(r, last_col, row.total(), number_fmt)?;
    }

    for (col, width) in column_widths(rows, opts.locale).into_iter().enumerate() {
        sheet.set_column_width(col as u16, width as f64)?;
    }
    Ok(())
}

/// Build the ledger workbook in memory.
pub fn ledger_workbook(rows: &[LedgerRow], opts: &ExportOptions) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    write_sheet(workbook.add_worksheet(), rows, opts)?;
    Ok(workbook)
}

pub fn export_xlsx_file(path: impl AsRef<Path>, rows: &[LedgerRow], opts: &ExportOptions) -> Result<()> {
    let path = path.as_ref();
    let mut workbook = ledger_workbook(rows, opts)?;
    workbook
        .save(path)
        .with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{open_workbook_auto, Data, Reader};
    use chrono::NaiveDate;
    use ledger_core::{build_summaries, IncomeEntry};

    fn rows() -> Vec<LedgerRow> {
        let d = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        build_summaries(&[IncomeEntry::non_cash("2024-01-15", d, 1250.5)], Locale::Uk)
    }

    #[test]
    fn test_workbook_layout_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.xlsx");
        export_xlsx_file(&path, &rows(), &ExportOptions::new(Locale::Uk, 2024)).unwrap();

        let mut book = open_workbook_auto(&path).unwrap();
        assert_eq!(book.sheet_names(), vec!["Книга".to_string()]);
        let range = book.worksheet_range("Книга").unwrap();
        let cell = |r: u32, c: u32| range.get_value((r, c)).cloned().unwrap_or(Data::Empty);

        assert_eq!(cell(0, 0), Data::String(Locale::Uk.title().to_string()));
        assert_eq!(cell(1, 0), Data::String("на 2024 рік".into()));
        assert_eq!(cell(3, 0), Data::String("Дата операції".into()));
        assert_eq!(cell(3, 6), Data::String("Разом дохід".into()));

        assert_eq!(cell(4, 0), Data::String("15.01.2024".into()));
        assert_eq!(cell(4, 1), Data::Empty);
        assert_eq!(cell(4, 2), Data::Float(1250.5));
        assert_eq!(cell(4, 6), Data::Float(1250.5));

        assert_eq!(cell(5, 0), Data::String("Підсумок за Січень 2024".into()));
        assert_eq!(cell(5, 2), Data::Float(1250.5));
        assert_eq!(cell(8, 0), Data::String("Підсумок за 2024 рік".into()));
    }

    #[test]
    fn test_column_widths() {
        let widths = column_widths(&rows(), Locale::Uk);
        // "Підсумок за Січень 2024" is the longest date cell
        assert_eq!(widths[0], "Підсумок за Січень 2024".chars().count() + 2);
        // short headers are padded up to the minimum
        assert_eq!(widths[1], MIN_WIDTH);
        assert_eq!(widths[2], "Надходження безготівка".chars().count() + 2);
        assert!(column_widths(&[], Locale::En).iter().all(|w| *w >= MIN_WIDTH));
    }

    #[test]
    fn test_english_sheet_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.xlsx");
        export_xlsx_file(&path, &[], &ExportOptions::new(Locale::En, 2025)).unwrap();
        let book = open_workbook_auto(&path).unwrap();
        assert_eq!(book.sheet_names(), vec!["Ledger".to_string()]);
    }
}
