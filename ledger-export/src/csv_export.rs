//! Spreadsheet-friendly CSV export of the ledger.
//!
//! Layout: the seven ledger headers plus a trailing row-type column so
//! summary lines stay distinguishable after import.

use anyhow::{Context, Result};
use ledger_core::LedgerRow;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::format::{row_cells, ExportOptions};

const ROW_TYPE_HEADER: &str = "rowType";

pub fn write_ledger_csv<W: Write>(writer: W, rows: &[LedgerRow], opts: &ExportOptions) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(opts.delimiter)
        .from_writer(writer);

    let mut header: Vec<&str> = opts.locale.headers().to_vec();
    header.push(ROW_TYPE_HEADER);
    wtr.write_record(&header)?;

    for row in rows {
        let cells = row_cells(row, opts.locale);
        let kind = if row.is_summary() { "summary" } else { "entry" };
        wtr.write_record(cells.iter().map(String::as_str).chain([kind]))?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn export_csv_file(path: impl AsRef<Path>, rows: &[LedgerRow], opts: &ExportOptions) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_ledger_csv(file, rows, opts).with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ledger_core::{build_summaries, IncomeEntry, Locale};

    fn rows() -> Vec<LedgerRow> {
        let d = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        build_summaries(&[IncomeEntry::non_cash("2024-01-15", d, 1250.5)], Locale::Uk)
    }

    #[test]
    fn test_csv_layout() {
        let mut buf = Vec::new();
        write_ledger_csv(&mut buf, &rows(), &ExportOptions::new(Locale::Uk, 2024)).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "Дата операції;Готівка;Надходження безготівка;Повернення;Транзитні кошти;Власні кошти;Разом дохід;rowType"
        );
        assert_eq!(lines[1], "15.01.2024;;1\u{a0}250,50;;;;1\u{a0}250,50;entry");
        assert_eq!(lines[2], "Підсумок за Січень 2024;;1\u{a0}250,50;;;;1\u{a0}250,50;summary");
        // month, quarter, two-quarter (Q1 is not), half, year
        assert_eq!(lines.len(), 1 + 1 + 4);
    }

    #[test]
    fn test_comma_delimited_quotes_decimal_commas() {
        let mut opts = ExportOptions::new(Locale::Uk, 2024);
        opts.delimiter = b',';
        let mut buf = Vec::new();
        write_ledger_csv(&mut buf, &rows()[..1], &opts).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("\"1\u{a0}250,50\""));
    }
}
