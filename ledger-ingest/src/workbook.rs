//! Spreadsheet statements (`.xlsx`, `.xls`, `.ods`) via calamine.
//!
//! Only the first sheet is read. Leading blank rows are skipped and the first
//! row with content is the header, same as for text exports.

use anyhow::Result;
use calamine::{open_workbook_auto, Data, Reader};
use ledger_core::{CellValue, Statement};
use std::path::Path;

use crate::error::IngestError;
use crate::reader::assemble;

const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

pub fn is_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| WORKBOOK_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Spreadsheet cell to statement cell. Date-formatted cells keep their
/// timestamp; plain numbers stay numbers so serial dates reach the date
/// normalizer untouched.
pub fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(CellValue::Date)
            .unwrap_or(CellValue::Number(dt.as_f64())),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                CellValue::Empty
            } else {
                CellValue::Text(trimmed.to_string())
            }
        }
    }
}

pub fn read_workbook(path: impl AsRef<Path>) -> Result<Statement> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| IngestError::Workbook(format!("{}: {e}", path.display())))?;

    let Some(sheet) = workbook.sheet_names().first().cloned() else {
        return Err(IngestError::NoSheet.into());
    };
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| IngestError::Workbook(format!("{}: sheet {sheet:?}: {e}", path.display())))?;

    let mut rows = range
        .rows()
        .skip_while(|row| row.iter().all(|d| cell_from_data(d).is_blank()));
    let Some(header) = rows.next() else {
        return Err(IngestError::EmptyWorkbook(sheet).into());
    };

    let header: Vec<String> = header.iter().map(|d| d.to_string()).collect();
    let body = rows.map(|row| row.iter().map(cell_from_data).collect::<Vec<_>>());

    Ok(assemble(header, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read_statement;
    use chrono::NaiveDate;
    use ledger_core::normalize_day;
    use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

    #[test]
    fn test_cell_mapping() {
        assert_eq!(cell_from_data(&Data::Float(45306.5)), CellValue::Number(45306.5));
        assert_eq!(cell_from_data(&Data::Int(7)), CellValue::Number(7.0));
        assert_eq!(cell_from_data(&Data::String(" 1 000,50 ".into())), CellValue::from("1 000,50"));
        assert_eq!(cell_from_data(&Data::String("  ".into())), CellValue::Empty);
        assert_eq!(cell_from_data(&Data::Empty), CellValue::Empty);
        assert_eq!(cell_from_data(&Data::Bool(true)), CellValue::from("true"));
    }

    #[test]
    fn test_extension_detection() {
        assert!(is_workbook(Path::new("statement.xlsx")));
        assert!(is_workbook(Path::new("STATEMENT.XLS")));
        assert!(!is_workbook(Path::new("statement.csv")));
        assert!(!is_workbook(Path::new("statement")));
    }

    #[test]
    fn test_reads_first_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("statement.xlsx");

        let mut book = Workbook::new();
        let sheet = book.add_worksheet();
        // row 0 left blank on purpose
        sheet.write_string(1, 0, "Дата операції").unwrap();
        sheet.write_string(1, 1, "Сума").unwrap();
        sheet.write_string(1, 2, "Призначення платежу").unwrap();
        sheet.write_string(2, 0, "15.01.2024").unwrap();
        sheet.write_string(2, 1, "1 000,50").unwrap();
        sheet.write_string(2, 2, "Оплата").unwrap();
        sheet.write_number(3, 0, 45306.0).unwrap();
        sheet.write_number(3, 1, 250.0).unwrap();
        let date_format = Format::new().set_num_format("dd.mm.yyyy");
        let feb3 = ExcelDateTime::from_ymd(2024, 2, 3).unwrap();
        sheet.write_datetime_with_format(4, 0, &feb3, &date_format).unwrap();
        sheet.write_number(4, 1, 99.99).unwrap();
        book.save(&path).unwrap();

        let s = read_statement(&path).unwrap();
        assert_eq!(s.columns, vec!["Дата операції", "Сума", "Призначення платежу"]);
        assert_eq!(s.rows.len(), 3);
        assert_eq!(s.rows[0]["Сума"], CellValue::from("1 000,50"));
        assert_eq!(s.rows[1]["Дата операції"], CellValue::Number(45306.0));
        assert_eq!(s.rows[1]["Призначення платежу"], CellValue::Empty);

        let days: Vec<Option<NaiveDate>> =
            s.rows.iter().map(|r| normalize_day(&r["Дата операції"])).collect();
        assert_eq!(
            days,
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 15),
                NaiveDate::from_ymd_opt(2024, 1, 15),
                NaiveDate::from_ymd_opt(2024, 2, 3),
            ]
        );
    }

    #[test]
    fn test_empty_sheet_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.xlsx");
        let mut book = Workbook::new();
        book.add_worksheet();
        book.save(&path).unwrap();

        let err = read_workbook(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<IngestError>(),
            Some(IngestError::EmptyWorkbook(_))
        ));
    }

    #[test]
    fn test_unreadable_workbook_is_an_error() {
        let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        std::io::Write::write_all(&mut file, b"not a zip archive").unwrap();

        let err = read_statement(file.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<IngestError>(),
            Some(IngestError::Workbook(_))
        ));
    }
}
