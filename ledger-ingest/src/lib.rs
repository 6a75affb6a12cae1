//! ledger-ingest: reads bank-statement exports into raw header-keyed rows.
//!
//! Spreadsheet workbooks (`.xlsx`, `.xls`, `.ods`, ...) go through calamine;
//! everything else is treated as delimited text.

pub mod error;
pub mod reader;
pub mod workbook;

pub use error::IngestError;
pub use reader::{detect_delimiter, read_statement, read_statement_str, parse_cell};
pub use workbook::{cell_from_data, is_workbook, read_workbook};
