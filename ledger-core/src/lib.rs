//! ledger-core: income ledger engine.
//!
//! Turns raw bank-statement rows into a date-sorted income ledger and lays
//! month, quarter, half-year, nine-month and year subtotals over it.

pub mod aggregate;
pub mod amount;
pub mod cell;
pub mod classify;
pub mod date;
pub mod document;
pub mod entry;
pub mod labels;
pub mod mapping;
pub mod summary;
pub mod view;

pub use aggregate::{
    build_from_statement, build_income_book, build_income_book_with_report, AggregateOptions,
    AggregateReport, INCOME_KEYWORDS,
};
pub use amount::{normalize_amount, round_to_cents};
pub use cell::{CellValue, RawRow, Statement};
pub use classify::{is_credit_row, RowClassifier, Verdict};
pub use date::{normalize_date, normalize_day};
pub use document::LedgerDocument;
pub use entry::{AmountColumn, IncomeEntry, LedgerRow, PeriodScope, SummaryRow};
pub use labels::Locale;
pub use mapping::{ColumnMapping, ColumnRole};
pub use summary::{build_display_rows, build_summaries, Boundaries, PeriodState};
pub use view::{add_blank_entry, document_year, edit_entry, EditRejected, EntryEdit, RowFilter};
