//! ledger-export: renders the finished ledger as an Excel workbook, CSV or a
//! printable HTML page.

pub mod csv_export;
pub mod format;
pub mod html;
pub mod xlsx;

pub use csv_export::{export_csv_file, write_ledger_csv};
pub use format::{format_amount, ExportOptions};
pub use html::{export_html_file, render_print_html};
pub use xlsx::{export_xlsx_file, ledger_workbook};
