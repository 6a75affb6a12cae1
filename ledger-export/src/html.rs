//! Printable HTML rendering of the ledger (open in a browser, print to PDF).

use anyhow::{Context, Result};
use ledger_core::LedgerRow;
use std::fs;
use std::path::Path;

use crate::format::{row_cells, ExportOptions};

const STYLE: &str = r#"
      body { font-family: "Segoe UI", Arial, sans-serif; margin: 24px; color: #0f172a; }
      h1 { font-size: 16px; margin: 0 0 4px; text-align: center; }
      h2 { font-size: 14px; margin: 0 0 16px; text-align: center; font-weight: 600; }
      table { width: 100%; border-collapse: collapse; font-size: 12px; }
      th, td { border: 1px solid #cbd5f5; padding: 6px 8px; text-align: right; }
      th:first-child, td:first-child { text-align: left; }
      th { background: #eef2ff; font-weight: 600; }
      .summary-row td { font-weight: 700; background: #f1f4ff; }
      @page { size: A4 landscape; margin: 18mm; }
"#;

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn render_print_html(rows: &[LedgerRow], opts: &ExportOptions) -> String {
    let lang = opts.locale.to_string();
    let title = escape_html(opts.title());
    let subtitle = escape_html(&opts.locale.year_label(opts.year));

    let head: String = opts
        .locale
        .headers()
        .iter()
        .map(|h| format!("<th>{}</th>", escape_html(h)))
        .collect();

    let body: String = rows
        .iter()
        .map(|row| {
            let class = if row.is_summary() { " class=\"summary-row\"" } else { "" };
            let cells: String = row_cells(row, opts.locale)
                .iter()
                .map(|c| format!("<td>{}</td>", escape_html(c)))
                .collect();
            format!("        <tr{class}>{cells}</tr>\n")
        })
        .collect();

    format!(
        "<!DOCTYPE html>\n<html lang=\"{lang}\">\n  <head>\n    <meta charset=\"UTF-8\" />\n    <title>{title}</title>\n    <style>{STYLE}    </style>\n  </head>\n  <body>\n    <h1>{title}</h1>\n    <h2>{subtitle}</h2>\n    <table>\n      <thead>\n        <tr>{head}</tr>\n      </thead>\n      <tbody>\n{body}      </tbody>\n    </table>\n  </body>\n</html>\n"
    )
}

pub fn export_html_file(path: impl AsRef<Path>, rows: &[LedgerRow], opts: &ExportOptions) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, render_print_html(rows, opts)).with_context(|| format!("writing {}", path.display()))
}
