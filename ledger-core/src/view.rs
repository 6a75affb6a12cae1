//! Ledger grid helpers: filtering, manual edits and the document year.

use crate::entry::{AmountColumn, IncomeEntry, LedgerRow};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Search text and inclusive date range applied to displayed rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowFilter {
    pub search: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl RowFilter {
    pub fn is_empty(&self) -> bool {
        self.search.as_deref().is_none_or(|s| s.is_empty()) && self.from.is_none() && self.to.is_none()
    }

    /// Search matches the date column text, case-insensitively, so summary
    /// labels are searchable too.
    pub fn matches(&self, row: &LedgerRow) -> bool {
        let matches_search = match self.search.as_deref().filter(|s| !s.is_empty()) {
            Some(needle) => row
                .date_label()
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            None => true,
        };

        let date = row.raw_date();
        let after_from = self.from.is_none_or(|from| date >= from);
        let before_to = self.to.is_none_or(|to| date <= to);

        matches_search && after_from && before_to
    }

    pub fn apply<'a>(&self, rows: &'a [LedgerRow]) -> Vec<&'a LedgerRow> {
        rows.iter().filter(|r| self.matches(r)).collect()
    }
}

/// Why an edit was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditRejected {
    /// Summary rows are derived and read-only.
    #[error("{0} is a summary row and cannot be edited")]
    SummaryRow(String),
    #[error("no ledger row with id {0}")]
    UnknownRow(String),
}

/// A manual change kept on top of the aggregated ledger and replayed, in
/// order, every time the ledger is rebuilt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EntryEdit {
    SetAmount {
        id: String,
        column: AmountColumn,
        value: Option<f64>,
    },
    AddRow {
        date: NaiveDate,
    },
}

impl EntryEdit {
    pub fn apply(&self, entries: &mut Vec<IncomeEntry>) -> Result<(), EditRejected> {
        match self {
            EntryEdit::SetAmount { id, column, value } => edit_entry(entries, id, *column, *value),
            EntryEdit::AddRow { date } => {
                add_blank_entry(entries, *date);
                Ok(())
            }
        }
    }
}

/// Set one amount column on the entry with `id`.
///
/// Summary ids are refused; the caller rebuilds summaries afterwards.
pub fn edit_entry(
    entries: &mut [IncomeEntry],
    id: &str,
    column: AmountColumn,
    value: Option<f64>,
) -> Result<(), EditRejected> {
    if id.ends_with("-summary") {
        return Err(EditRejected::SummaryRow(id.to_string()));
    }
    let entry = entries
        .iter_mut()
        .find(|e| e.id == id)
        .ok_or_else(|| EditRejected::UnknownRow(id.to_string()))?;
    entry.set_amount(column, value);
    Ok(())
}

/// Append a blank entry dated `date` and keep the sequence sorted.
pub fn add_blank_entry(entries: &mut Vec<IncomeEntry>, date: NaiveDate) -> String {
    let id = format!("manual-{}", entries.len() + 1);
    entries.push(IncomeEntry::blank(id.clone(), date));
    entries.sort_by_key(|e| e.raw_date);
    id
}

/// Year printed on the document: the first entry's year, else `fallback`.
pub fn document_year(entries: &[IncomeEntry], fallback: i32) -> i32 {
    entries.first().map(|e| e.raw_date.year()).unwrap_or(fallback)
}
