//! Builds income entries from raw statement rows.

use crate::amount::normalize_amount;
use crate::cell::{CellValue, RawRow, Statement};
use crate::classify::RowClassifier;
use crate::date::{day_key, normalize_day};
use crate::entry::IncomeEntry;
use crate::mapping::ColumnMapping;
use log::{debug, info};
use std::collections::HashMap;

/// Description words that mark a row as income even without a positive amount.
pub const INCOME_KEYWORDS: &[&str] = &["надходження", "зарахування"];

/// Aggregation switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateOptions {
    /// Sum each day's receipts into one entry
    pub group_by_day: bool,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self { group_by_day: true }
    }
}

/// How many rows went where. Nothing here is an error; rows are just skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateReport {
    pub rows_seen: usize,
    pub debit_rows: usize,
    pub not_income: usize,
    pub undated: usize,
    pub entries: usize,
}

/// Mapped cells of one row, looked up once.
struct MappedRow<'a> {
    date: Option<&'a CellValue>,
    amount: Option<&'a CellValue>,
    description: Option<&'a CellValue>,
}

impl<'a> MappedRow<'a> {
    fn resolve(row: &'a RawRow, mapping: &ColumnMapping) -> Self {
        Self {
            date: row.get(&mapping.date),
            amount: row.get(&mapping.amount),
            description: mapping.description.as_ref().and_then(|c| row.get(c)),
        }
    }

    fn has_income_keyword(&self) -> bool {
        let text = self
            .description
            .map(|d| d.as_text().to_lowercase())
            .unwrap_or_default();
        INCOME_KEYWORDS.iter().any(|k| text.contains(k))
    }
}

pub fn build_income_book(
    rows: &[RawRow],
    columns: &[String],
    mapping: &ColumnMapping,
    options: AggregateOptions,
) -> Vec<IncomeEntry> {
    build_income_book_with_report(rows, columns, mapping, options).0
}

/// Convenience over a whole statement.
pub fn build_from_statement(
    statement: &Statement,
    mapping: &ColumnMapping,
    options: AggregateOptions,
) -> (Vec<IncomeEntry>, AggregateReport) {
    build_income_book_with_report(&statement.rows, &statement.columns, mapping, options)
}

/// Classify, normalize and aggregate.
///
/// `columns` is the statement header in file order and drives classifier
/// column resolution; when empty, each row's own keys are used instead.
/// Output is sorted ascending by date.
pub fn build_income_book_with_report(
    rows: &[RawRow],
    columns: &[String],
    mapping: &ColumnMapping,
    options: AggregateOptions,
) -> (Vec<IncomeEntry>, AggregateReport) {
    let mut report = AggregateReport::default();
    if !mapping.is_complete() {
        debug!("column mapping incomplete, nothing to aggregate");
        return (Vec::new(), report);
    }

    let shared = (!columns.is_empty()).then(|| RowClassifier::for_columns(columns));

    let mut entries: Vec<IncomeEntry> = Vec::new();
    let mut by_day: HashMap<String, usize> = HashMap::new();

    for row in rows {
        report.rows_seen += 1;

        let is_credit = match &shared {
            Some(c) => c.is_credit(row),
            None => RowClassifier::for_row(row).is_credit(row),
        };
        if !is_credit {
            report.debit_rows += 1;
            continue;
        }

        let mapped = MappedRow::resolve(row, mapping);
        let amount = mapped.amount.map(normalize_amount).unwrap_or(0.0);
        let date = mapped.date.and_then(normalize_day);

        if !(amount > 0.0 || mapped.has_income_keyword()) {
            report.not_income += 1;
            continue;
        }
        let Some(date) = date else {
            report.undated += 1;
            continue;
        };

        let key = day_key(date);
        if options.group_by_day {
            match by_day.get(&key) {
                Some(&idx) => entries[idx].add_non_cash(amount),
                None => {
                    by_day.insert(key.clone(), entries.len());
                    entries.push(IncomeEntry::non_cash(key, date, amount));
                }
            }
        } else {
            let id = format!("{}-{}", key, entries.len() + 1);
            entries.push(IncomeEntry::non_cash(id, date, amount));
        }
    }

    entries.sort_by_key(|e| e.raw_date);
    report.entries = entries.len();

    if report.undated > 0 {
        debug!("dropped {} income rows without a readable date", report.undated);
    }
    info!(
        "aggregated {} rows into {} entries (debit: {}, not income: {}, undated: {})",
        report.rows_seen, report.entries, report.debit_rows, report.not_income, report.undated
    );

    (entries, report)
}
