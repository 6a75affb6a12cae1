//! Credit/debit row classification.
//!
//! Bank exports disagree on how they mark incoming money: some carry a
//! dedicated `Кредит` column, some a single operation-type column, some
//! neither. Column roles are resolved once from the header and each row is
//! then checked against an ordered rule list.

use crate::cell::{CellValue, RawRow};
use regex::Regex;
use std::sync::OnceLock;

/// Dedicated credit amount column.
const CREDIT_COLUMNS: &[&str] = &["кредит", "credit"];
/// Dedicated debit amount column.
const DEBIT_COLUMNS: &[&str] = &["дебет", "debit"];

const CREDIT_MARKERS: &[&str] = &["кредит", "credit", "надходж", "зарахув", "income"];
const DEBIT_MARKERS: &[&str] = &["дебет", "debit", "списан", "витрат", "expense"];

fn indicator_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)тип\s*операц|вид\s*операц|operation\s*type|transaction\s*type|дебет|кредит|debit|credit|d/c|д/к")
            .expect("static indicator pattern")
    })
}

/// Outcome of classifying one row, with the rule that decided it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Dedicated credit column holds a value.
    CreditColumn,
    /// Operation-type column text names a credit.
    IndicatorCredit,
    /// Operation-type column text names a debit.
    IndicatorDebit,
    /// Credit column empty, debit column filled.
    DebitColumn,
    /// Nothing recognizable; treated as income.
    Default,
}

impl Verdict {
    pub fn is_credit(self) -> bool {
        !matches!(self, Verdict::IndicatorDebit | Verdict::DebitColumn)
    }
}

/// Header roles the classifier cares about, resolved once per statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowClassifier {
    credit_column: Option<String>,
    debit_column: Option<String>,
    indicator_column: Option<String>,
}

fn is_named(column: &str, names: &[&str]) -> bool {
    let lower = column.trim().to_lowercase();
    names.iter().any(|n| lower == *n)
}

fn contains_any(text: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| text.contains(m))
}

impl RowClassifier {
    /// Resolve roles from header names in file order.
    pub fn for_columns<S: AsRef<str>>(columns: &[S]) -> Self {
        let mut classifier = RowClassifier::default();
        for column in columns.iter().map(AsRef::as_ref) {
            if is_named(column, CREDIT_COLUMNS) {
                classifier.credit_column.get_or_insert_with(|| column.to_string());
            } else if is_named(column, DEBIT_COLUMNS) {
                classifier.debit_column.get_or_insert_with(|| column.to_string());
            } else if indicator_pattern().is_match(column) {
                classifier
                    .indicator_column
                    .get_or_insert_with(|| column.to_string());
            }
        }
        classifier
    }

    /// Resolve roles from a single row's own keys.
    pub fn for_row(row: &RawRow) -> Self {
        let keys: Vec<&str> = row.keys().map(String::as_str).collect();
        Self::for_columns(keys.as_slice())
    }

    pub fn credit_column(&self) -> Option<&str> {
        self.credit_column.as_deref()
    }

    pub fn indicator_column(&self) -> Option<&str> {
        self.indicator_column.as_deref()
    }

    fn cell<'a>(row: &'a RawRow, column: &Option<String>) -> Option<&'a CellValue> {
        column.as_ref().and_then(|c| row.get(c))
    }

    pub fn verdict(&self, row: &RawRow) -> Verdict {
        let credit = Self::cell(row, &self.credit_column);
        if credit.is_some_and(|c| !c.is_blank()) {
            return Verdict::CreditColumn;
        }

        if let Some(indicator) = Self::cell(row, &self.indicator_column) {
            let text = indicator.as_text().to_lowercase();
            if contains_any(&text, CREDIT_MARKERS) {
                return Verdict::IndicatorCredit;
            }
            if contains_any(&text, DEBIT_MARKERS) {
                return Verdict::IndicatorDebit;
            }
        }

        let debit = Self::cell(row, &self.debit_column);
        if credit.is_some() && debit.is_some_and(|d| !d.is_blank()) {
            return Verdict::DebitColumn;
        }

        Verdict::Default
    }

    pub fn is_credit(&self, row: &RawRow) -> bool {
        self.verdict(row).is_credit()
    }
}

/// One-off check for a row without a known header.
pub fn is_credit_row(row: &RawRow) -> bool {
    RowClassifier::for_row(row).is_credit(row)
}
