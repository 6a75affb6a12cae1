//! The persisted working document: raw statement, mapping, view switches and
//! manual edits.

use crate::aggregate::{build_income_book, AggregateOptions};
use crate::cell::{RawRow, Statement};
use crate::entry::{IncomeEntry, LedgerRow};
use crate::labels::Locale;
use crate::mapping::ColumnMapping;
use crate::summary::build_display_rows;
use crate::view::{EditRejected, EntryEdit};
use log::warn;
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// Everything needed to rebuild the ledger exactly as it was last shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerDocument {
    #[serde(default)]
    pub raw_rows: Vec<RawRow>,
    #[serde(default)]
    pub raw_columns: Vec<String>,
    #[serde(default)]
    pub mapping: ColumnMapping,
    #[serde(default = "default_true")]
    pub group_by_day: bool,
    #[serde(default = "default_true")]
    pub show_summaries: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edits: Vec<EntryEdit>,
}

impl LedgerDocument {
    pub fn new(statement: Statement, mapping: ColumnMapping) -> Self {
        Self {
            raw_rows: statement.rows,
            raw_columns: statement.columns,
            mapping,
            group_by_day: true,
            show_summaries: true,
            edits: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.raw_rows.is_empty()
    }

    /// Aggregated entries with the recorded edits replayed on top. An edit
    /// that no longer applies (say, after switching grouping) is skipped.
    pub fn entries(&self) -> Vec<IncomeEntry> {
        let mut entries = if self.is_empty() {
            Vec::new()
        } else {
            build_income_book(
                &self.raw_rows,
                &self.raw_columns,
                &self.mapping,
                AggregateOptions {
                    group_by_day: self.group_by_day,
                },
            )
        };
        for edit in &self.edits {
            if let Err(e) = edit.apply(&mut entries) {
                warn!("skipping stale edit: {e}");
            }
        }
        entries
    }

    /// Check `edit` against the current ledger and keep it if it applies.
    pub fn record_edit(&mut self, edit: EntryEdit) -> Result<(), EditRejected> {
        let mut entries = self.entries();
        edit.apply(&mut entries)?;
        self.edits.push(edit);
        Ok(())
    }

    pub fn display_rows(&self, locale: Locale) -> Vec<LedgerRow> {
        build_display_rows(&self.entries(), self.show_summaries, locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{row, CellValue};
    use crate::entry::AmountColumn;

    #[test]
    fn test_missing_switches_default_to_true() {
        let doc: LedgerDocument = serde_json::from_str(
            r#"{"rawRows":[],"rawColumns":["Дата"],"mapping":{"date":"Дата","amount":""}}"#,
        )
        .unwrap();
        assert!(doc.group_by_day);
        assert!(doc.show_summaries);
        assert!(doc.entries().is_empty());
    }

    #[test]
    fn test_edits_survive_round_trip() {
        let statement = Statement::new(
            vec!["Дата".into(), "Сума".into()],
            vec![row([("Дата", CellValue::from("02.01.2024")), ("Сума", CellValue::Number(5.0))])],
        );
        let mut doc = LedgerDocument::new(statement, ColumnMapping::new("Дата", "Сума"));
        doc.record_edit(EntryEdit::SetAmount {
            id: "2024-01-02".into(),
            column: AmountColumn::Refund,
            value: Some(1.5),
        })
        .unwrap();
        assert_eq!(
            doc.record_edit(EntryEdit::SetAmount {
                id: "2024-01-02-month-summary".into(),
                column: AmountColumn::Cash,
                value: Some(1.0),
            }),
            Err(EditRejected::SummaryRow("2024-01-02-month-summary".into()))
        );
        assert_eq!(doc.edits.len(), 1);

        let json = serde_json::to_string(&doc).unwrap();
        let restored: LedgerDocument = serde_json::from_str(&json).unwrap();
        let entries = restored.entries();
        assert_eq!(entries[0].refund, Some(1.5));
        assert_eq!(entries[0].total, 3.5);
    }

    #[test]
    fn test_stale_edit_is_skipped() {
        let mut doc = LedgerDocument::new(Statement::default(), ColumnMapping::new("Дата", "Сума"));
        doc.edits.push(EntryEdit::SetAmount {
            id: "gone".into(),
            column: AmountColumn::Cash,
            value: Some(1.0),
        });
        doc.edits.push(EntryEdit::AddRow {
            date: chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        });
        let entries = doc.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "manual-1");
    }

    #[test]
    fn test_display_rows_follow_switches() {
        let statement = Statement::new(
            vec!["Дата".into(), "Сума".into()],
            vec![
                row([("Дата", CellValue::from("02.01.2024")), ("Сума", CellValue::Number(5.0))]),
                row([("Дата", CellValue::from("02.01.2024")), ("Сума", CellValue::Number(6.0))]),
            ],
        );
        let mut doc = LedgerDocument::new(statement, ColumnMapping::new("Дата", "Сума"));
        assert_eq!(doc.entries().len(), 1);

        doc.group_by_day = false;
        doc.show_summaries = false;
        assert_eq!(doc.display_rows(Locale::Uk).len(), 2);
    }
}
