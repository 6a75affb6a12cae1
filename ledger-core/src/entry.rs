//! Ledger row types: income entries and the period summaries laid over them.

use crate::amount::{or_zero, round_to_cents};
use crate::date::display_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The five amount columns of the income ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AmountColumn {
    Cash,
    NonCash,
    Refund,
    Transit,
    Own,
}

impl AmountColumn {
    pub const ALL: [AmountColumn; 5] = [
        AmountColumn::Cash,
        AmountColumn::NonCash,
        AmountColumn::Refund,
        AmountColumn::Transit,
        AmountColumn::Own,
    ];
}

impl FromStr for AmountColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "cash" => Ok(AmountColumn::Cash),
            "noncash" => Ok(AmountColumn::NonCash),
            "refund" => Ok(AmountColumn::Refund),
            "transit" => Ok(AmountColumn::Transit),
            "own" => Ok(AmountColumn::Own),
            other => Err(format!(
                "unknown amount column {other:?} (cash, non-cash, refund, transit, own)"
            )),
        }
    }
}

/// One line of the ledger: a single qualifying transaction or a day's sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeEntry {
    pub id: String,
    /// Display form, `dd.mm.yyyy`
    pub date: String,
    pub raw_date: NaiveDate,
    pub cash: Option<f64>,
    pub non_cash: Option<f64>,
    pub refund: Option<f64>,
    pub transit: Option<f64>,
    pub own: Option<f64>,
    pub total: f64,
}

impl IncomeEntry {
    /// Entry carrying a single non-cash receipt; other columns unset.
    pub fn non_cash(id: impl Into<String>, raw_date: NaiveDate, amount: f64) -> Self {
        let amount = round_to_cents(amount);
        Self {
            id: id.into(),
            date: display_date(raw_date),
            raw_date,
            cash: None,
            non_cash: Some(amount),
            refund: None,
            transit: None,
            own: None,
            total: amount,
        }
    }

    /// Blank entry for manual input.
    pub fn blank(id: impl Into<String>, raw_date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            date: display_date(raw_date),
            raw_date,
            cash: None,
            non_cash: None,
            refund: None,
            transit: None,
            own: None,
            total: 0.0,
        }
    }

    pub fn amount(&self, column: AmountColumn) -> Option<f64> {
        match column {
            AmountColumn::Cash => self.cash,
            AmountColumn::NonCash => self.non_cash,
            AmountColumn::Refund => self.refund,
            AmountColumn::Transit => self.transit,
            AmountColumn::Own => self.own,
        }
    }

    fn slot(&mut self, column: AmountColumn) -> &mut Option<f64> {
        match column {
            AmountColumn::Cash => &mut self.cash,
            AmountColumn::NonCash => &mut self.non_cash,
            AmountColumn::Refund => &mut self.refund,
            AmountColumn::Transit => &mut self.transit,
            AmountColumn::Own => &mut self.own,
        }
    }

    /// Add a receipt to the non-cash column, keeping the total in step.
    /// Non-finite amounts are ignored.
    pub fn add_non_cash(&mut self, amount: f64) {
        if !amount.is_finite() {
            return;
        }
        self.non_cash = Some(round_to_cents(or_zero(self.non_cash) + amount));
        self.total = round_to_cents(self.total + amount);
    }

    /// Set (or clear) one column and recompute the total.
    pub fn set_amount(&mut self, column: AmountColumn, value: Option<f64>) {
        *self.slot(column) = value.map(round_to_cents);
        self.total = self.computed_total();
    }

    /// `cash + nonCash - refund + transit + own`, unset columns as zero.
    pub fn computed_total(&self) -> f64 {
        round_to_cents(
            or_zero(self.cash) + or_zero(self.non_cash) - or_zero(self.refund)
                + or_zero(self.transit)
                + or_zero(self.own),
        )
    }
}

/// Which period a summary row closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PeriodScope {
    Month,
    Quarter,
    TwoQuarter,
    Half,
    NineMonth,
    Year,
}

impl PeriodScope {
    /// Emission order at a shared boundary.
    pub const ORDER: [PeriodScope; 6] = [
        PeriodScope::Month,
        PeriodScope::Quarter,
        PeriodScope::TwoQuarter,
        PeriodScope::Half,
        PeriodScope::NineMonth,
        PeriodScope::Year,
    ];

    /// Suffix appended to the anchor entry id.
    pub fn id_suffix(self) -> &'static str {
        match self {
            PeriodScope::Month => "month-summary",
            PeriodScope::Quarter => "quarter-summary",
            PeriodScope::TwoQuarter => "two-quarter-summary",
            PeriodScope::Half => "half-summary",
            PeriodScope::NineMonth => "nine-summary",
            PeriodScope::Year => "year-summary",
        }
    }
}

/// Running subtotal closing a period. Built once, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRow {
    pub id: String,
    /// Period label shown in the date column
    pub date: String,
    pub raw_date: NaiveDate,
    pub scope: PeriodScope,
    pub non_cash: f64,
    pub total: f64,
}

impl SummaryRow {
    pub fn new(anchor: &IncomeEntry, scope: PeriodScope, label: String, amount: f64) -> Self {
        Self {
            id: format!("{}-{}", anchor.id, scope.id_suffix()),
            date: label,
            raw_date: anchor.raw_date,
            scope,
            non_cash: amount,
            total: amount,
        }
    }
}

/// A displayable ledger line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rowType", rename_all = "camelCase")]
pub enum LedgerRow {
    Entry(IncomeEntry),
    Summary(SummaryRow),
}

impl LedgerRow {
    pub fn id(&self) -> &str {
        match self {
            LedgerRow::Entry(e) => &e.id,
            LedgerRow::Summary(s) => &s.id,
        }
    }

    pub fn date_label(&self) -> &str {
        match self {
            LedgerRow::Entry(e) => &e.date,
            LedgerRow::Summary(s) => &s.date,
        }
    }

    pub fn raw_date(&self) -> NaiveDate {
        match self {
            LedgerRow::Entry(e) => e.raw_date,
            LedgerRow::Summary(s) => s.raw_date,
        }
    }

    pub fn is_summary(&self) -> bool {
        matches!(self, LedgerRow::Summary(_))
    }

    /// Column value as rendered in exports; summaries only fill non-cash.
    pub fn amount(&self, column: AmountColumn) -> Option<f64> {
        match self {
            LedgerRow::Entry(e) => e.amount(column),
            LedgerRow::Summary(s) => (column == AmountColumn::NonCash).then_some(s.non_cash),
        }
    }

    pub fn total(&self) -> f64 {
        match self {
            LedgerRow::Entry(e) => e.total,
            LedgerRow::Summary(s) => s.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_non_cash_entry() {
        let e = IncomeEntry::non_cash("2024-01-15", day(15), 100.506);
        assert_eq!(e.date, "15.01.2024");
        assert_eq!(e.non_cash, Some(100.51));
        assert_eq!(e.total, 100.51);
        assert_eq!(e.cash, None);
    }

    #[test]
    fn test_total_subtracts_refund() {
        let mut e = IncomeEntry::blank("x", day(2));
        e.set_amount(AmountColumn::Cash, Some(200.0));
        e.set_amount(AmountColumn::NonCash, Some(50.256));
        e.set_amount(AmountColumn::Refund, Some(20.0));
        e.set_amount(AmountColumn::Own, Some(1.1));
        assert_eq!(e.non_cash, Some(50.26));
        assert_eq!(e.total, 231.36);
        assert_eq!(e.total, e.computed_total());

        e.set_amount(AmountColumn::Refund, None);
        assert_eq!(e.total, 251.36);
    }

    #[test]
    fn test_add_non_cash_rounds_each_step() {
        let mut e = IncomeEntry::non_cash("k", day(3), 0.1);
        e.add_non_cash(0.2);
        assert_eq!(e.non_cash, Some(0.3));
        assert_eq!(e.total, 0.3);
    }

    #[test]
    fn test_amount_column_names() {
        assert_eq!("non-cash".parse::<AmountColumn>(), Ok(AmountColumn::NonCash));
        assert_eq!("NonCash".parse::<AmountColumn>(), Ok(AmountColumn::NonCash));
        assert_eq!(" refund ".parse::<AmountColumn>(), Ok(AmountColumn::Refund));
        assert!("tips".parse::<AmountColumn>().is_err());
    }

    #[test]
    fn test_add_non_cash_ignores_non_finite() {
        let mut e = IncomeEntry::non_cash("k", day(4), 500.0);
        e.add_non_cash(f64::INFINITY);
        e.add_non_cash(f64::NAN);
        assert_eq!(e.non_cash, Some(500.0));
        assert_eq!(e.total, 500.0);
    }

    #[test]
    fn test_summary_id_and_row_type_tag() {
        let anchor = IncomeEntry::non_cash("2024-01-31", day(31), 30.0);
        let s = SummaryRow::new(&anchor, PeriodScope::Month, "Січень 2024".into(), 30.0);
        assert_eq!(s.id, "2024-01-31-month-summary");

        let json = serde_json::to_value(LedgerRow::Summary(s)).unwrap();
        assert_eq!(json["rowType"], "summary");
        assert_eq!(json["nonCash"], 30.0);
    }
}
