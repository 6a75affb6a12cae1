//! Period subtotals over a date-sorted entry sequence.
//!
//! The running totals live in [`PeriodState`]; [`PeriodState::advance`] folds
//! one entry in, looks at the next one, and hands back the summary rows that
//! close at this point.

use crate::amount::round_to_cents;
use crate::entry::{IncomeEntry, LedgerRow, PeriodScope, SummaryRow};
use crate::labels::{quarter, Locale};
use chrono::{Datelike, NaiveDate};
use log::debug;

/// Which periods end between `current` and `next`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Boundaries {
    pub month: bool,
    pub quarter: bool,
    pub two_quarter: bool,
    pub half: bool,
    pub nine_month: bool,
    pub year: bool,
}

impl Boundaries {
    /// A missing `next` closes every period that can close at `current`.
    pub fn between(current: NaiveDate, next: Option<NaiveDate>) -> Self {
        let differs = |key: fn(NaiveDate) -> (i32, u32)| next.is_none_or(|n| key(current) != key(n));

        let month = differs(|d| (d.year(), d.month0()));
        let quarter_end = differs(|d| (d.year(), quarter(d)));
        let half = differs(|d| (d.year(), d.month0() / 6));
        let year = next.is_none_or(|n| n.year() != current.year());

        Self {
            month,
            quarter: quarter_end,
            two_quarter: quarter_end && matches!(quarter(current), 2 | 4),
            half,
            nine_month: month && current.month0() == 8,
            year,
        }
    }

    pub fn closes(&self, scope: PeriodScope) -> bool {
        match scope {
            PeriodScope::Month => self.month,
            PeriodScope::Quarter => self.quarter,
            PeriodScope::TwoQuarter => self.two_quarter,
            PeriodScope::Half => self.half,
            PeriodScope::NineMonth => self.nine_month,
            PeriodScope::Year => self.year,
        }
    }
}

/// Running totals, one per period scope.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PeriodState {
    pub month: f64,
    pub quarter: f64,
    pub two_quarter: f64,
    pub half: f64,
    pub nine_month: f64,
    pub year: f64,
}

impl PeriodState {
    pub fn get(&self, scope: PeriodScope) -> f64 {
        match scope {
            PeriodScope::Month => self.month,
            PeriodScope::Quarter => self.quarter,
            PeriodScope::TwoQuarter => self.two_quarter,
            PeriodScope::Half => self.half,
            PeriodScope::NineMonth => self.nine_month,
            PeriodScope::Year => self.year,
        }
    }

    fn slot(&mut self, scope: PeriodScope) -> &mut f64 {
        match scope {
            PeriodScope::Month => &mut self.month,
            PeriodScope::Quarter => &mut self.quarter,
            PeriodScope::TwoQuarter => &mut self.two_quarter,
            PeriodScope::Half => &mut self.half,
            PeriodScope::NineMonth => &mut self.nine_month,
            PeriodScope::Year => &mut self.year,
        }
    }

    /// Fold `entry` in and emit whatever closes before `next`.
    ///
    /// Every addition is rounded to cents. A year end also zeroes the
    /// nine-month and two-quarter totals even when they did not close.
    pub fn advance(
        mut self,
        entry: &IncomeEntry,
        next: Option<&IncomeEntry>,
        locale: Locale,
    ) -> (PeriodState, Vec<SummaryRow>) {
        for scope in PeriodScope::ORDER {
            let acc = self.slot(scope);
            *acc = round_to_cents(*acc + entry.total);
        }

        let boundaries = Boundaries::between(entry.raw_date, next.map(|n| n.raw_date));
        let mut emitted = Vec::new();

        for scope in PeriodScope::ORDER {
            if !boundaries.closes(scope) {
                continue;
            }
            let label = locale.summary_label(scope, entry.raw_date);
            emitted.push(SummaryRow::new(entry, scope, label, self.get(scope)));
            *self.slot(scope) = 0.0;
        }

        if boundaries.year {
            self.nine_month = 0.0;
            self.two_quarter = 0.0;
        }

        (self, emitted)
    }
}

/// Interleave summary rows into `entries`, which must be sorted by date.
pub fn build_summaries(entries: &[IncomeEntry], locale: Locale) -> Vec<LedgerRow> {
    let mut out = Vec::with_capacity(entries.len() * 2);
    let mut state = PeriodState::default();

    for (idx, entry) in entries.iter().enumerate() {
        let (next_state, summaries) = state.advance(entry, entries.get(idx + 1), locale);
        state = next_state;

        out.push(LedgerRow::Entry(entry.clone()));
        if !summaries.is_empty() {
            debug!("{} summary rows after {}", summaries.len(), entry.id);
        }
        out.extend(summaries.into_iter().map(LedgerRow::Summary));
    }

    out
}

/// Display sequence with or without summaries.
pub fn build_display_rows(
    entries: &[IncomeEntry],
    show_summaries: bool,
    locale: Locale,
) -> Vec<LedgerRow> {
    if show_summaries {
        build_summaries(entries, locale)
    } else {
        entries.iter().cloned().map(LedgerRow::Entry).collect()
    }
}
