//! Shared export settings and number formatting.

use ledger_core::{AmountColumn, LedgerRow, Locale};

/// What every renderer needs besides the rows themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub locale: Locale,
    /// Overrides the locale's default document title
    pub title: Option<String>,
    /// Year printed under the title
    pub year: i32,
    pub delimiter: u8,
}

impl ExportOptions {
    pub fn new(locale: Locale, year: i32) -> Self {
        Self {
            locale,
            title: None,
            year,
            delimiter: b';',
        }
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(self.locale.title())
    }
}

/// Two decimals with locale grouping: `1 250,50` (uk) or `1,250.50` (en).
pub fn format_amount(value: f64, locale: Locale) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let group_sep = match locale {
        Locale::Uk => '\u{a0}',
        Locale::En => ',',
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.iter().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(group_sep);
        }
        grouped.push(*ch);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}{}{frac_part}", locale.decimal_separator())
}

/// The seven rendered cells of a row; unset amounts are empty strings.
pub fn row_cells(row: &LedgerRow, locale: Locale) -> [String; 7] {
    let amount = |column| {
        row.amount(column)
            .map(|v| format_amount(v, locale))
            .unwrap_or_default()
    };
    [
        row.date_label().to_string(),
        amount(AmountColumn::Cash),
        amount(AmountColumn::NonCash),
        amount(AmountColumn::Refund),
        amount(AmountColumn::Transit),
        amount(AmountColumn::Own),
        format_amount(row.total(), locale),
    ]
}
