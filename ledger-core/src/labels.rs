//! Period labels for summary rows.

use crate::entry::PeriodScope;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const UK_MONTHS: [&str; 12] = [
    "Січень", "Лютий", "Березень", "Квітень", "Травень", "Червень", "Липень", "Серпень",
    "Вересень", "Жовтень", "Листопад", "Грудень",
];

const EN_MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

/// Language of labels, headers and number formatting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Uk,
    En,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "uk" | "ua" | "uk-ua" => Ok(Locale::Uk),
            "en" | "en-us" | "en-gb" => Ok(Locale::En),
            other => Err(format!("unsupported locale: {other}")),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Locale::Uk => "uk",
            Locale::En => "en",
        })
    }
}

/// 1-based calendar quarter.
pub fn quarter(date: NaiveDate) -> u32 {
    date.month0() / 3 + 1
}

/// 1 for January to June, 2 otherwise.
pub fn half(date: NaiveDate) -> u32 {
    date.month0() / 6 + 1
}

impl Locale {
    pub fn month_name(self, date: NaiveDate) -> &'static str {
        let idx = date.month0() as usize;
        match self {
            Locale::Uk => UK_MONTHS[idx],
            Locale::En => EN_MONTHS[idx],
        }
    }

    /// Label of the summary closing `scope` at the anchor `date`.
    pub fn summary_label(self, scope: PeriodScope, date: NaiveDate) -> String {
        let year = date.year();
        match self {
            Locale::Uk => match scope {
                PeriodScope::Month => format!("Підсумок за {} {year}", self.month_name(date)),
                PeriodScope::Quarter => format!("Підсумок за {} квартал {year}", quarter(date)),
                PeriodScope::TwoQuarter => {
                    let first = quarter(date) - 1;
                    format!("Підсумок за {first}-{} квартали {year}", first + 1)
                }
                PeriodScope::Half => format!("Підсумок за {} півріччя {year}", half(date)),
                PeriodScope::NineMonth => format!("Підсумок за 9 місяців {year}"),
                PeriodScope::Year => format!("Підсумок за {year} рік"),
            },
            Locale::En => match scope {
                PeriodScope::Month => format!("{} {year}", self.month_name(date)),
                PeriodScope::Quarter => format!("{} quarter {year}", quarter(date)),
                PeriodScope::TwoQuarter => {
                    let first = quarter(date) - 1;
                    format!("{first}-{} quarters {year}", first + 1)
                }
                PeriodScope::Half => format!("{} half-year {year}", half(date)),
                PeriodScope::NineMonth => format!("9 months {year}"),
                PeriodScope::Year => format!("{year} year"),
            },
        }
    }

    /// Seven ledger column headers.
    pub fn headers(self) -> [&'static str; 7] {
        match self {
            Locale::Uk => [
                "Дата операції",
                "Готівка",
                "Надходження безготівка",
                "Повернення",
                "Транзитні кошти",
                "Власні кошти",
                "Разом дохід",
            ],
            Locale::En => [
                "Operation date",
                "Cash",
                "Non-cash receipt",
                "Refund",
                "Transit funds",
                "Own funds",
                "Total income",
            ],
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Locale::Uk => {
                "КНИГА ОБЛІКУ ДОХОДІВ для платників єдиного податку 1,2,3 груп, які не є платниками ПДВ"
            }
            Locale::En => "INCOME LEDGER for simplified-tax payers of groups 1, 2, 3 not registered for VAT",
        }
    }

    /// Subtitle naming the document year.
    pub fn year_label(self, year: i32) -> String {
        match self {
            Locale::Uk => format!("на {year} рік"),
            Locale::En => format!("for the year {year}"),
        }
    }

    pub fn decimal_separator(self) -> char {
        match self {
            Locale::Uk => ',',
            Locale::En => '.',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_ukrainian_labels() {
        let d = ymd(2024, 3, 31);
        let uk = Locale::Uk;
        assert_eq!(uk.summary_label(PeriodScope::Month, d), "Підсумок за Березень 2024");
        assert_eq!(uk.summary_label(PeriodScope::Quarter, d), "Підсумок за 1 квартал 2024");
        assert_eq!(uk.summary_label(PeriodScope::Half, d), "Підсумок за 1 півріччя 2024");
        assert_eq!(uk.summary_label(PeriodScope::NineMonth, d), "Підсумок за 9 місяців 2024");
        assert_eq!(uk.summary_label(PeriodScope::Year, d), "Підсумок за 2024 рік");
        assert_eq!(
            uk.summary_label(PeriodScope::TwoQuarter, ymd(2024, 12, 31)),
            "Підсумок за 3-4 квартали 2024"
        );
    }

    #[test]
    fn test_english_labels() {
        let d = ymd(2025, 8, 14);
        let en = Locale::En;
        assert_eq!(en.summary_label(PeriodScope::Month, d), "August 2025");
        assert_eq!(en.summary_label(PeriodScope::Quarter, d), "3 quarter 2025");
        assert_eq!(en.summary_label(PeriodScope::Half, d), "2 half-year 2025");
        assert_eq!(en.summary_label(PeriodScope::NineMonth, d), "9 months 2025");
        assert_eq!(en.summary_label(PeriodScope::Year, d), "2025 year");
        assert_eq!(en.summary_label(PeriodScope::TwoQuarter, ymd(2025, 6, 1)), "1-2 quarters 2025");
    }

    #[test]
    fn test_quarter_and_half() {
        assert_eq!(quarter(ymd(2024, 1, 1)), 1);
        assert_eq!(quarter(ymd(2024, 6, 30)), 2);
        assert_eq!(quarter(ymd(2024, 10, 1)), 4);
        assert_eq!(half(ymd(2024, 6, 30)), 1);
        assert_eq!(half(ymd(2024, 7, 1)), 2);
    }

    #[test]
    fn test_locale_parsing() {
        assert_eq!("UK".parse::<Locale>(), Ok(Locale::Uk));
        assert_eq!("en".parse::<Locale>(), Ok(Locale::En));
        assert!("de".parse::<Locale>().is_err());
    }
}
