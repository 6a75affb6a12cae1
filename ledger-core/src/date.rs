//! Date normalization: one entry point, ordered fallback strategies.

use crate::cell::CellValue;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::OnceLock;

/// Display format used for `IncomeEntry::date`.
pub const DISPLAY_FORMAT: &str = "%d.%m.%Y";
/// Grouping key format.
pub const KEY_FORMAT: &str = "%Y-%m-%d";

const MS_PER_DAY: f64 = 86_400_000.0;

/// Spreadsheet day zero (1899-12-30).
fn serial_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

fn local_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{1,2})[./](\d{1,2})[./](\d{4})(?:\s+(\d{1,2}):(\d{2}))?$")
            .expect("static date pattern")
    })
}

const ISO_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const ISO_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Resolve a cell into a calendar instant, or `None` when it holds no date.
pub fn normalize_date(value: &CellValue) -> Option<NaiveDateTime> {
    match value {
        CellValue::Empty => None,
        CellValue::Date(d) => Some(*d),
        CellValue::Number(n) => from_serial(*n),
        CellValue::Text(s) => parse_date_text(s),
    }
}

/// Calendar date only; time-of-day is dropped.
pub fn normalize_day(value: &CellValue) -> Option<NaiveDate> {
    normalize_date(value).map(|dt| dt.date())
}

/// Spreadsheet serial number (days since 1899-12-30, fraction = time of day).
pub fn from_serial(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial == 0.0 {
        return None;
    }
    let ms = (serial * MS_PER_DAY).round();
    if ms.abs() > i64::MAX as f64 {
        return None;
    }
    serial_epoch().checked_add_signed(Duration::try_milliseconds(ms as i64)?)
}

pub fn parse_date_text(s: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    parse_local(trimmed).or_else(|| parse_iso_like(trimmed))
}

/// `D.M.YYYY` or `D/M/YYYY`, optionally followed by `H:MM`. Day comes first.
fn parse_local(s: &str) -> Option<NaiveDateTime> {
    let caps = local_pattern().captures(s)?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    let hour: u32 = caps.get(4).map_or(Ok(0), |m| m.as_str().parse()).ok()?;
    let minute: u32 = caps.get(5).map_or(Ok(0), |m| m.as_str().parse()).ok()?;

    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, 0)
}

fn parse_iso_like(s: &str) -> Option<NaiveDateTime> {
    for fmt in ISO_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in ISO_DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_local())
}

pub fn display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

pub fn day_key(date: NaiveDate) -> String {
    date.format(KEY_FORMAT).to_string()
}
