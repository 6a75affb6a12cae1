//! Column mapping and header auto-detection.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Which statement columns hold the date, amount and (optionally) description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub description: Option<String>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Role a header can be mapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    Date,
    Amount,
    Description,
}

/// A header-name rule: first rule whose pattern matches claims the column.
pub struct DetectionRule {
    pub role: ColumnRole,
    pub pattern: Regex,
}

/// Detection rules in priority order.
pub fn detection_rules() -> &'static [DetectionRule] {
    static RULES: OnceLock<Vec<DetectionRule>> = OnceLock::new();
    RULES.get_or_init(|| {
        [
            (ColumnRole::Date, r"(?i)date|дата"),
            (ColumnRole::Amount, r"(?i)amount|sum|сума|надход"),
            (ColumnRole::Description, r"(?i)type|опис|detail|comment|признач"),
        ]
        .into_iter()
        .map(|(role, pat)| DetectionRule {
            role,
            pattern: Regex::new(pat).expect("static detection pattern"),
        })
        .collect()
    })
}

impl ColumnMapping {
    pub fn new(date: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            amount: amount.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let d = description.into();
        self.description = if d.trim().is_empty() { None } else { Some(d) };
        self
    }

    /// Date and amount are required before anything can be aggregated.
    pub fn is_complete(&self) -> bool {
        !self.date.trim().is_empty() && !self.amount.trim().is_empty()
    }

    pub fn column(&self, role: ColumnRole) -> Option<&str> {
        match role {
            ColumnRole::Date => Some(self.date.as_str()).filter(|s| !s.is_empty()),
            ColumnRole::Amount => Some(self.amount.as_str()).filter(|s| !s.is_empty()),
            ColumnRole::Description => self.description.as_deref(),
        }
    }

    /// Guess the mapping from header names.
    ///
    /// Headers are scanned in file order; for each role the first matching
    /// header wins. Roles with no match keep their value from `current`.
    pub fn auto_detect(columns: &[String], current: &ColumnMapping) -> ColumnMapping {
        let mut date = None;
        let mut amount = None;
        let mut description = None;

        for column in columns {
            let lower = column.to_lowercase();
            for rule in detection_rules() {
                if !rule.pattern.is_match(&lower) {
                    continue;
                }
                let slot = match rule.role {
                    ColumnRole::Date => &mut date,
                    ColumnRole::Amount => &mut amount,
                    ColumnRole::Description => &mut description,
                };
                if slot.is_none() {
                    *slot = Some(column.clone());
                }
            }
        }

        ColumnMapping {
            date: date.unwrap_or_else(|| current.date.clone()),
            amount: amount.unwrap_or_else(|| current.amount.clone()),
            description: description.or_else(|| current.description.clone()),
        }
    }

    /// Apply explicit user choices on top of this mapping.
    pub fn overridden(
        mut self,
        date: Option<String>,
        amount: Option<String>,
        description: Option<String>,
    ) -> ColumnMapping {
        if let Some(d) = date {
            self.date = d;
        }
        if let Some(a) = amount {
            self.amount = a;
        }
        if let Some(desc) = description {
            self.description = Some(desc).filter(|s| !s.trim().is_empty());
        }
        self
    }
}
