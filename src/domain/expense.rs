use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Cents, format_cents};

pub type ExpenseId = u32;

/// Category given to expenses recorded without one.
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

/// A single recorded expense.
///
/// The serialized field names and shapes are the on-disk schema of the
/// backing file: `Amount` is a decimal number and `Date` a `YYYY-MM-DD`
/// string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Expense {
    /// Assigned by the ledger; 0 until the expense has been added.
    pub id: ExpenseId,
    pub description: String,
    #[serde(with = "amount_format")]
    pub amount: Cents,
    pub category: String,
    #[serde(with = "date_format")]
    pub date: NaiveDate,
}

impl Expense {
    /// Create an unsaved expense in the default category.
    pub fn new(description: impl Into<String>, amount: Cents, date: NaiveDate) -> Self {
        Self {
            id: 0,
            description: description.into(),
            amount,
            category: DEFAULT_CATEGORY.to_string(),
            date,
        }
    }

    /// Set the category; blank input keeps the default.
    pub fn with_category(mut self, category: impl AsRef<str>) -> Self {
        self.category = category_or_default(category.as_ref());
        self
    }

    /// Case-insensitive category comparison used by all category queries.
    pub fn in_category(&self, category: &str) -> bool {
        self.category.to_lowercase() == category.to_lowercase()
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}. {} - ${} ({}) - {}",
            self.id,
            self.description,
            format_cents(self.amount),
            self.category,
            self.date.format("%Y-%m-%d")
        )
    }
}

/// Trimmed category, or the default one when blank.
pub fn category_or_default(category: &str) -> String {
    let trimmed = category.trim();
    if trimmed.is_empty() {
        DEFAULT_CATEGORY.to_string()
    } else {
        trimmed.to_string()
    }
}

mod amount_format {
    use serde::{Deserialize, Deserializer, Serializer, de};
    use tracing::warn;

    use crate::domain::Cents;

    pub fn serialize<S: Serializer>(cents: &Cents, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(*cents as f64 / 100.0)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Cents, D::Error> {
        let value = f64::deserialize(deserializer)?;
        let exact = value * 100.0;
        let cents = exact.round();
        if !cents.is_finite() || cents.abs() > i64::MAX as f64 {
            return Err(de::Error::custom(format!("amount out of range: {}", value)));
        }
        if (exact - cents).abs() > 1e-6 {
            warn!(stored = value, rounded = cents / 100.0, "amount rounded to the nearest cent");
        }
        Ok(cents as Cents)
    }
}

/// Dates are written as `YYYY-MM-DD`. Reading also accepts full ISO-8601
/// date-times (with or without offset) and keeps their calendar date.
mod date_format {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer, de};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let value = String::deserialize(deserializer)?;
        parse(&value).ok_or_else(|| de::Error::custom(format!("invalid date: {}", value)))
    }

    fn parse(value: &str) -> Option<NaiveDate> {
        if let Ok(date) = NaiveDate::parse_from_str(value, FORMAT) {
            return Some(date);
        }
        if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
            return Some(datetime.date_naive());
        }
        NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|datetime| datetime.date())
    }
}
