use serde::{Deserialize, Serialize};
use std::fmt;

use super::amount::{deserialize_amount, format_amount};
use super::record_id::RecordId;
use super::Record;
use crate::sync::normalize_date;

/// Income or expense that repeats between `start` and `finish`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringEntry {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: f64,
    pub currency: String,
    pub start: String,
    pub finish: String,
    /// Free-form recurrence such as `monthly` or `weekly`.
    pub frequency: String,
    #[serde(default)]
    pub category_id: Option<RecordId>,
    #[serde(default)]
    pub user_id: Option<RecordId>,
}

impl Record for RecurringEntry {
    fn id(&self) -> &RecordId {
        &self.id
    }

    fn headers() -> &'static [&'static str] {
        &[
            "ID",
            "TITLE",
            "DESCRIPTION",
            "AMOUNT",
            "CURRENCY",
            "START",
            "FINISH",
            "RECURRENCE",
            "CATEGORY",
            "USER",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            self.description
                .clone()
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| "N/A".to_string()),
            format_amount(self.amount),
            self.currency.clone(),
            normalize_date(&self.start),
            normalize_date(&self.finish),
            self.frequency.clone(),
            self.category_id
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            self.user_id
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        ]
    }
}

impl fmt::Display for RecurringEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} {}, {}) from {} to {}",
            self.title,
            format_amount(self.amount),
            self.currency,
            self.frequency,
            normalize_date(&self.start),
            normalize_date(&self.finish)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RecurringEntry {
        serde_json::from_value(serde_json::json!({
            "id": 9,
            "title": "Hosting",
            "amount": 20,
            "currency": "USD",
            "start": "2024-01-01T00:00:00.000Z",
            "finish": "2024-12-31T00:00:00.000Z",
            "frequency": "monthly",
            "category_id": 4,
            "user_id": 2
        }))
        .unwrap()
    }

    #[test]
    fn test_row_normalizes_dates() {
        let row = sample().row();
        assert_eq!(row.len(), RecurringEntry::headers().len());
        assert_eq!(row[5], "2024-01-01");
        assert_eq!(row[6], "2024-12-31");
        assert_eq!(row[7], "monthly");
    }

    #[test]
    fn test_display() {
        assert_eq!(
            sample().to_string(),
            "Hosting (20 USD, monthly) from 2024-01-01 to 2024-12-31"
        );
    }
}
