use serde::{Deserialize, Serialize};
use std::fmt;

use super::amount::{deserialize_amount, format_amount};
use super::record_id::RecordId;
use super::Record;
use crate::sync::normalize_date;

/// A one-off income or expense record.
///
/// Fixed income and fixed expenses share this shape; the collection they were
/// fetched from decides which one a value is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedEntry {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: f64,
    pub currency: String,
    pub date: String,
    #[serde(default)]
    pub category_id: Option<RecordId>,
    #[serde(default)]
    pub user_id: Option<RecordId>,
}

impl Record for FixedEntry {
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
            "DATE",
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
            normalize_date(&self.date),
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

impl fmt::Display for FixedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} {}) on {}",
            self.title,
            format_amount(self.amount),
            self.currency,
            normalize_date(&self.date)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_server_record() {
        let json = r#"{
            "id": 3,
            "title": "Rent",
            "description": null,
            "amount": "1200.00",
            "currency": "USD",
            "date": "2024-01-01T00:00:00.000Z",
            "category_id": 1,
            "user_id": "1"
        }"#;
        let entry: FixedEntry = serde_json::from_str(json).unwrap();

        assert_eq!(entry.id.as_str(), "3");
        assert_eq!(entry.amount, 1200.0);
        assert_eq!(entry.description, None);
        assert_eq!(entry.category_id, Some(RecordId::from("1")));
    }

    #[test]
    fn test_missing_optional_ids_default_to_none() {
        let json = r#"{"id": "x", "title": "Gift", "amount": 50, "currency": "EUR", "date": "2024-02-02"}"#;
        let entry: FixedEntry = serde_json::from_str(json).unwrap();
        assert!(entry.category_id.is_none());
        assert!(entry.user_id.is_none());
    }

    #[test]
    fn test_row_matches_headers() {
        let json = r#"{"id": 1, "title": "Salary", "amount": 3000, "currency": "USD", "date": "2024-03-01T10:00:00Z"}"#;
        let entry: FixedEntry = serde_json::from_str(json).unwrap();
        let row = entry.row();

        assert_eq!(row.len(), FixedEntry::headers().len());
        assert_eq!(row[2], "N/A");
        assert_eq!(row[3], "3000");
        assert_eq!(row[5], "2024-03-01");
    }

    #[test]
    fn test_display() {
        let json = r#"{"id": 1, "title": "Salary", "amount": 3000.5, "currency": "USD", "date": "2024-03-01"}"#;
        let entry: FixedEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.to_string(), "Salary (3000.5 USD) on 2024-03-01");
    }
}
