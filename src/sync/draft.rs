//! Form drafts: the pending, unsaved input for one record.
//!
//! A draft holds every schema field as the raw string a user typed. Values are
//! only given JSON types when a payload is built, and the only client-side
//! check is that required fields are non-empty.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

use super::error::ValidationError;
use crate::models::{format_amount, FieldKind, FieldSpec, ResourceKind};

/// Pending field values for one resource kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    kind: ResourceKind,
    values: BTreeMap<&'static str, String>,
}

impl Draft {
    /// A fresh create form: every field at its schema default.
    pub fn empty(kind: ResourceKind) -> Self {
        let values = kind
            .fields()
            .iter()
            .map(|f| (f.name, f.default.to_string()))
            .collect();
        Self { kind, values }
    }

    /// Seeds a draft from a fetched record.
    ///
    /// Missing and null fields become empty strings and date fields lose any
    /// time-of-day component.
    pub fn from_record<R: Serialize>(
        kind: ResourceKind,
        record: &R,
    ) -> Result<Self, serde_json::Error> {
        let json = serde_json::to_value(record)?;
        let values = kind
            .fields()
            .iter()
            .map(|spec| {
                let raw = match json.get(spec.name) {
                    None | Some(Value::Null) => String::new(),
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Number(n)) => number_to_field(n),
                    Some(other) => other.to_string(),
                };
                let value = match spec.kind {
                    FieldKind::Date => normalize_date(&raw),
                    _ => raw,
                };
                (spec.name, value)
            })
            .collect();
        Ok(Self { kind, values })
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    pub fn set(&mut self, field: &str, value: impl Into<String>) -> Result<(), ValidationError> {
        let spec = self
            .kind
            .field(field)
            .ok_or_else(|| ValidationError::UnknownField(field.to_string()))?;
        self.values.insert(spec.name, value.into());
        Ok(())
    }

    /// Builder form of [`Draft::set`].
    pub fn with(mut self, field: &str, value: impl Into<String>) -> Result<Self, ValidationError> {
        self.set(field, value)?;
        Ok(self)
    }

    /// Required fields that are empty or whitespace, in schema order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.kind
            .fields()
            .iter()
            .filter(|f| f.required && self.get(f.name).map_or(true, |v| v.trim().is_empty()))
            .map(|f| f.name)
            .collect()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingFields(missing))
        }
    }

    /// Body for a create request. Empty optional fields are left out.
    pub fn create_payload(&self) -> Map<String, Value> {
        self.kind
            .fields()
            .iter()
            .filter_map(|spec| {
                let raw = self.get(spec.name).unwrap_or_default();
                if raw.trim().is_empty() && !spec.required {
                    return None;
                }
                Some((spec.wire.to_string(), field_value(spec, raw)))
            })
            .collect()
    }

    /// Body for a full-replace update. Empty optional fields are sent as null
    /// so the server clears them.
    pub fn replace_payload(&self) -> Map<String, Value> {
        self.kind
            .fields()
            .iter()
            .map(|spec| {
                let raw = self.get(spec.name).unwrap_or_default();
                let value = if raw.trim().is_empty() && !spec.required {
                    Value::Null
                } else {
                    field_value(spec, raw)
                };
                (spec.wire.to_string(), value)
            })
            .collect()
    }

    /// Body for a partial update: only fields that differ from `original`.
    pub fn diff(&self, original: &Draft) -> Map<String, Value> {
        self.kind
            .fields()
            .iter()
            .filter(|spec| self.get(spec.name) != original.get(spec.name))
            .map(|spec| {
                let raw = self.get(spec.name).unwrap_or_default();
                (spec.wire.to_string(), field_value(spec, raw))
            })
            .collect()
    }
}

/// Strips the time-of-day from an ISO-8601 date or timestamp.
///
/// `2024-01-01T13:45:00.000Z` becomes `2024-01-01`. Basic-format dates are
/// rewritten in extended form, so `20240101T120000Z` also becomes
/// `2024-01-01`. Strings that do not start with a valid calendar date are
/// returned unchanged.
pub fn normalize_date(value: &str) -> String {
    let trimmed = value.trim();
    let prefix = trimmed
        .split(|c: char| c == 'T' || c == 't' || c == ' ')
        .next()
        .unwrap_or(trimmed);
    if NaiveDate::parse_from_str(prefix, "%Y-%m-%d").is_ok() {
        return prefix.to_string();
    }
    match parse_basic_date(prefix) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => trimmed.to_string(),
    }
}

/// Parses `YYYYMMDD`.
fn parse_basic_date(value: &str) -> Option<NaiveDate> {
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = value[..4].parse().ok()?;
    let month = value[4..6].parse().ok()?;
    let day = value[6..].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn number_to_field(n: &Number) -> String {
    match n.as_i64() {
        Some(i) => i.to_string(),
        None => n.as_f64().map(format_amount).unwrap_or_else(|| n.to_string()),
    }
}

/// Gives a raw form value its JSON type.
///
/// Numbers that do not parse are sent as typed so the server can reject them.
fn field_value(spec: &FieldSpec, raw: &str) -> Value {
    match spec.kind {
        FieldKind::Number => {
            let trimmed = raw.trim();
            if let Ok(i) = trimmed.parse::<i64>() {
                Value::Number(i.into())
            } else if let Some(n) = trimmed.parse::<f64>().ok().and_then(Number::from_f64) {
                Value::Number(n)
            } else {
                Value::String(raw.to_string())
            }
        }
        FieldKind::Text | FieldKind::Date => Value::String(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FixedEntry, ProfitGoal, RecurringEntry};
    use chrono::Datelike;
    use serde_json::json;

    fn rent_draft() -> Draft {
        Draft::empty(ResourceKind::FixedExpenses)
            .with("title", "Rent")
            .unwrap()
            .with("amount", "1200")
            .unwrap()
            .with("date", "2024-01-01")
            .unwrap()
            .with("category_id", "1")
            .unwrap()
            .with("user_id", "1")
            .unwrap()
    }

    #[test]
    fn test_empty_draft_uses_defaults() {
        let draft = Draft::empty(ResourceKind::FixedIncome);
        assert_eq!(draft.get("currency"), Some("USD"));
        assert_eq!(draft.get("title"), Some(""));
        assert_eq!(draft.get("nope"), None);
    }

    #[test]
    fn test_set_unknown_field_is_rejected() {
        let mut draft = Draft::empty(ResourceKind::ProfitGoals);
        assert_eq!(
            draft.set("title", "x"),
            Err(ValidationError::UnknownField("title".into()))
        );
    }

    #[test]
    fn test_missing_fields_in_schema_order() {
        let draft = Draft::empty(ResourceKind::RecurringIncome)
            .with("title", "  ")
            .unwrap();
        assert_eq!(
            draft.missing_fields(),
            vec![
                "title",
                "amount",
                "start",
                "finish",
                "frequency",
                "category_id",
                "user_id"
            ]
        );
        assert!(rent_draft().validate().is_ok());
    }

    #[test]
    fn test_create_payload_types_and_omits_empty_optional() {
        let payload = Value::Object(rent_draft().create_payload());
        assert_eq!(
            payload,
            json!({
                "title": "Rent",
                "amount": 1200,
                "currency": "USD",
                "date": "2024-01-01",
                "category_id": "1",
                "user_id": "1"
            })
        );
    }

    #[test]
    fn test_replace_payload_nulls_empty_optional() {
        let payload = rent_draft().replace_payload();
        assert_eq!(payload.get("description"), Some(&Value::Null));
        assert_eq!(payload.len(), ResourceKind::FixedExpenses.fields().len());
    }

    #[test]
    fn test_unparseable_number_is_sent_verbatim() {
        let draft = rent_draft().with("amount", "twelve").unwrap();
        assert_eq!(draft.create_payload()["amount"], json!("twelve"));

        let draft = rent_draft().with("amount", "12.75").unwrap();
        assert_eq!(draft.create_payload()["amount"], json!(12.75));
    }

    #[test]
    fn test_from_record_normalizes_dates() {
        let entry: FixedEntry = serde_json::from_value(json!({
            "id": 1,
            "title": "Rent",
            "description": null,
            "amount": "1200.00",
            "currency": "USD",
            "date": "2024-01-01T00:00:00.000Z",
            "category_id": 1,
            "user_id": 1
        }))
        .unwrap();
        let draft = Draft::from_record(ResourceKind::FixedExpenses, &entry).unwrap();

        assert_eq!(draft.get("date"), Some("2024-01-01"));
        assert_eq!(draft.get("amount"), Some("1200"));
        assert_eq!(draft.get("description"), Some(""));
        assert_eq!(draft.get("category_id"), Some("1"));
    }

    #[test]
    fn test_from_record_recurring_dates() {
        let entry: RecurringEntry = serde_json::from_value(json!({
            "id": 2,
            "title": "Retainer",
            "amount": 800,
            "currency": "EUR",
            "start": "2024-02-01T08:30:00+02:00",
            "finish": "2024-11-30",
            "frequency": "monthly"
        }))
        .unwrap();
        let draft = Draft::from_record(ResourceKind::RecurringIncome, &entry).unwrap();
        assert_eq!(draft.get("start"), Some("2024-02-01"));
        assert_eq!(draft.get("finish"), Some("2024-11-30"));
        assert_eq!(draft.get("user_id"), Some(""));
    }

    #[test]
    fn test_diff_sends_only_changed_fields() {
        let goal: ProfitGoal = serde_json::from_value(json!({
            "id": 1,
            "target_profit": 5000,
            "start_date": "2024-01-01",
            "end_date": "2024-12-31"
        }))
        .unwrap();
        let original = Draft::from_record(ResourceKind::ProfitGoals, &goal).unwrap();

        assert!(original.clone().diff(&original).is_empty());

        let edited = original.clone().with("target_profit", "6000").unwrap();
        assert_eq!(
            Value::Object(edited.diff(&original)),
            json!({ "targetProfit": 6000 })
        );
    }

    #[test]
    fn test_normalize_date() {
        assert_eq!(normalize_date("2024-01-01T00:00:00.000Z"), "2024-01-01");
        assert_eq!(normalize_date("2024-03-15T23:59:59+05:30"), "2024-03-15");
        assert_eq!(normalize_date("2024-03-15 10:00:00"), "2024-03-15");
        assert_eq!(normalize_date("2024-03-15"), "2024-03-15");
        assert_eq!(normalize_date("not a date"), "not a date");
        assert_eq!(normalize_date(""), "");
    }

    #[test]
    fn test_normalize_basic_format_date() {
        assert_eq!(normalize_date("20240101T120000Z"), "2024-01-01");
        assert_eq!(normalize_date("20240315"), "2024-03-15");
        assert_eq!(normalize_date("20240230T000000Z"), "20240230T000000Z");
        assert_eq!(normalize_date("2024011"), "2024011");
    }

    #[test]
    fn test_normalize_date_every_day_of_year() {
        let mut day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        while day.year() == 2024 {
            let stamp = format!("{}T12:34:56.789Z", day.format("%Y-%m-%d"));
            assert_eq!(normalize_date(&stamp), day.format("%Y-%m-%d").to_string());
            day = day.succ_opt().unwrap();
        }
    }
}
