use serde::{Deserialize, Serialize};
use std::fmt;

use super::amount::{deserialize_amount, format_amount};
use super::record_id::RecordId;
use super::Record;
use crate::sync::normalize_date;

/// Target profit for a date range, owned by the user who set it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitGoal {
    pub id: RecordId,
    #[serde(deserialize_with = "deserialize_amount")]
    pub target_profit: f64,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub user_id: Option<RecordId>,
}

impl Record for ProfitGoal {
    fn id(&self) -> &RecordId {
        &self.id
    }

    fn headers() -> &'static [&'static str] {
        &["ID", "TARGET PROFIT", "START DATE", "END DATE"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            format_amount(self.target_profit),
            self.start_date
                .as_deref()
                .map(normalize_date)
                .unwrap_or_default(),
            self.end_date
                .as_deref()
                .map(normalize_date)
                .unwrap_or_default(),
        ]
    }
}

impl fmt::Display for ProfitGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Target profit {}", format_amount(self.target_profit))?;
        if let (Some(start), Some(end)) = (&self.start_date, &self.end_date) {
            write!(
                f,
                " from {} to {}",
                normalize_date(start),
                normalize_date(end)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_nulls() {
        let goal: ProfitGoal = serde_json::from_str(
            r#"{"id": 1, "target_profit": 5000, "start_date": null, "end_date": "2024-12-31"}"#,
        )
        .unwrap();
        assert_eq!(goal.target_profit, 5000.0);
        assert!(goal.start_date.is_none());
        assert_eq!(goal.row()[2], "");
        assert_eq!(goal.to_string(), "Target profit 5000");
    }

    #[test]
    fn test_display_with_range() {
        let goal: ProfitGoal = serde_json::from_str(
            r#"{"id": 1, "target_profit": "7500.00", "start_date": "2024-01-01T00:00:00Z", "end_date": "2024-06-30"}"#,
        )
        .unwrap();
        assert_eq!(
            goal.to_string(),
            "Target profit 7500 from 2024-01-01 to 2024-06-30"
        );
    }
}
