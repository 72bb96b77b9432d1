use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::identity::Privilege;

/// How a field is typed on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    /// A bare `YYYY-MM-DD` date.
    Date,
}

/// One entry of a resource's form schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name on records and drafts.
    pub name: &'static str,
    /// Key used in request payloads.
    pub wire: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Value a fresh create form starts with.
    pub default: &'static str,
}

impl FieldSpec {
    const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            wire: name,
            kind,
            required: true,
            default: "",
        }
    }

    const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            wire: name,
            kind,
            required: false,
            default: "",
        }
    }

    const fn wire_as(mut self, wire: &'static str) -> Self {
        self.wire = wire;
        self
    }

    const fn defaults_to(mut self, default: &'static str) -> Self {
        self.default = default;
        self
    }
}

const FIXED_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("title", FieldKind::Text),
    FieldSpec::optional("description", FieldKind::Text),
    FieldSpec::required("amount", FieldKind::Number),
    FieldSpec::required("currency", FieldKind::Text).defaults_to("USD"),
    FieldSpec::required("date", FieldKind::Date),
    FieldSpec::required("category_id", FieldKind::Text),
    FieldSpec::required("user_id", FieldKind::Text),
];

const RECURRING_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("title", FieldKind::Text),
    FieldSpec::optional("description", FieldKind::Text),
    FieldSpec::required("amount", FieldKind::Number),
    FieldSpec::required("currency", FieldKind::Text).defaults_to("USD"),
    FieldSpec::required("start", FieldKind::Date),
    FieldSpec::required("finish", FieldKind::Date),
    FieldSpec::required("frequency", FieldKind::Text),
    FieldSpec::required("category_id", FieldKind::Text),
    FieldSpec::required("user_id", FieldKind::Text),
];

const PROFIT_GOAL_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("target_profit", FieldKind::Number).wire_as("targetProfit"),
    FieldSpec::required("start_date", FieldKind::Date).wire_as("startDate"),
    FieldSpec::required("end_date", FieldKind::Date).wire_as("endDate"),
];

/// How an edit session is written back to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// `PUT` with the entire draft.
    FullReplace,
    /// `PATCH` with only the fields that changed since the session opened.
    Partial,
}

/// The five record families exposed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    FixedIncome,
    FixedExpenses,
    RecurringIncome,
    RecurringExpenses,
    ProfitGoals,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::FixedIncome,
        ResourceKind::FixedExpenses,
        ResourceKind::RecurringIncome,
        ResourceKind::RecurringExpenses,
        ResourceKind::ProfitGoals,
    ];

    /// Collection path relative to the API root.
    pub fn base_path(self) -> &'static str {
        match self {
            ResourceKind::FixedIncome => "/api/fixed-income",
            ResourceKind::FixedExpenses => "/api/fixed-expenses",
            ResourceKind::RecurringIncome => "/api/recurring-incomes",
            ResourceKind::RecurringExpenses => "/api/recurring-expenses",
            ResourceKind::ProfitGoals => "/api/profit-goals",
        }
    }

    /// Plural, lower-case name used in messages.
    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::FixedIncome => "income records",
            ResourceKind::FixedExpenses => "expenses",
            ResourceKind::RecurringIncome => "recurring income",
            ResourceKind::RecurringExpenses => "recurring expenses",
            ResourceKind::ProfitGoals => "profit goals",
        }
    }

    /// Singular, lower-case name used in messages.
    pub fn singular(self) -> &'static str {
        match self {
            ResourceKind::FixedIncome => "income",
            ResourceKind::FixedExpenses => "expense",
            ResourceKind::RecurringIncome => "recurring income",
            ResourceKind::RecurringExpenses => "recurring expense",
            ResourceKind::ProfitGoals => "profit goal",
        }
    }

    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            ResourceKind::FixedIncome | ResourceKind::FixedExpenses => FIXED_FIELDS,
            ResourceKind::RecurringIncome | ResourceKind::RecurringExpenses => RECURRING_FIELDS,
            ResourceKind::ProfitGoals => PROFIT_GOAL_FIELDS,
        }
    }

    pub fn field(self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().iter().find(|f| f.name == name)
    }

    pub fn update_mode(self) -> UpdateMode {
        match self {
            ResourceKind::ProfitGoals => UpdateMode::Partial,
            _ => UpdateMode::FullReplace,
        }
    }

    /// Privilege needed to create, edit or delete records of this kind.
    pub fn required_privilege(self) -> Option<Privilege> {
        match self {
            ResourceKind::ProfitGoals => Some(Privilege::ManageProfitGoals),
            _ => None,
        }
    }

    /// Payload key filled with the caller's user id on create.
    ///
    /// Income and expense forms carry `user_id` as an ordinary field instead.
    pub fn owner_key(self) -> Option<&'static str> {
        match self {
            ResourceKind::ProfitGoals => Some("userId"),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::FixedIncome => write!(f, "fixed-income"),
            ResourceKind::FixedExpenses => write!(f, "fixed-expenses"),
            ResourceKind::RecurringIncome => write!(f, "recurring-income"),
            ResourceKind::RecurringExpenses => write!(f, "recurring-expenses"),
            ResourceKind::ProfitGoals => write!(f, "profit-goals"),
        }
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fixed-income" | "income" => Ok(ResourceKind::FixedIncome),
            "fixed-expenses" | "expenses" => Ok(ResourceKind::FixedExpenses),
            "recurring-income" | "recurring-incomes" => Ok(ResourceKind::RecurringIncome),
            "recurring-expenses" => Ok(ResourceKind::RecurringExpenses),
            "profit-goals" | "goals" => Ok(ResourceKind::ProfitGoals),
            _ => Err(format!(
                "Invalid resource '{}'. Valid options: fixed-income, fixed-expenses, \
                 recurring-income, recurring-expenses, profit-goals",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_paths() {
        assert_eq!(ResourceKind::FixedIncome.base_path(), "/api/fixed-income");
        assert_eq!(ResourceKind::FixedExpenses.base_path(), "/api/fixed-expenses");
        assert_eq!(
            ResourceKind::RecurringIncome.base_path(),
            "/api/recurring-incomes"
        );
        assert_eq!(
            ResourceKind::RecurringExpenses.base_path(),
            "/api/recurring-expenses"
        );
        assert_eq!(ResourceKind::ProfitGoals.base_path(), "/api/profit-goals");
    }

    #[test]
    fn test_only_profit_goals_are_partial_and_privileged() {
        for kind in ResourceKind::ALL {
            let is_goal = kind == ResourceKind::ProfitGoals;
            assert_eq!(kind.update_mode() == UpdateMode::Partial, is_goal);
            assert_eq!(kind.required_privilege().is_some(), is_goal);
            assert_eq!(kind.owner_key().is_some(), is_goal);
        }
    }

    #[test]
    fn test_profit_goal_wire_names() {
        let wires: Vec<_> = ResourceKind::ProfitGoals
            .fields()
            .iter()
            .map(|f| f.wire)
            .collect();
        assert_eq!(wires, vec!["targetProfit", "startDate", "endDate"]);
    }

    #[test]
    fn test_currency_defaults_to_usd() {
        let currency = ResourceKind::RecurringExpenses.field("currency").unwrap();
        assert_eq!(currency.default, "USD");
        assert!(currency.required);
        assert!(!ResourceKind::FixedIncome.field("description").unwrap().required);
    }

    #[test]
    fn test_display_from_str_roundtrip() {
        for kind in ResourceKind::ALL {
            let parsed: ResourceKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
        }
        assert_eq!(
            ResourceKind::from_str("INCOME").unwrap(),
            ResourceKind::FixedIncome
        );
        assert!(ResourceKind::from_str("budgets").is_err());
    }
}
