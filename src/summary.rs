//! Dashboard figures: totals across all collections and profit-goal progress.

use serde::Serialize;

use crate::models::{FixedEntry, ProfitGoal, RecurringEntry, ResourceKind};
use crate::sync::{ApiClient, ApiError};

/// Income, expenses and profit against the current goal.
///
/// Amounts are summed as stored; records in different currencies are not
/// converted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinanceSummary {
    pub fixed_income: f64,
    pub recurring_income: f64,
    pub fixed_expenses: f64,
    pub recurring_expenses: f64,
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_profit: f64,
    /// Target of the first profit goal, 0 when there is none.
    pub profit_goal: f64,
    /// Net profit as a percentage of the goal. `None` when the goal is 0.
    pub goal_progress: Option<f64>,
}

/// Which expense collections count toward `total_expenses`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpenseScope {
    /// Fixed and recurring expenses.
    #[default]
    All,
    /// Fixed expenses only. Recurring expenses are not fetched.
    FixedOnly,
}

#[derive(Debug, thiserror::Error)]
#[error("Failed to load data")]
pub struct SummaryError(#[from] pub ApiError);

pub fn summarize(
    fixed_income: &[FixedEntry],
    fixed_expenses: &[FixedEntry],
    recurring_income: &[RecurringEntry],
    recurring_expenses: &[RecurringEntry],
    goals: &[ProfitGoal],
) -> FinanceSummary {
    let fixed_income: f64 = fixed_income.iter().map(|e| e.amount).sum();
    let fixed_expenses: f64 = fixed_expenses.iter().map(|e| e.amount).sum();
    let recurring_income: f64 = recurring_income.iter().map(|e| e.amount).sum();
    let recurring_expenses: f64 = recurring_expenses.iter().map(|e| e.amount).sum();

    let total_income = fixed_income + recurring_income;
    let total_expenses = fixed_expenses + recurring_expenses;
    let net_profit = total_income - total_expenses;
    let profit_goal = goals.first().map(|g| g.target_profit).unwrap_or(0.0);
    let goal_progress = (profit_goal != 0.0).then(|| net_profit * 100.0 / profit_goal);

    FinanceSummary {
        fixed_income,
        recurring_income,
        fixed_expenses,
        recurring_expenses,
        total_income,
        total_expenses,
        net_profit,
        profit_goal,
        goal_progress,
    }
}

/// Fetches all five collections concurrently and summarizes them.
///
/// Any failed fetch fails the whole summary.
pub async fn fetch_summary(client: &ApiClient) -> Result<FinanceSummary, SummaryError> {
    fetch_summary_with(client, ExpenseScope::All).await
}

/// Like [`fetch_summary`], restricting expenses to `scope`.
///
/// Every fetch goes through `client`, so the bearer token is attached
/// according to its [`CredentialPolicy`](crate::sync::CredentialPolicy),
/// the same as for the resource controllers.
pub async fn fetch_summary_with(
    client: &ApiClient,
    scope: ExpenseScope,
) -> Result<FinanceSummary, SummaryError> {
    let recurring_expenses = async {
        match scope {
            ExpenseScope::All => {
                client
                    .list::<RecurringEntry>(ResourceKind::RecurringExpenses)
                    .await
            }
            ExpenseScope::FixedOnly => Ok(Vec::new()),
        }
    };

    let (fixed_income, fixed_expenses, recurring_income, recurring_expenses, goals) = tokio::try_join!(
        client.list::<FixedEntry>(ResourceKind::FixedIncome),
        client.list::<FixedEntry>(ResourceKind::FixedExpenses),
        client.list::<RecurringEntry>(ResourceKind::RecurringIncome),
        recurring_expenses,
        client.list::<ProfitGoal>(ResourceKind::ProfitGoals),
    )
    .map_err(|e| {
        tracing::warn!("Dashboard fetch failed: {}", e);
        SummaryError(e)
    })?;

    Ok(summarize(
        &fixed_income,
        &fixed_expenses,
        &recurring_income,
        &recurring_expenses,
        &goals,
    ))
}
