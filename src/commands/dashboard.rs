use clap::Args;

use super::resource::OutputFormat;
use finsync::models::format_amount;
use finsync::summary::{fetch_summary_with, ExpenseScope};
use finsync::sync::ApiClient;

#[derive(Args)]
pub struct DashboardCommand {
    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Leave recurring expenses out of total expenses
    #[arg(long)]
    pub fixed_expenses_only: bool,
}

impl DashboardCommand {
    pub async fn run(&self, client: &ApiClient) -> Result<(), Box<dyn std::error::Error>> {
        let scope = if self.fixed_expenses_only {
            ExpenseScope::FixedOnly
        } else {
            ExpenseScope::All
        };
        let summary = fetch_summary_with(client, scope).await?;

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
            OutputFormat::Text => {
                println!("Dashboard");
                println!("=========\n");
                println!("Income:         {}", format_amount(summary.total_income));
                println!("  fixed:        {}", format_amount(summary.fixed_income));
                println!("  recurring:    {}", format_amount(summary.recurring_income));
                println!("Expenses:       {}", format_amount(summary.total_expenses));
                println!("  fixed:        {}", format_amount(summary.fixed_expenses));
                println!("  recurring:    {}", format_amount(summary.recurring_expenses));
                println!("Net profit:     {}", format_amount(summary.net_profit));
                println!();
                match summary.goal_progress {
                    Some(progress) => println!(
                        "Profit goal:    {} ({:.1}% reached)",
                        format_amount(summary.profit_goal),
                        progress
                    ),
                    None => println!("Profit goal:    not set"),
                }
            }
        }
        Ok(())
    }
}
