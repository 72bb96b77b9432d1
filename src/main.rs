use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

use commands::{ConfigCommand, DashboardCommand, ResourceCommand};
use finsync::{ApiClient, Config, IdentityProvider, ResourceController};

#[derive(Parser)]
#[command(name = "finsync")]
#[command(version)]
#[command(about = "Track income, expenses and profit goals on a FinSync server", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage one-off income
    Income(ResourceCommand),

    /// Manage one-off expenses
    Expenses(ResourceCommand),

    /// Manage recurring income
    RecurringIncome(ResourceCommand),

    /// Manage recurring expenses
    RecurringExpenses(ResourceCommand),

    /// Manage profit goals
    ProfitGoals(ResourceCommand),

    /// Show income, expense and profit totals
    Dashboard(DashboardCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "finsync=warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;

    let client = ApiClient::from_config(&config.api());
    let identity: Arc<dyn IdentityProvider> = Arc::new(config.identity());

    match cli.command {
        Some(Commands::Income(cmd)) => {
            cmd.run(ResourceController::fixed_income(client, identity)).await?;
        }
        Some(Commands::Expenses(cmd)) => {
            cmd.run(ResourceController::fixed_expenses(client, identity)).await?;
        }
        Some(Commands::RecurringIncome(cmd)) => {
            cmd.run(ResourceController::recurring_income(client, identity)).await?;
        }
        Some(Commands::RecurringExpenses(cmd)) => {
            cmd.run(ResourceController::recurring_expenses(client, identity)).await?;
        }
        Some(Commands::ProfitGoals(cmd)) => {
            cmd.run(ResourceController::profit_goals(client, identity)).await?;
        }
        Some(Commands::Dashboard(cmd)) => {
            cmd.run(&client).await?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
