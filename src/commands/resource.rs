use clap::{Args, Subcommand, ValueEnum};
use std::fmt;
use std::io::{self, Write};

use finsync::identity::ConfirmGate;
use finsync::models::{Record, RecordId, ResourceKind};
use finsync::sync::{Notice, ResourceController};

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args)]
pub struct ResourceCommand {
    #[command(subcommand)]
    pub command: ResourceSubcommand,
}

#[derive(Subcommand)]
pub enum ResourceSubcommand {
    /// List all records
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show the form fields accepted by add and edit
    Fields,

    /// Create a new record
    Add {
        /// Field value, e.g. --set title=Rent (can be repeated)
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
        values: Vec<(String, String)>,
    },

    /// Update an existing record
    Edit {
        /// Record ID
        id: String,

        /// Field value to change (can be repeated)
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
        values: Vec<(String, String)>,
    },

    /// Delete a record
    Delete {
        /// Record ID
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

/// Asks on stdin; anything but `y` declines.
struct StdinConfirm;

impl ConfirmGate for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{} [y/N] ", prompt);
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(_) => input.trim().eq_ignore_ascii_case("y"),
            Err(_) => false,
        }
    }
}

impl ResourceCommand {
    pub async fn run<R>(
        &self,
        mut controller: ResourceController<R>,
    ) -> Result<(), Box<dyn std::error::Error>>
    where
        R: Record + fmt::Display,
    {
        let kind = controller.kind();
        match &self.command {
            ResourceSubcommand::List { format } => {
                controller.load().await?;
                let items = controller.items();

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(items)?);
                    }
                    OutputFormat::Text => {
                        if items.is_empty() {
                            println!("No {} found", kind.label());
                            return Ok(());
                        }
                        let rows: Vec<Vec<String>> = items.iter().map(|r| r.row()).collect();
                        print_table(R::headers(), &rows);
                        println!("\nTotal: {} record(s)", items.len());
                    }
                }
                Ok(())
            }

            ResourceSubcommand::Fields => {
                print_fields(kind);
                Ok(())
            }

            ResourceSubcommand::Add { values } => {
                let pairs: Vec<(&str, &str)> = values
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str()))
                    .collect();
                controller.begin_create(&pairs)?;
                controller.submit_create().await?;
                print_notice(controller.notice());
                Ok(())
            }

            ResourceSubcommand::Edit { id, values } => {
                let id = RecordId::new(id.as_str());
                controller.load().await?;
                controller.begin_edit_by_id(&id)?;
                for (field, value) in values {
                    controller.update_edit_draft(field, value.as_str())?;
                }
                controller.submit_update().await?;
                print_notice(controller.notice());
                if let Some(updated) = controller.find(&id) {
                    println!("{}", updated);
                }
                Ok(())
            }

            ResourceSubcommand::Delete { id, force } => {
                let id = RecordId::new(id.as_str());
                controller.load().await?;
                if let Some(record) = controller.find(&id) {
                    println!("{}", record);
                } else {
                    return Err(format!("No {} with id {}", kind.singular(), id).into());
                }

                let deleted = if *force {
                    controller.remove(&id, &|_: &str| true).await?
                } else {
                    controller.remove(&id, &StdinConfirm).await?
                };

                if deleted {
                    print_notice(controller.notice());
                } else {
                    println!("Deletion cancelled.");
                }
                Ok(())
            }
        }
    }
}

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => {
            Ok((field.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected FIELD=VALUE, got '{}'", s)),
    }
}

fn print_notice(notice: Option<&Notice>) {
    match notice {
        Some(Notice::Success(message)) => println!("{}", message),
        Some(Notice::Error(message)) => eprintln!("{}", message),
        None => {}
    }
}

fn print_fields(kind: ResourceKind) {
    println!(
        "{:<16}  {:<16}  {:<8}  {:<8}  DEFAULT",
        "FIELD", "WIRE NAME", "TYPE", "REQUIRED"
    );
    println!("{}", "-".repeat(64));
    for field in kind.fields() {
        println!(
            "{:<16}  {:<16}  {:<8}  {:<8}  {}",
            field.name,
            field.wire,
            format!("{:?}", field.kind).to_lowercase(),
            if field.required { "yes" } else { "no" },
            field.default
        );
    }
}

const MAX_CELL: usize = 30;

fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|c| truncate(c)).collect())
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            cells
                .iter()
                .filter_map(|row| row.get(i))
                .map(|c| c.chars().count())
                .chain(std::iter::once(h.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header_line: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| format!("{:<w$}", h.to_uppercase(), w = w))
        .collect();
    println!("{}", header_line.join("  ").trim_end());
    let rule = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    println!("{}", "-".repeat(rule));

    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<w$}", c, w = w))
            .collect();
        println!("{}", line.join("  ").trim_end());
    }
}

fn truncate(cell: &str) -> String {
    if cell.chars().count() > MAX_CELL {
        let head: String = cell.chars().take(MAX_CELL - 3).collect();
        format!("{}...", head)
    } else {
        cell.to_string()
    }
}
