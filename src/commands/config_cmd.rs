use clap::{Args, Subcommand};

use super::resource::OutputFormat;
use finsync::config::Config;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                let mut shown = config.clone();
                shown.auth.token = shown.auth.token.as_deref().map(mask_token);

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&shown)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        if let Some(path) = &shown.config_file {
                            println!("Config file: {}", path.display());
                        } else {
                            println!(
                                "Config file: {} (not found)",
                                Config::default_config_path().display()
                            );
                        }
                        println!();

                        println!("api_url: {}", shown.api_url.value);
                        println!("  source: {}", shown.api_url.source);
                        println!();

                        println!("privileged_role: {}", shown.privileged_role.value);
                        println!("  source: {}", shown.privileged_role.source);
                        println!();

                        println!("bearer_all_resources: {}", shown.bearer_all_resources.value);
                        println!("  source: {}", shown.bearer_all_resources.source);
                        println!();

                        println!("auth:");
                        println!("  token: {}", shown.auth.token.as_deref().unwrap_or("(not set)"));
                        println!(
                            "  user_id: {}",
                            shown.auth.user_id.as_deref().unwrap_or("(not set)")
                        );
                        println!("  role: {}", shown.auth.role.as_deref().unwrap_or("(not set)"));
                    }
                }
                Ok(())
            }
        }
    }
}

/// Keeps the last four characters of a token.
fn mask_token(token: &str) -> String {
    let count = token.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = token.chars().skip(count - 4).collect();
    format!("{}{}", "*".repeat(count - 4), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("abcdefgh"), "****efgh");
        assert_eq!(mask_token("abc"), "***");
        assert_eq!(mask_token(""), "");
    }
}
