//! Coverwise CLI
//!
//! Command-line interface for Coverwise operations:
//! - Submit a quote through the wizard steps
//! - Send a test notification email
//! - Check server health
//! - Inspect guard decisions and category lookups
//! - Generate a config file

use clap::{Parser, Subcommand, ValueEnum};
use coverwise::auth::{evaluate, GuardConfig, GuardDecision};
use coverwise::config::Config;
use coverwise::content::BlogCategory;
use coverwise::email::format_currency;
use coverwise::quote::{
    ContactDetails, Gender, HealthStatus, StepInput, TermLength, WizardState,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "coverwise")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Coverwise quote intake tools")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:8080", global = true)]
    pub api_url: String,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum GenderArg {
    Male,
    Female,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum HealthArg {
    Excellent,
    Good,
    Fair,
    Poor,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Walk the quote wizard and submit the result
    Submit {
        #[arg(long, value_enum)]
        gender: Option<GenderArg>,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: Option<String>,
        #[arg(long, value_enum)]
        health: Option<HealthArg>,
        /// Coverage amount in dollars
        #[arg(long)]
        coverage: Option<f64>,
        /// Term length in years (10, 20 or 30)
        #[arg(long)]
        term: Option<u8>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },

    /// Send a sample quote notification through the server
    SendTestEmail {
        #[arg(long, default_value = "Test")]
        first_name: String,
        #[arg(long, default_value = "Applicant")]
        last_name: String,
        #[arg(long, default_value = "test@example.com")]
        email: String,
        #[arg(long, default_value = "250000")]
        coverage: f64,
        #[arg(long, default_value = "20")]
        term: String,
    },

    /// Show server health
    Health,

    /// Show what the routing guard does with a path
    CheckRoute {
        path: String,
        /// Evaluate as a signed-in visitor
        #[arg(long)]
        session: bool,
        /// Config file with a [guard] section
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show icon and fallback image for a blog category label
    Category { label: String },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Submit {
            gender,
            dob,
            health,
            coverage,
            term,
            first_name,
            last_name,
            email,
            phone,
        } => {
            let mut wizard = WizardState::new();

            if let Some(gender) = gender {
                wizard.apply(StepInput::Gender(match gender {
                    GenderArg::Male => Gender::Male,
                    GenderArg::Female => Gender::Female,
                }));
            }
            if let Some(dob) = dob {
                let date = chrono::NaiveDate::parse_from_str(&dob, "%Y-%m-%d")
                    .map_err(|e| format!("Invalid date of birth {}: {}", dob, e))?;
                wizard.apply(StepInput::DateOfBirth(date));
            }
            if let Some(health) = health {
                wizard.apply(StepInput::HealthStatus(match health {
                    HealthArg::Excellent => HealthStatus::Excellent,
                    HealthArg::Good => HealthStatus::Good,
                    HealthArg::Fair => HealthStatus::Fair,
                    HealthArg::Poor => HealthStatus::Poor,
                }));
            }
            if let Some(coverage) = coverage {
                wizard.apply(StepInput::CoverageAmount(coverage));
            }
            if let Some(term) = term {
                wizard.apply(StepInput::TermLength(TermLength::try_from(term)?));
            }
            if first_name.is_some() || last_name.is_some() || email.is_some() || phone.is_some() {
                wizard.apply(StepInput::Contact(ContactDetails {
                    first_name: first_name.unwrap_or_default(),
                    last_name: last_name.unwrap_or_default(),
                    email: email.unwrap_or_default(),
                    phone: phone.unwrap_or_default(),
                }));
            }

            let progress = wizard.progress();
            println!(
                "Wizard: {}/{} steps ({}%), at \"{}\"",
                progress.completed,
                progress.total,
                progress.percent(),
                wizard.current_step().title()
            );
            if !wizard.is_complete() {
                println!("Submitting a partial quote");
            }

            let response = client
                .post(format!("{}/api/quotes", cli.api_url))
                .json(&wizard.into_submission())
                .send()
                .await?;

            if response.status().is_success() {
                let body: serde_json::Value = response.json().await?;
                println!(
                    "Stored quote {}",
                    body["data"][0]["id"].as_str().unwrap_or("-")
                );
            } else {
                let status = response.status();
                let text = response.text().await.unwrap_or_default();
                eprintln!("Submit failed ({}): {}", status, text);
                std::process::exit(1);
            }
        }

        Commands::SendTestEmail {
            first_name,
            last_name,
            email,
            coverage,
            term,
        } => {
            let body = serde_json::json!({
                "firstName": first_name,
                "lastName": last_name,
                "email": email,
                "coverageAmount": coverage,
                "coverageType": "Term Life",
                "termLength": term,
            });

            let response = client
                .post(format!("{}/api/send-email", cli.api_url))
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            let body: serde_json::Value = response.json().await.unwrap_or_default();

            if status.is_success() {
                println!(
                    "Sent notification for {} ({})",
                    email,
                    format_currency(coverage)
                );
                println!("  Id: {}", body["data"]["id"].as_str().unwrap_or("-"));
            } else {
                eprintln!("Send failed ({}): {}", status, body["error"]);
                std::process::exit(1);
            }
        }

        Commands::Health => {
            let response = client
                .get(format!("{}/health", cli.api_url))
                .send()
                .await;

            match response {
                Ok(resp) if resp.status().is_success() => {
                    let health: serde_json::Value = resp.json().await?;

                    println!(
                        "Coverwise v{}",
                        health["version"].as_str().unwrap_or("unknown")
                    );
                    println!();
                    println!(
                        "API Status: {}",
                        health["status"].as_str().unwrap_or("unknown")
                    );
                    println!(
                        "  Store: {} ({})",
                        health["store"].as_str().unwrap_or("-"),
                        health["store_status"].as_str().unwrap_or("unknown")
                    );
                    println!("  Auth:  {}", health["auth"].as_str().unwrap_or("-"));
                    println!("  Email: {}", health["email"].as_str().unwrap_or("-"));

                    if let Some(uptime) = health["uptime_seconds"].as_u64() {
                        println!();
                        println!("Uptime: {}", format_duration(uptime));
                    }
                }
                Ok(resp) => {
                    eprintln!("API returned error: {}", resp.status());
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Cannot connect to Coverwise API at {}", cli.api_url);
                    eprintln!("Error: {}", e);
                    eprintln!();
                    eprintln!("Make sure the Coverwise server is running:");
                    eprintln!("  cargo run --bin coverwise -- --in-memory");
                    std::process::exit(1);
                }
            }
        }

        Commands::CheckRoute {
            path,
            session,
            config,
        } => {
            let guard = match config {
                Some(file) => Config::load(&file)?.guard,
                None => GuardConfig::default(),
            };

            match evaluate(&guard, session, &path) {
                GuardDecision::Pass => println!("{} -> pass", path),
                GuardDecision::Redirect(to) => println!("{} -> redirect {}", path, to),
            }
        }

        Commands::Category { label } => {
            let category = BlogCategory::from_label(&label);
            println!("Category: {}", category.label());
            println!("  Icon:  {}", category.icon());
            println!("  Image: {}", category.fallback_image());
        }

        Commands::Config { output } => {
            let config = coverwise::config::generate_default_config();

            match output {
                Some(path) => {
                    // Create parent directory if needed
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}
