//! SferaNet CLI - push customers, practices and payments to SferaNet
//!
//! A command-line bridge to the SferaNet booking backend and the FacileWS
//! customer registry.

mod api;
mod auth;
mod config;
mod error;
mod logging;
mod models;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;

use api::{ApiResponse, SferanetClient};
use auth::{is_valid, TokenKind, TokenStore};
use config::Config;

#[derive(Parser)]
#[command(name = "sferanet-cli")]
#[command(about = "Command-line client for the SferaNet booking backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also write a daily log file into this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or update agency settings
    Settings {
        #[arg(long)]
        agency_code: Option<String>,
        #[arg(long)]
        agency_id: Option<String>,
        #[arg(long)]
        attachment_type_id: Option<String>,
        #[arg(long)]
        capture_type: Option<String>,
    },

    /// Refresh both tokens if they are close to expiry
    Login,

    /// Show token status
    Status,

    #[command(flatten)]
    Operation(Operation),
}

/// Commands that call a backend and print an `ApiResponse`
#[derive(Subcommand)]
enum Operation {
    /// List SferaNet accounts
    Accounts,

    /// Look a customer up on FacileWS
    Lookup {
        /// Fiscal code, or VAT number with --business
        id: String,

        #[arg(long)]
        business: bool,
    },

    /// Create a customer account from a JSON file
    CreateAccount { customer: PathBuf },

    /// Create a work-in-progress practice for a contractor (JSON file)
    CreatePractice {
        contractor: PathBuf,

        /// Practice description, shown on the invoice
        #[arg(short, long)]
        description: String,
    },

    /// Add a passenger (JSON file) to a practice
    AddPassenger { practice_id: u64, passenger: PathBuf },

    /// Add a service (JSON file), optionally linked to a practice
    AddService {
        service: PathBuf,

        #[arg(long)]
        practice: Option<u64>,
    },

    /// Add a quote for the sold units (JSON array) of a service
    AddQuote {
        service_id: u64,
        sold_services: PathBuf,

        #[arg(short, long, default_value = "Quota servizio")]
        description: String,
    },

    /// Record a financial movement (JSON file) on a practice
    AddMovement {
        practice_id: u64,
        transaction: PathBuf,

        /// Order id used as external id
        #[arg(long)]
        order_id: Option<String>,
    },

    /// Upload documents to a practice
    AddAttachments {
        practice_id: u64,

        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Mark a practice as fully inserted
    FinalizePractice { practice_id: u64 },
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(p) => Config::load_from(p),
        None => Config::load(),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Print a gateway response; failure maps to a non-zero exit code.
fn report(response: &ApiResponse) -> Result<ExitCode> {
    println!("{}", serde_json::to_string_pretty(response)?);
    Ok(if response.status {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn token_status(config: &Config, kind: TokenKind) -> &'static str {
    match config.get_option(kind.option_key()) {
        Some(token) if is_valid(Some(&token)) => "valid",
        Some(_) => "expired",
        None => "none",
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let _guard = logging::init(cli.verbose, cli.log_dir.as_deref());

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Settings {
            agency_code,
            agency_id,
            attachment_type_id,
            capture_type,
        } => {
            let mut config = config;
            let changed = agency_code.is_some()
                || agency_id.is_some()
                || attachment_type_id.is_some()
                || capture_type.is_some();
            let settings = &mut config.settings;
            if let Some(v) = agency_code {
                settings.agency_code = v;
            }
            if let Some(v) = agency_id {
                settings.agency_id = v;
            }
            if let Some(v) = attachment_type_id {
                settings.attachment_type_id = v;
            }
            if let Some(v) = capture_type {
                settings.capture_type = v;
            }
            if changed {
                config.save()?;
                tracing::info!("Settings saved");
            }
            print!("{}", toml::to_string_pretty(&config.settings)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Status => {
            println!("SferaNet token: {}", token_status(&config, TokenKind::Primary));
            println!("FacileWS token: {}", token_status(&config, TokenKind::Secondary));
            if config.settings.agency_code.is_empty() {
                println!("\nAgency code not set. Run 'sferanet-cli settings --agency-code <CODE>'.");
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Login => login(SferanetClient::from_config(config)).await,
        Commands::Operation(operation) => {
            run_operation(SferanetClient::from_config(config), operation).await
        }
    }
}

/// Refresh both tokens. A FacileWS transport failure aborts with an error.
async fn login(mut client: SferanetClient) -> Result<ExitCode> {
    let tokens = client.tokens_mut();
    tokens.ensure_valid(TokenKind::Primary).await?;
    tokens.ensure_valid(TokenKind::Secondary).await?;

    let mut ok = true;
    for kind in [TokenKind::Primary, TokenKind::Secondary] {
        let valid = is_valid(tokens.get_token(kind).as_deref());
        println!("{} token: {}", kind.label(), if valid { "valid" } else { "missing" });
        ok &= valid;
    }
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

async fn run_operation(mut client: SferanetClient, operation: Operation) -> Result<ExitCode> {
    if client.settings().agency_code.is_empty() {
        tracing::warn!("Agency code is not configured");
    }

    let response = match operation {
        Operation::Accounts => api::list_accounts(&mut client).await?,
        Operation::Lookup { id, business } => {
            api::lookup_customer(&mut client, &id, business).await?
        }
        Operation::CreateAccount { customer } => {
            api::create_account(&mut client, &read_json(&customer)?).await?
        }
        Operation::CreatePractice {
            contractor,
            description,
        } => {
            let practice = models::PracticeData { description };
            api::create_practice(&mut client, &read_json(&contractor)?, &practice).await?
        }
        Operation::AddPassenger {
            practice_id,
            passenger,
        } => api::add_passenger(&mut client, &read_json(&passenger)?, practice_id).await?,
        Operation::AddService { service, practice } => {
            api::add_service(&mut client, &read_json(&service)?, practice).await?
        }
        Operation::AddQuote {
            service_id,
            sold_services,
            description,
        } => {
            let sold: Vec<models::SoldService> = read_json(&sold_services)?;
            api::add_quote(&mut client, &sold, service_id, &description).await?
        }
        Operation::AddMovement {
            practice_id,
            transaction,
            order_id,
        } => {
            api::add_financial_transaction(
                &mut client,
                &read_json(&transaction)?,
                practice_id,
                order_id.as_deref(),
            )
            .await?
        }
        Operation::AddAttachments { practice_id, urls } => {
            api::add_attachments(&mut client, &urls, practice_id).await?
        }
        Operation::FinalizePractice { practice_id } => {
            api::finalize_practice(&mut client, practice_id).await?
        }
    };

    report(&response)
}
