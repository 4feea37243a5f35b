use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use loan_ui::profile::{self, LoanSettings};
use loan_ui::{AppConfig, app, logging};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Business loan intake.
///
/// Runs the EMI calculator, submits an application profile to the loan API
/// and uploads its supporting documents.
#[derive(Debug, Parser)]
struct Cli {
    /// TOML configuration file. Every setting has a default.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Backend to talk to (`http` or `memory`).
    #[arg(long)]
    backend: Option<String>,

    /// Base URL of the loan API.
    #[arg(long, env = "LOANYFY_API_BASE")]
    api_base: Option<String>,

    /// Log level or full filter directive, e.g. `debug` or `info,loan_ui=trace`.
    #[arg(long)]
    log_level: Option<String>,

    /// Append log output to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the monthly installment, total interest and total payable.
    Calc {
        /// Loan amount in rupees.
        #[arg(long)]
        principal: Option<f64>,

        /// Tenure in months.
        #[arg(long)]
        term: Option<f64>,

        /// Annual interest rate in percent.
        #[arg(long)]
        rate: Option<f64>,
    },

    /// Submit the application described by a profile file and upload its documents.
    Apply {
        /// Path to the profile TOML.
        profile: PathBuf,
    },

    /// Check that the backend is reachable.
    Ping,
}

// ─── configuration ───────────────────────────────────────────────────────────

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("loading config from '{}'", path.display()))?,
        None => AppConfig::default(),
    };

    if let Some(backend) = &cli.backend {
        config.client.backend = backend.clone();
    }
    if let Some(base_url) = &cli.api_base {
        config.client.base_url = base_url.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log.level = Some(level.clone());
    }
    if let Some(file) = &cli.log_file {
        config.log.file = Some(file.clone());
    }

    Ok(config)
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    logging::init(&config.log)?;

    match cli.command {
        Command::Calc {
            principal,
            term,
            rate,
        } => {
            let state = app::calculate(&LoanSettings {
                principal,
                term_months: term,
                annual_rate_percent: rate,
            })?;
            println!("{}", app::CalculatorSummary(&state));
        }
        Command::Apply { profile: path } => {
            let profile = profile::load_from_file(&path)?;
            let base_dir = path.parent().unwrap_or(Path::new("."));

            debug!("connecting to {} backend", config.client.backend);
            let registry = app::build_registry();
            let client = app::connect(&registry, &config.client).await?;

            let report = app::apply(client, config.timeouts.clone(), &profile, base_dir).await?;
            info!(
                id = ?report.application_id,
                files = report.uploaded_files,
                "application complete"
            );
            println!("{report}");
        }
        Command::Ping => {
            let registry = app::build_registry();
            let client = app::connect(&registry, &config.client).await?;
            app::ping(client.as_ref()).await?;
            println!("{} backend at {} is up", config.client.backend, config.client.base_url);
        }
    }

    Ok(())
}
