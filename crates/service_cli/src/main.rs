//! amlctl - Command Line Client for AML Regulatory Reporting
//!
//! Validates UAE Central Bank / goAML regulatory reports against the
//! reporting backend and submits the ones that pass.
//!
//! # Commands
//!
//! - `amlctl validate <id>...` - Run backend validation and show findings
//! - `amlctl submit <id>` - Validate, gate and submit one report
//! - `amlctl submit-batch <id>... [--all-drafts]` - Submit a selection in one batch
//! - `amlctl comment <id> <text>` - Add an internal or regulatory comment
//! - `amlctl attach <id> <file>` - Upload supporting evidence
//! - `amlctl update <id>` - Edit a report that has not been submitted
//! - `amlctl list` - Show the report store
//! - `amlctl goaml-status` - Check the goAML bridge
//!
//! # Configuration
//!
//! Settings come from CLI flags, then `AML_*` environment variables, then the
//! TOML file given with `--config`, then defaults.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use report_core::ReportStatus;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;

pub use error::{CliError, Result};

use config::{build_config, CliArgs};

/// AML regulatory reporting client
#[derive(Parser)]
#[command(name = "amlctl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path (TOML format)
    #[arg(short, long, global = true, value_name = "FILE", env = "AML_CONFIG")]
    config: Option<PathBuf>,

    /// Reporting backend base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Bearer token for the reporting backend
    #[arg(long, global = true)]
    api_token: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Validation calls in flight during a batch
    #[arg(long, global = true)]
    concurrency: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Actor recorded against comments and audit events
    #[arg(long, global = true, env = "AML_ACTOR", default_value = "amlctl")]
    actor: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Run backend validation and show findings
    Validate {
        /// Report ids
        #[arg(required = true)]
        report_ids: Vec<String>,
    },

    /// Validate, gate and submit one report
    Submit {
        /// Report id
        report_id: String,
    },

    /// Validate a selection concurrently and submit the eligible reports together
    SubmitBatch {
        /// Report ids
        report_ids: Vec<String>,

        /// Also select every draft and pending-approval report
        #[arg(long)]
        all_drafts: bool,
    },

    /// Add a comment to a report
    Comment {
        /// Report id
        report_id: String,

        /// Comment text
        text: String,

        /// Mark the comment as regulatory instead of internal
        #[arg(long)]
        regulatory: bool,
    },

    /// Upload a file against a report
    Attach {
        /// Report id
        report_id: String,

        /// File to upload
        file: PathBuf,

        /// MIME type sent with the file
        #[arg(long)]
        content_type: Option<String>,
    },

    /// Edit a report that has not been submitted yet
    Update {
        /// Report id
        report_id: String,

        /// JSON file with the replacement report data
        #[arg(long, value_name = "FILE")]
        data_file: Option<PathBuf>,

        /// New reporting period start (RFC 3339)
        #[arg(long)]
        period_start: Option<DateTime<Utc>>,

        /// New reporting period end (RFC 3339)
        #[arg(long)]
        period_end: Option<DateTime<Utc>>,
    },

    /// List reports
    List {
        /// Only reports in this status
        #[arg(long)]
        status: Option<ReportStatus>,
    },

    /// Check goAML bridge connectivity
    GoamlStatus,
}

impl From<&Cli> for CliArgs {
    fn from(cli: &Cli) -> Self {
        CliArgs {
            config_file: cli.config.clone(),
            base_url: cli.base_url.clone(),
            api_token: cli.api_token.clone(),
            request_timeout_secs: cli.timeout_secs,
            max_concurrent_validations: cli.concurrency,
            log_level: cli.log_level.clone(),
        }
    }
}

fn init_tracing(log_level: &str, format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = build_config(&CliArgs::from(&cli))?;
    init_tracing(config.log_level.as_filter_str(), cli.log_format);

    info!(
        base_url = %config.base_url,
        environment = %config.environment,
        timeout_secs = config.request_timeout_secs,
        max_concurrent_validations = config.max_concurrent_validations,
        "Configuration loaded"
    );

    let actor = cli.actor.as_str();
    match &cli.command {
        Commands::Validate { report_ids } => commands::validate::run(&config, actor, report_ids).await,
        Commands::Submit { report_id } => commands::submit::run(&config, actor, report_id).await,
        Commands::SubmitBatch {
            report_ids,
            all_drafts,
        } => commands::batch::run(&config, actor, report_ids, *all_drafts).await,
        Commands::Comment {
            report_id,
            text,
            regulatory,
        } => commands::comment::run(&config, actor, report_id, text, *regulatory).await,
        Commands::Attach {
            report_id,
            file,
            content_type,
        } => {
            commands::attach::run(&config, actor, report_id, file, content_type.as_deref()).await
        }
        Commands::Update {
            report_id,
            data_file,
            period_start,
            period_end,
        } => {
            commands::update::run(
                &config,
                actor,
                report_id,
                data_file.as_deref(),
                *period_start,
                *period_end,
            )
            .await
        }
        Commands::List { status } => commands::list::run(&config, actor, *status).await,
        Commands::GoamlStatus => commands::status::run(&config, actor).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
