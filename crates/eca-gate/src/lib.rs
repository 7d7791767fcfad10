//! ECA Gate - GitLab pre-receive hook
//!
//! Reads `<previous> <new> [ref]` from stdin and the repository from
//! `GL_REPOSITORY`, checks the commits the push introduces against the
//! Eclipse Contributor Agreement service, and exits non-zero to reject.
//!
//! Any failure outside the validation call itself prints a single generic
//! `GL-HOOK-ERR:` line and rejects the push.

use clap::Parser;
use std::ffi::OsString;
use std::io::Read;
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod client;
pub mod config;
mod error;
pub mod git;
mod output;
pub mod secret;

use crate::client::{EcaClient, GitLabClient};
use crate::config::{GateConfig, LoggingConfig};
use eca_gate_core::{Evaluation, Gate, GateError, PushEvent};
pub use error::{CliError, CliResult};
use crate::git::GitCli;

/// ECA Gate CLI
#[derive(Parser)]
#[command(name = "eca-gate")]
#[command(about = "ECA Gate - Eclipse Contributor Agreement pre-receive hook", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "ECA_GATE_CONFIG")]
    config: Option<String>,

    /// Repository to query (defaults to the working directory)
    #[arg(long)]
    git_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable JSON logging
    #[arg(long)]
    log_json: bool,
}

/// Run using the current process arguments; returns the exit code.
pub async fn run() -> i32 {
    run_with_args(std::env::args_os()).await
}

/// Run using the provided argument iterator; returns the exit code.
pub async fn run_with_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    let config = GateConfig::load(cli.config.as_deref());
    let logging = config
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_default();
    init_tracing(&cli, &logging);

    let result = match config {
        Ok(config) => execute(&cli, &config).await,
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(evaluation) => {
            output::print_evaluation(&evaluation);
            evaluation.outcome.exit_code()
        }
        Err(e) => {
            error!(error = %e, "ECA gate failed");
            output::print_fatal();
            1
        }
    }
}

fn init_tracing(cli: &Cli, logging: &LoggingConfig) {
    let filter = if cli.verbose {
        "debug".to_string()
    } else {
        logging.level.clone()
    };
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into());

    // stdout belongs to GitLab
    let _ = if cli.log_json || logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .without_time()
                    .with_ansi(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
}

async fn execute(cli: &Cli, config: &GateConfig) -> CliResult<Evaluation> {
    let token = secret::read_token(&config.gitlab.token_path)?;

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .map_err(|e| GateError::InvalidInput(format!("unable to read hook input: {}", e)))?;
    let push = PushEvent::parse(&input)?;

    let repository = std::env::var(&config.hook.repository_env).map_err(|_| {
        CliError::Config(format!("{} is not set", config.hook.repository_env))
    })?;

    let projects = GitLabClient::new(&config.gitlab.api_url, token, config.gitlab.timeout())?;
    let validator = EcaClient::new(&config.validation.url, config.validation.timeout())?;
    let vcs = match &cli.git_dir {
        Some(dir) => GitCli::in_dir(dir),
        None => GitCli::new(),
    };

    let gate = Gate::new(&vcs, &projects, &validator, config.settings());
    Ok(gate.evaluate(&repository, &push).await?)
}
