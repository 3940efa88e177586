//! Command line checker for Gherkin feature files.
//!
//! Exits with status 0 when every file parses, 1 when any file fails and 2
//! when the configuration is invalid.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use eyre::{Context, Result};

use cress_check::check_paths;
use cress_check::config::{CheckConfig, LogLevel};
use cress_check::error::CheckError;
use cress_check::logging::init_logging;
use cress_check::output::{OutputFormat, write_reports};

/// Parse Gherkin feature files and report their structure or syntax errors.
#[derive(Parser, Debug)]
#[command(name = "cress-check", version, about)]
struct Args {
    /// Language for documents without a `# language:` header.
    #[arg(long)]
    language: Option<String>,
    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// List the resolved steps of every example.
    #[arg(long)]
    expand: bool,
    /// Log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<LogLevel>,
    /// Feature files or directories to search for `*.feature` files.
    #[arg(required = true)]
    paths: Vec<PathBuf>,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            init_logging(&CheckConfig::default());
            tracing::error!(error = %e, "invalid configuration");
            return Ok(ExitCode::from(2));
        }
    };
    init_logging(&config);

    let reports = check_paths(&args.paths, &config, args.expand)?;
    let mut stdout = io::stdout().lock();
    write_reports(&mut stdout, &reports, args.format)?;
    stdout.flush().wrap_err("failed to flush check report")?;

    if reports.iter().all(cress_check::report::FileReport::is_ok) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn build_config(args: &Args) -> Result<CheckConfig, CheckError> {
    let config = CheckConfig::from_env()?;
    Ok(config.apply_overrides(args.log_level, args.language.clone()))
}
