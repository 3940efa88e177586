//! Library backing the `cress-check` command.
//!
//! The checker finds feature files, parses each one with `cress-gherkin`
//! and reports either the document's structure or the syntax error that
//! stopped it. Configuration comes from the environment and the command
//! line; logging goes to stderr through `tracing`.

pub mod config;
pub mod discovery;
pub mod error;
pub mod logging;
pub mod output;
pub mod report;

use std::path::PathBuf;

use crate::config::CheckConfig;
use crate::error::CheckError;
use crate::report::FileReport;

/// Check every feature file named by `paths`.
///
/// Reports come back in path order. A file that fails to parse yields a
/// failing report rather than an error.
///
/// # Errors
///
/// Returns a [`CheckError`] when a path is missing or cannot be walked.
pub fn check_paths(
    paths: &[PathBuf],
    config: &CheckConfig,
    expand: bool,
) -> Result<Vec<FileReport>, CheckError> {
    let options = config.parse_options();
    let files = discovery::feature_files(paths)?;
    tracing::info!(files = files.len(), "checking feature files");
    Ok(files
        .iter()
        .map(|file| FileReport::check(file, &options, expand))
        .collect())
}
