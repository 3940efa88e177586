//! Error types for the checker.
//!
//! Parse failures are not errors at this level: they are collected into the
//! report for the file that produced them. These variants cover problems that
//! stop a run before any file is read.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while configuring or preparing a check run.
#[derive(Debug, Error)]
pub enum CheckError {
    /// An invalid configuration value was provided.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A path given on the command line does not exist.
    #[error("no such file or directory: {}", .0.display())]
    MissingPath(PathBuf),

    /// Walking a directory failed.
    #[error("failed to walk {}: {source}", .path.display())]
    Walk {
        /// Directory being walked.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: walkdir::Error,
    },
}
