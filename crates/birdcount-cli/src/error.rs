//! Application-wide error types using thiserror.

use birdcount_common::BirdcountError;
use std::path::PathBuf;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum CliError {
    /// Configuration, parsing, pipeline or rendering error.
    #[error(transparent)]
    Birdcount(#[from] BirdcountError),

    /// The sensor log held no usable readings.
    #[error("No readable samples in {}", .0.display())]
    NoData(PathBuf),

    /// Standard input ended before a prompt was answered.
    #[error("Input closed while asking for {0}")]
    InputClosed(&'static str),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A blocking task panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Result type for the command line application.
pub type CliResult<T> = Result<T, CliError>;
