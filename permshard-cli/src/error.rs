//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use permshard::config::ConfigFileError;
use permshard::{PipelineError, StorageError, WorkerError};
use std::fmt;
use std::process;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Invalid command-line input
    InvalidArgs(String),
    /// The pipeline run failed
    Pipeline(PipelineError),
    /// Reading a file for verification failed
    Storage(StorageError),
    /// The combined output did not pass verification
    VerificationFailed(String),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Pipeline(PipelineError::Storage(StorageError::NotADirectory { .. })) => {
                eprintln!();
                eprintln!("The output directory path is taken by a file.");
                eprintln!("Remove it or pass a different --output-dir.");
            }
            CliError::Pipeline(PipelineError::Worker(WorkerError::Task { .. })) => {
                eprintln!();
                eprintln!("Per-task files written before the failure were left in place.");
                eprintln!("Clear the output directory before running again.");
            }
            CliError::Pipeline(PipelineError::InvalidInput(_)) => {
                eprintln!();
                eprintln!("Elements must be distinct, non-empty, and free of brackets,");
                eprintln!("\", \" and line breaks. Use --naming index when element text");
                eprintln!("is not usable as a file name.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::InvalidArgs(msg) => write!(f, "Invalid arguments: {}", msg),
            CliError::Pipeline(e) => write!(f, "Permutation run failed: {}", e),
            CliError::Storage(e) => write!(f, "{}", e),
            CliError::VerificationFailed(msg) => write!(f, "Verification failed: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Pipeline(e) => Some(e),
            CliError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PipelineError> for CliError {
    fn from(e: PipelineError) -> Self {
        CliError::Pipeline(e)
    }
}

impl From<StorageError> for CliError {
    fn from(e: StorageError) -> Self {
        CliError::Storage(e)
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}
