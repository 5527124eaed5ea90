//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

use crate::partition::NamingScheme;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    /// Output locations and naming
    pub output: OutputSettings,
    /// Worker pool sizing
    pub workers: WorkerSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSettings {
    /// Directory for per-task files
    pub directory: PathBuf,
    /// Combined output file
    pub combined_file: PathBuf,
    /// Per-task file naming scheme
    pub naming: NamingScheme,
}

/// Worker pool configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerSettings {
    /// Maximum worker threads, 0 for one per CPU
    pub max_workers: usize,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
