//! Configuration for permshard runs.
//!
//! Two layers, mirroring how values flow at runtime:
//!
//! - [`ConfigFile`]: the user's `~/.permshard/config.ini`, one struct per
//!   `[section]`, loaded with defaults for anything missing
//! - [`PipelineConfig`]: the resolved settings for a single run, built from
//!   defaults, a config file, or command-line overrides
//!
//! # Example
//!
//! ```
//! use permshard::config::{ConfigFile, PipelineConfig};
//!
//! let file = ConfigFile::default();
//! let config = PipelineConfig::from_config_file(&file).with_max_workers(2);
//! assert_eq!(config.max_workers(), 2);
//! ```

mod defaults;
mod file;
mod parser;
mod pipeline;
mod settings;
mod writer;

pub use defaults::{
    num_cpus, DEFAULT_COMBINED_FILE, DEFAULT_LOG_FILE_NAME, DEFAULT_MAX_WORKERS, DEFAULT_NAMING,
    DEFAULT_OUTPUT_DIR, MAX_WORKERS_LIMIT,
};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use pipeline::PipelineConfig;
pub use settings::{ConfigFile, LoggingSettings, OutputSettings, WorkerSettings};
