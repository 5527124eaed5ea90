//! Pipeline run configuration.

use std::path::{Path, PathBuf};

use super::defaults::{
    DEFAULT_COMBINED_FILE, DEFAULT_MAX_WORKERS, DEFAULT_NAMING, DEFAULT_OUTPUT_DIR,
};
use super::settings::ConfigFile;
use crate::partition::NamingScheme;

/// Configuration for one pipeline run.
///
/// Groups the output locations, naming scheme and worker cap, providing the
/// defaults of the reference run while allowing customization.
///
/// # Example
///
/// ```
/// use permshard::config::PipelineConfig;
/// use permshard::partition::NamingScheme;
///
/// // Using defaults
/// let config = PipelineConfig::default();
/// assert_eq!(config.output_dir().to_str(), Some("perm_output"));
/// assert_eq!(config.max_workers(), 0);
///
/// // Custom configuration
/// let config = PipelineConfig::new()
///     .with_output_dir("/tmp/perms")
///     .with_naming(NamingScheme::Index)
///     .with_max_workers(4);
/// assert_eq!(config.max_workers(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Directory for per-task files
    output_dir: PathBuf,
    /// Combined output file
    combined_file: PathBuf,
    /// Per-task file naming
    naming: NamingScheme,
    /// Worker cap, 0 for automatic
    max_workers: usize,
}

impl PipelineConfig {
    /// Create a new pipeline configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from the values in a loaded config file.
    pub fn from_config_file(config: &ConfigFile) -> Self {
        Self {
            output_dir: config.output.directory.clone(),
            combined_file: config.output.combined_file.clone(),
            naming: config.output.naming,
            max_workers: config.workers.max_workers,
        }
    }

    /// Set the directory that receives per-task files.
    ///
    /// Default: `perm_output`.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the combined output file.
    ///
    /// Default: `combined_permutations.txt`.
    pub fn with_combined_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.combined_file = file.into();
        self
    }

    /// Set the per-task file naming scheme.
    pub fn with_naming(mut self, naming: NamingScheme) -> Self {
        self.naming = naming;
        self
    }

    /// Cap the number of worker threads.
    ///
    /// `0` uses one worker per available CPU. The pool never starts more
    /// workers than there are tasks.
    pub fn with_max_workers(mut self, workers: usize) -> Self {
        self.max_workers = workers;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn combined_file(&self) -> &Path {
        &self.combined_file
    }

    pub fn naming(&self) -> NamingScheme {
        self.naming
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            combined_file: PathBuf::from(DEFAULT_COMBINED_FILE),
            naming: DEFAULT_NAMING,
            max_workers: DEFAULT_MAX_WORKERS,
        }
    }
}
