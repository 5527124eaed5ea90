//! Default values and constants for all configuration settings.
//!
//! Contains all `DEFAULT_*` constants, the CPU helper used to size the
//! worker pool, and the `ConfigFile::default()` implementation.

use std::path::PathBuf;

use super::settings::*;
use crate::partition::NamingScheme;

// =============================================================================
// CPU helpers
// =============================================================================

/// Get the number of available CPU cores.
pub fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

// =============================================================================
// Output
// =============================================================================

/// Directory that receives the per-task files.
pub const DEFAULT_OUTPUT_DIR: &str = "perm_output";

/// File that receives the merged records.
pub const DEFAULT_COMBINED_FILE: &str = "combined_permutations.txt";

/// Per-task file naming.
pub const DEFAULT_NAMING: NamingScheme = NamingScheme::Element;

// =============================================================================
// Workers
// =============================================================================

/// Worker cap; `0` sizes the pool from the available CPUs.
pub const DEFAULT_MAX_WORKERS: usize = 0;

/// Upper bound accepted for an explicit worker cap.
pub const MAX_WORKERS_LIMIT: usize = 1024;

// =============================================================================
// Logging
// =============================================================================

/// Log file name inside the config directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "permshard.log";

impl Default for ConfigFile {
    fn default() -> Self {
        let config_dir = super::file::config_directory();

        Self {
            output: OutputSettings {
                directory: PathBuf::from(DEFAULT_OUTPUT_DIR),
                combined_file: PathBuf::from(DEFAULT_COMBINED_FILE),
                naming: DEFAULT_NAMING,
            },
            workers: WorkerSettings {
                max_workers: DEFAULT_MAX_WORKERS,
            },
            logging: LoggingSettings {
                file: config_dir.join(DEFAULT_LOG_FILE_NAME),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_cpus_is_positive() {
        assert!(num_cpus() >= 1);
    }

    #[test]
    fn test_default_config_values() {
        let config = ConfigFile::default();
        assert_eq!(config.output.directory, PathBuf::from("perm_output"));
        assert_eq!(
            config.output.combined_file,
            PathBuf::from("combined_permutations.txt")
        );
        assert_eq!(config.output.naming, NamingScheme::Element);
        assert_eq!(config.workers.max_workers, 0);
        assert!(config.logging.file.ends_with("permshard.log"));
    }
}
