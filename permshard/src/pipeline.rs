//! End-to-end pipeline: partition, generate in parallel, merge in order.
//!
//! # Example
//!
//! ```no_run
//! use permshard::config::PipelineConfig;
//! use permshard::pipeline::Pipeline;
//! use permshard::sequence::InputSequence;
//!
//! let pipeline = Pipeline::new(PipelineConfig::default());
//! let report = pipeline.run(&InputSequence::reference())?;
//! println!("{}", report.summary());
//! # Ok::<(), permshard::error::PipelineError>(())
//! ```

use std::env;
use std::fmt::Display;
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{info, instrument};

use crate::combiner::{CombineSummary, Combiner};
use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::generator::{write_task, TaskOutput};
use crate::partition::Partitioner;
use crate::permute::factorial;
use crate::pool::WorkerPool;
use crate::sequence::InputSequence;

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Per-task outputs in input order
    pub task_outputs: Vec<TaskOutput>,
    /// The merged output
    pub combined: CombineSummary,
    /// Wall-clock time from partitioning to the end of the merge
    pub elapsed: Duration,
}

impl RunReport {
    /// Path of the combined output file.
    pub fn combined_path(&self) -> &Path {
        &self.combined.path
    }

    /// Records written to the combined output.
    pub fn total_records(&self) -> u64 {
        self.combined.records
    }

    /// One-line timing summary.
    pub fn summary(&self) -> String {
        format!("Total Time Taken: {:.2} seconds", self.elapsed.as_secs_f64())
    }
}

/// Runs the whole permutation pipeline for a configuration.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Enumerate every permutation of `input` into the configured files.
    ///
    /// Fails on the first error from any stage. Files already written stay
    /// on disk, and the combined file must not be trusted after a failure.
    #[instrument(skip_all, fields(elements = input.len()))]
    pub fn run<T>(&self, input: &InputSequence<T>) -> PipelineResult<RunReport>
    where
        T: Clone + Display + Send + Sync,
    {
        let start = Instant::now();

        let partitioner = Partitioner::new(self.config.output_dir(), self.config.naming());
        let locations = partitioner.task_locations(input)?;
        check_combined_target(self.config.combined_file(), &locations)?;
        let tasks = partitioner.partition(input)?;

        let pool = WorkerPool::new(self.config.max_workers());
        let task_outputs = pool.run(&tasks, write_task)?;

        let combined = Combiner::new(self.config.combined_file()).combine(&task_outputs)?;
        check_record_count(input.len(), combined.records)?;

        let report = RunReport {
            task_outputs,
            combined,
            elapsed: start.elapsed(),
        };
        info!(
            records = report.total_records(),
            combined = %report.combined_path().display(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Pipeline completed"
        );
        Ok(report)
    }
}

/// Reject a combined file that would overwrite one of the task files.
///
/// Paths are compared lexically after resolving them against the current
/// directory; symlinks are not followed.
fn check_combined_target(combined: &Path, locations: &[PathBuf]) -> PipelineResult<()> {
    let target = comparable(combined);
    if locations.iter().any(|location| comparable(location) == target) {
        return Err(PipelineError::InvalidInput(format!(
            "combined file '{}' is also a per-task output file",
            combined.display()
        )));
    }
    Ok(())
}

fn comparable(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// An input of `n` elements yields `n!` records; no elements yield none.
fn check_record_count(n: usize, actual: u64) -> PipelineResult<()> {
    let expected = if n == 0 { Some(0) } else { factorial(n) };
    match expected {
        Some(expected) if expected != actual => {
            Err(PipelineError::RecordCount { expected, actual })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use std::fs;
    use tempfile::TempDir;

    fn config(dir: &Path) -> PipelineConfig {
        PipelineConfig::new()
            .with_output_dir(dir.join("perm_output"))
            .with_combined_file(dir.join("combined_permutations.txt"))
    }

    #[test]
    fn test_run_three_elements() {
        let temp = TempDir::new().unwrap();
        let pipeline = Pipeline::new(config(temp.path()));

        let report = pipeline
            .run(&InputSequence::new(vec![1, 2, 3]).unwrap())
            .unwrap();

        assert_eq!(report.total_records(), 6);
        assert_eq!(report.task_outputs.len(), 3);
        assert_eq!(
            fs::read_to_string(report.combined_path()).unwrap(),
            "[1, 2, 3]\n[1, 3, 2]\n[2, 1, 3]\n[2, 3, 1]\n[3, 1, 2]\n[3, 2, 1]\n"
        );
    }

    #[test]
    fn test_run_empty_input() {
        let temp = TempDir::new().unwrap();
        let pipeline = Pipeline::new(config(temp.path()));

        let report = pipeline
            .run(&InputSequence::<u32>::new(Vec::new()).unwrap())
            .unwrap();

        assert!(report.task_outputs.is_empty());
        assert_eq!(report.total_records(), 0);
        assert_eq!(fs::read_to_string(report.combined_path()).unwrap(), "");
        let files = fs::read_dir(temp.path().join("perm_output")).unwrap().count();
        assert_eq!(files, 0);
    }

    #[test]
    fn test_output_dir_collision_fails_before_dispatch() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("perm_output"), "occupied").unwrap();
        let pipeline = Pipeline::new(config(temp.path()));

        let err = pipeline
            .run(&InputSequence::new(vec![1, 2, 3]).unwrap())
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Storage(StorageError::NotADirectory { .. })
        ));
        assert!(!temp.path().join("combined_permutations.txt").exists());
    }

    #[test]
    fn test_combined_file_cannot_be_a_task_file() {
        let temp = TempDir::new().unwrap();
        let config =
            config(temp.path()).with_combined_file(temp.path().join("perm_output/./perm_3.txt"));

        let err = Pipeline::new(config)
            .run(&InputSequence::new(vec![1, 2, 3]).unwrap())
            .unwrap_err();

        assert!(matches!(err, PipelineError::InvalidInput(_)));
        assert!(!temp.path().join("perm_output").exists());
    }

    #[test]
    fn test_combined_file_beside_task_files_is_allowed() {
        let temp = TempDir::new().unwrap();
        let config =
            config(temp.path()).with_combined_file(temp.path().join("perm_output/all.txt"));

        let report = Pipeline::new(config)
            .run(&InputSequence::new(vec![1, 2, 3]).unwrap())
            .unwrap();

        assert_eq!(report.total_records(), 6);
    }

    #[test]
    fn test_comparable_resolves_dot_components() {
        assert_eq!(
            comparable(Path::new("/data/out/../out/./perm_1.txt")),
            PathBuf::from("/data/out/perm_1.txt")
        );
        let relative = comparable(Path::new("out/perm_1.txt"));
        assert!(relative.is_absolute());
        assert!(relative.ends_with("out/perm_1.txt"));
    }

    #[test]
    fn test_record_count_check() {
        assert!(check_record_count(3, 6).is_ok());
        assert!(check_record_count(0, 0).is_ok());
        assert!(check_record_count(1, 1).is_ok());

        match check_record_count(3, 4).unwrap_err() {
            PipelineError::RecordCount { expected, actual } => {
                assert_eq!(expected, 6);
                assert_eq!(actual, 4);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(check_record_count(0, 1).is_err());
    }

    #[test]
    fn test_summary_format() {
        let report = RunReport {
            task_outputs: Vec::new(),
            combined: CombineSummary {
                path: "c.txt".into(),
                sources: 0,
                records: 0,
            },
            elapsed: Duration::from_millis(1234),
        };
        assert_eq!(report.summary(), "Total Time Taken: 1.23 seconds");
    }
}
