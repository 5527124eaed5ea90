//! Error types for the permutation pipeline.
//!
//! Errors are split by where they originate: storage failures come from the
//! filesystem, worker failures wrap whatever stopped a single partition, and
//! [`PipelineError`] is the single top-level failure a run reports.

use std::io;
use std::path::{Path, PathBuf};

use rayon::ThreadPoolBuildError;
use thiserror::Error;

/// Filesystem failures while creating, writing, or reading pipeline files.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The output directory could not be created
    #[error("failed to create directory '{}': {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The output path exists but is not a directory
    #[error("output path '{}' exists and is not a directory", path.display())]
    NotADirectory { path: PathBuf },

    /// A file could not be created for writing
    #[error("failed to create file '{}': {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing or flushing a file failed
    #[error("failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A file could not be opened or read
    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    pub(crate) fn create_dir(path: &Path, source: io::Error) -> Self {
        Self::CreateDir {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn create(path: &Path, source: io::Error) -> Self {
        Self::Create {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn write(path: &Path, source: io::Error) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn read(path: &Path, source: io::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    /// The path the failed operation targeted.
    pub fn path(&self) -> &Path {
        match self {
            Self::CreateDir { path, .. }
            | Self::NotADirectory { path }
            | Self::Create { path, .. }
            | Self::Write { path, .. }
            | Self::Read { path, .. } => path,
        }
    }
}

/// A worker stopped before producing its partition.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// The partition's output could not be persisted
    #[error("task {index} ('{}') failed: {source}", location.display())]
    Task {
        index: usize,
        location: PathBuf,
        #[source]
        source: StorageError,
    },

    /// The worker thread panicked while generating
    #[error("task {index} ('{}') panicked: {message}", location.display())]
    Panicked {
        index: usize,
        location: PathBuf,
        message: String,
    },

    /// The worker threads could not be started
    #[error("failed to start {workers} worker threads: {source}")]
    PoolBuild {
        workers: usize,
        #[source]
        source: ThreadPoolBuildError,
    },
}

impl WorkerError {
    /// Submission index of the failing task, if the failure belongs to one.
    pub fn task_index(&self) -> Option<usize> {
        match self {
            Self::Task { index, .. } | Self::Panicked { index, .. } => Some(*index),
            Self::PoolBuild { .. } => None,
        }
    }

    /// Output location of the failing task, if the failure belongs to one.
    pub fn location(&self) -> Option<&Path> {
        match self {
            Self::Task { location, .. } | Self::Panicked { location, .. } => {
                Some(location.as_path())
            }
            Self::PoolBuild { .. } => None,
        }
    }
}

/// Top-level failure of a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input sequence or naming scheme cannot produce a valid run
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Partitioning or combining failed on storage
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// A worker failed while generating its partition
    #[error("worker error: {0}")]
    Worker(#[from] WorkerError),

    /// The combined output does not hold one record per permutation
    #[error("combined output has {actual} records, expected {expected}")]
    RecordCount { expected: u64, actual: u64 },
}

/// Convenience alias for pipeline results.
pub type PipelineResult<T> = Result<T, PipelineError>;
