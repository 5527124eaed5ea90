//! Partitioning of the permutation space by leading element.
//!
//! Every element of the input becomes the fixed head of exactly one
//! [`Task`]. The tasks' permutation sets are disjoint and together cover all
//! permutations of the input.

use std::fmt::{self, Display};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::debug;

use crate::error::{PipelineError, PipelineResult, StorageError};
use crate::sequence::InputSequence;

/// Prefix of every per-task output file.
pub const TASK_FILE_PREFIX: &str = "perm_";

/// Extension of every per-task output file.
pub const TASK_FILE_EXTENSION: &str = "txt";

/// How per-task output files are named.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NamingScheme {
    /// `perm_<element>.txt`, using the element's display text
    #[default]
    Element,
    /// `perm_<index>.txt`, using the zero-based input position
    Index,
}

impl NamingScheme {
    /// File name for the task at `index` with head `element`.
    pub fn file_name<T: Display>(&self, index: usize, element: &T) -> String {
        match self {
            NamingScheme::Element => {
                format!("{}{}.{}", TASK_FILE_PREFIX, element, TASK_FILE_EXTENSION)
            }
            NamingScheme::Index => {
                format!("{}{}.{}", TASK_FILE_PREFIX, index, TASK_FILE_EXTENSION)
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NamingScheme::Element => "element",
            NamingScheme::Index => "index",
        }
    }
}

impl fmt::Display for NamingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NamingScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "element" => Ok(NamingScheme::Element),
            "index" => Ok(NamingScheme::Index),
            other => Err(format!(
                "unknown naming scheme '{}', expected 'element' or 'index'",
                other
            )),
        }
    }
}

/// One partition of the permutation space.
///
/// Carries everything a worker needs; nothing is shared with other tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task<T> {
    index: usize,
    fixed: T,
    remainder: Vec<T>,
    location: PathBuf,
}

impl<T> Task<T> {
    /// Submission position of this task.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The element every record of this task starts with.
    pub fn fixed(&self) -> &T {
        &self.fixed
    }

    /// The other input elements, in input order.
    pub fn remainder(&self) -> &[T] {
        &self.remainder
    }

    /// Where this task's records are written.
    pub fn location(&self) -> &Path {
        &self.location
    }
}

/// Splits an input sequence into one task per element.
#[derive(Debug, Clone)]
pub struct Partitioner {
    output_dir: PathBuf,
    naming: NamingScheme,
}

impl Partitioner {
    pub fn new(output_dir: impl Into<PathBuf>, naming: NamingScheme) -> Self {
        Self {
            output_dir: output_dir.into(),
            naming,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn naming(&self) -> NamingScheme {
        self.naming
    }

    /// Create the output directory if it does not exist.
    ///
    /// Idempotent. Fails if the path exists as something other than a
    /// directory or cannot be created.
    pub fn ensure_output_dir(&self) -> Result<(), StorageError> {
        let dir = &self.output_dir;
        if dir.exists() && !dir.is_dir() {
            return Err(StorageError::NotADirectory { path: dir.clone() });
        }
        fs::create_dir_all(dir).map_err(|e| StorageError::create_dir(dir, e))?;
        debug!(path = %dir.display(), "Output directory ready");
        Ok(())
    }

    /// Where each task of `input` will be written, in input order.
    ///
    /// Validates file names without touching the filesystem.
    pub fn task_locations<T: Display>(
        &self,
        input: &InputSequence<T>,
    ) -> PipelineResult<Vec<PathBuf>> {
        input
            .iter()
            .enumerate()
            .map(|(index, element)| {
                if self.naming == NamingScheme::Element {
                    check_file_safe(&element.to_string())?;
                }
                Ok(self.output_dir.join(self.naming.file_name(index, element)))
            })
            .collect()
    }

    /// Produce the tasks for `input`, in input order.
    ///
    /// File names are validated before the output directory is touched, so a
    /// rejected input leaves the filesystem unchanged.
    pub fn partition<T>(&self, input: &InputSequence<T>) -> PipelineResult<Vec<Task<T>>>
    where
        T: Clone + Display,
    {
        let locations = self.task_locations(input)?;
        self.ensure_output_dir()?;

        let tasks: Vec<Task<T>> = locations
            .into_iter()
            .enumerate()
            .filter_map(|(index, location)| {
                let (fixed, rest) = input.split_at_index(index)?;
                Some(Task {
                    index,
                    fixed: fixed.clone(),
                    remainder: rest.into_iter().cloned().collect(),
                    location,
                })
            })
            .collect();

        debug!(
            tasks = tasks.len(),
            naming = %self.naming,
            "Partitioned input"
        );
        Ok(tasks)
    }
}

/// Reject display text that cannot be embedded in a single file name.
fn check_file_safe(text: &str) -> PipelineResult<()> {
    let unsafe_char = text
        .chars()
        .any(|c| c == '/' || c == '\\' || c == '\0' || c.is_control());
    if text.is_empty() || text == "." || text == ".." || unsafe_char {
        return Err(PipelineError::InvalidInput(format!(
            "element '{}' cannot be used in a file name; use index naming",
            text.escape_debug()
        )));
    }
    Ok(())
}
