//! Per-task permutation generation and persistence.

use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::debug;

use crate::error::StorageError;
use crate::partition::Task;
use crate::permute::Permutations;
use crate::record::write_record;

/// Handle to the persisted records of one task.
///
/// Produced by a worker once its file is fully written and flushed; the file
/// is read-only from then on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutput {
    index: usize,
    location: PathBuf,
    records: u64,
}

impl TaskOutput {
    pub fn new(index: usize, location: impl Into<PathBuf>, records: u64) -> Self {
        Self {
            index,
            location: location.into(),
            records,
        }
    }

    /// Submission position of the task that produced this output.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Number of records written.
    pub fn records(&self) -> u64 {
        self.records
    }
}

/// Write every permutation of the task's remainder, headed by its fixed
/// element, to the task's location.
///
/// One record per line. The file is truncated first, and flushed before this
/// returns; on error it is left as far as it got.
pub fn write_task<T: Display>(task: &Task<T>) -> Result<TaskOutput, StorageError> {
    let path = task.location();
    let start = Instant::now();

    let file = File::create(path).map_err(|e| StorageError::create(path, e))?;
    let mut writer = BufWriter::new(file);

    let records = write_records(task, &mut writer).map_err(|e| StorageError::write(path, e))?;
    writer.flush().map_err(|e| StorageError::write(path, e))?;

    debug!(
        task = task.index(),
        path = %path.display(),
        records,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Task output written"
    );

    Ok(TaskOutput::new(task.index(), path, records))
}

/// Stream a task's records into `out`, returning how many were written.
pub fn write_records<T: Display, W: Write>(task: &Task<T>, out: &mut W) -> std::io::Result<u64> {
    let remainder = task.remainder();
    let mut perms = Permutations::new(remainder);
    let mut line = String::new();
    let mut records = 0u64;

    while let Some(order) = perms.next_indices() {
        line.clear();
        let elements = std::iter::once(task.fixed()).chain(order.iter().map(|&i| &remainder[i]));
        write_record(&mut line, elements)
            .map_err(|_| std::io::Error::new(std::io::ErrorKind::Other, "formatting failed"))?;
        line.push('\n');
        out.write_all(line.as_bytes())?;
        records += 1;
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::{NamingScheme, Partitioner};
    use crate::sequence::InputSequence;
    use std::fs;
    use tempfile::TempDir;

    fn tasks_for<T>(dir: &Path, elements: Vec<T>) -> Vec<Task<T>>
    where
        T: Clone + PartialEq + Display,
    {
        let input = InputSequence::new(elements).unwrap();
        Partitioner::new(dir, NamingScheme::Element)
            .partition(&input)
            .unwrap()
    }

    #[test]
    fn test_write_task_first_partition() {
        let temp = TempDir::new().unwrap();
        let tasks = tasks_for(temp.path(), vec![1, 2, 3]);

        let output = write_task(&tasks[0]).unwrap();

        assert_eq!(output.index(), 0);
        assert_eq!(output.records(), 2);
        assert_eq!(output.location(), temp.path().join("perm_1.txt"));
        let content = fs::read_to_string(output.location()).unwrap();
        assert_eq!(content, "[1, 2, 3]\n[1, 3, 2]\n");
    }

    #[test]
    fn test_write_task_every_record_has_fixed_head() {
        let temp = TempDir::new().unwrap();
        let tasks = tasks_for(temp.path(), vec!['a', 'b', 'c', 'd', 'e']);

        for task in &tasks {
            let output = write_task(task).unwrap();
            assert_eq!(output.records(), 24);
            let content = fs::read_to_string(output.location()).unwrap();
            let prefix = format!("[{}", task.fixed());
            assert_eq!(content.lines().count(), 24);
            assert!(content.lines().all(|l| l.starts_with(&prefix)));
        }
    }

    #[test]
    fn test_single_element_writes_singleton_record() {
        let temp = TempDir::new().unwrap();
        let tasks = tasks_for(temp.path(), vec![42]);

        let output = write_task(&tasks[0]).unwrap();

        assert_eq!(output.records(), 1);
        assert_eq!(fs::read_to_string(output.location()).unwrap(), "[42]\n");
    }

    #[test]
    fn test_write_task_truncates_stale_file() {
        let temp = TempDir::new().unwrap();
        let tasks = tasks_for(temp.path(), vec![1, 2]);
        fs::write(tasks[0].location(), "stale\nstale\nstale\n").unwrap();

        write_task(&tasks[0]).unwrap();

        assert_eq!(
            fs::read_to_string(tasks[0].location()).unwrap(),
            "[1, 2]\n"
        );
    }

    #[test]
    fn test_write_task_missing_directory_is_storage_error() {
        let temp = TempDir::new().unwrap();
        let tasks = tasks_for(temp.path(), vec![1, 2]);
        fs::remove_dir_all(temp.path()).unwrap();

        let err = write_task(&tasks[0]).unwrap_err();
        assert!(matches!(err, StorageError::Create { .. }));
    }

    #[test]
    fn test_write_records_to_buffer() {
        let temp = TempDir::new().unwrap();
        let tasks = tasks_for(temp.path(), vec![1, 2, 3]);
        let mut buffer = Vec::new();

        let records = write_records(&tasks[2], &mut buffer).unwrap();

        assert_eq!(records, 2);
        assert_eq!(String::from_utf8(buffer).unwrap(), "[3, 1, 2]\n[3, 2, 1]\n");
    }
}
