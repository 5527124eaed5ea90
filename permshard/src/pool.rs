//! Bounded, order-preserving worker pool.
//!
//! Tasks run on a dedicated `rayon` pool sized for the run. Results are
//! collected through an indexed parallel iterator, so the returned outputs
//! follow submission order no matter which worker finishes first.
//!
//! The pool is fail-fast: after the first failure no new task is started,
//! tasks already running are allowed to finish, and a failure is returned.
//! Files written by other tasks are left in place.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{debug, error, info};

use crate::config::num_cpus;
use crate::error::{StorageError, WorkerError};
use crate::generator::TaskOutput;
use crate::partition::Task;

/// Fixed-size pool that runs each task exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerPool {
    max_workers: usize,
}

impl WorkerPool {
    /// Create a pool capped at `max_workers` threads.
    ///
    /// `0` means one worker per available CPU.
    pub fn new(max_workers: usize) -> Self {
        Self { max_workers }
    }

    /// The configured cap, `0` for automatic.
    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Number of threads used for `task_count` tasks.
    ///
    /// `min(task_count, limit)` where the limit is the configured cap or the
    /// available parallelism; zero tasks need zero workers.
    pub fn worker_count(&self, task_count: usize) -> usize {
        let limit = if self.max_workers == 0 {
            num_cpus()
        } else {
            self.max_workers
        };
        task_count.min(limit.max(1))
    }

    /// Run `job` on every task and return the outputs in task order.
    pub fn run<T, F>(&self, tasks: &[Task<T>], job: F) -> Result<Vec<TaskOutput>, WorkerError>
    where
        T: Sync,
        F: Fn(&Task<T>) -> Result<TaskOutput, StorageError> + Sync,
    {
        let workers = self.worker_count(tasks.len());
        if workers == 0 {
            debug!("No tasks to dispatch");
            return Ok(Vec::new());
        }

        let start = Instant::now();
        info!(tasks = tasks.len(), workers, "Dispatching tasks");

        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|n| format!("permshard-worker-{}", n))
            .build()
            .map_err(|source| WorkerError::PoolBuild { workers, source })?;

        // Collecting into Result stops handing out tasks after an error
        let result: Result<Vec<TaskOutput>, WorkerError> = pool.install(|| {
            tasks
                .par_iter()
                .map(|task| run_task(task, &job))
                .collect()
        });

        match &result {
            Ok(outputs) => info!(
                tasks = outputs.len(),
                workers,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "All tasks completed"
            ),
            Err(e) => error!(
                task = ?e.task_index(),
                error = %e,
                "Worker pool aborted"
            ),
        }
        result
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Run one task on the current worker, turning a panic into an error.
fn run_task<T, F>(task: &Task<T>, job: &F) -> Result<TaskOutput, WorkerError>
where
    F: Fn(&Task<T>) -> Result<TaskOutput, StorageError>,
{
    let index = task.index();
    debug!(worker = ?rayon::current_thread_index(), task = index, "Task started");

    match panic::catch_unwind(AssertUnwindSafe(|| job(task))) {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(source)) => Err(WorkerError::Task {
            index,
            location: task.location().to_path_buf(),
            source,
        }),
        Err(payload) => Err(WorkerError::Panicked {
            index,
            location: task.location().to_path_buf(),
            message: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::{NamingScheme, Partitioner};
    use crate::sequence::InputSequence;
    use std::io;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::thread;
    use std::time::Duration;
    use tempfile::TempDir;

    fn tasks(dir: &Path, n: u32) -> Vec<Task<u32>> {
        let input = InputSequence::new((1..=n).collect()).unwrap();
        Partitioner::new(dir, NamingScheme::Element)
            .partition(&input)
            .unwrap()
    }

    fn fake_output(task: &Task<u32>) -> Result<TaskOutput, StorageError> {
        Ok(TaskOutput::new(task.index(), task.location(), 1))
    }

    #[test]
    fn test_worker_count_bounds() {
        let pool = WorkerPool::new(4);
        assert_eq!(pool.worker_count(0), 0);
        assert_eq!(pool.worker_count(2), 2);
        assert_eq!(pool.worker_count(10), 4);

        let auto = WorkerPool::default();
        assert_eq!(auto.max_workers(), 0);
        assert_eq!(auto.worker_count(1), 1);
        assert!(auto.worker_count(1000) >= 1);
        assert!(auto.worker_count(1000) <= num_cpus());
    }

    #[test]
    fn test_empty_task_list() {
        let outputs = WorkerPool::new(2)
            .run::<u32, _>(&[], |_| unreachable!("no tasks"))
            .unwrap();
        assert!(outputs.is_empty());
    }

    #[test]
    fn test_results_follow_submission_order() {
        let temp = TempDir::new().unwrap();
        let tasks = tasks(temp.path(), 6);

        // Earlier tasks sleep longer so they finish last
        let outputs = WorkerPool::new(6)
            .run(&tasks, |task| {
                thread::sleep(Duration::from_millis(10 * (6 - task.index() as u64)));
                fake_output(task)
            })
            .unwrap();

        let indices: Vec<usize> = outputs.iter().map(TaskOutput::index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_each_task_runs_exactly_once() {
        let temp = TempDir::new().unwrap();
        let tasks = tasks(temp.path(), 8);
        let seen = Mutex::new(Vec::new());

        WorkerPool::new(3)
            .run(&tasks, |task| {
                seen.lock().unwrap().push(task.index());
                fake_output(task)
            })
            .unwrap();

        let mut seen = seen.into_inner().unwrap();
        seen.sort_unstable();
        assert_eq!(seen, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_concurrency_never_exceeds_worker_count() {
        let temp = TempDir::new().unwrap();
        let tasks = tasks(temp.path(), 8);
        let active = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);

        WorkerPool::new(2)
            .run(&tasks, |task| {
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                thread::sleep(Duration::from_millis(5));
                active.fetch_sub(1, Ordering::SeqCst);
                fake_output(task)
            })
            .unwrap();

        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[test]
    fn test_storage_failure_fails_whole_run() {
        let temp = TempDir::new().unwrap();
        let tasks = tasks(temp.path(), 4);

        let err = WorkerPool::new(2)
            .run(&tasks, |task| {
                if task.index() == 2 {
                    Err(StorageError::write(
                        task.location(),
                        io::Error::new(io::ErrorKind::Other, "disk full"),
                    ))
                } else {
                    fake_output(task)
                }
            })
            .unwrap_err();

        assert_eq!(err.task_index(), Some(2));
        assert_eq!(err.location(), Some(tasks[2].location()));
        assert!(matches!(err, WorkerError::Task { .. }));
    }

    #[test]
    fn test_failure_stops_dispatch() {
        let temp = TempDir::new().unwrap();
        let tasks = tasks(temp.path(), 10);
        let started = AtomicUsize::new(0);

        let result = WorkerPool::new(1).run(&tasks, |task| {
            started.fetch_add(1, Ordering::SeqCst);
            Err(StorageError::write(
                task.location(),
                io::Error::new(io::ErrorKind::Other, "fail"),
            ))
        });

        assert!(result.is_err());
        assert!(started.load(Ordering::SeqCst) < tasks.len());
    }

    #[test]
    fn test_panic_becomes_worker_error() {
        let temp = TempDir::new().unwrap();
        let tasks = tasks(temp.path(), 3);

        let err = WorkerPool::new(3)
            .run(&tasks, |task| {
                if task.index() == 1 {
                    panic!("generator exploded");
                }
                fake_output(task)
            })
            .unwrap_err();

        match err {
            WorkerError::Panicked { index, message, .. } => {
                assert_eq!(index, 1);
                assert!(message.contains("generator exploded"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_tasks_run_on_named_workers() {
        let temp = TempDir::new().unwrap();
        let tasks = tasks(temp.path(), 4);
        let names = Mutex::new(Vec::new());

        WorkerPool::new(2)
            .run(&tasks, |task| {
                let name = thread::current().name().map(str::to_string);
                names.lock().unwrap().push(name);
                fake_output(task)
            })
            .unwrap();

        for name in names.into_inner().unwrap() {
            let name = name.expect("worker thread is named");
            assert!(name.starts_with("permshard-worker-"), "{name}");
        }
    }

    #[test]
    fn test_panic_message_payloads() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&42u8), "unknown panic payload");
    }
}
