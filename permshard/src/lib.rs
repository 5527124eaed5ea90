//! permshard - partitioned parallel permutation generation
//!
//! Enumerates every permutation of a sequence of distinct elements by fixing
//! each element as the leading one, generating each partition on its own
//! worker thread into its own file, and merging the files in input order into
//! one combined output.
//!
//! # High-Level API
//!
//! For most use cases, the [`pipeline`] module provides a single entry point:
//!
//! ```no_run
//! use permshard::config::PipelineConfig;
//! use permshard::pipeline::Pipeline;
//! use permshard::sequence::InputSequence;
//!
//! let input = InputSequence::new(vec![1, 2, 3])?;
//! let report = Pipeline::new(PipelineConfig::default()).run(&input)?;
//!
//! assert_eq!(report.total_records(), 6);
//! println!("{}", report.summary());
//! # Ok::<(), permshard::error::PipelineError>(())
//! ```
//!
//! The stages are also usable on their own: [`partition::Partitioner`],
//! [`pool::WorkerPool`], [`generator::write_task`] and [`combiner::Combiner`].

pub mod combiner;
pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod partition;
pub mod permute;
pub mod pipeline;
pub mod pool;
pub mod record;
pub mod sequence;
pub mod verify;

pub use error::{PipelineError, PipelineResult, StorageError, WorkerError};

/// Version of the permshard library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
