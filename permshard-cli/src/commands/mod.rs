//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration management (path, show, init)
//! - [`run`] - Generate all permutations and merge them
//! - [`verify`] - Check a combined output file

pub mod config;
pub mod run;
pub mod verify;
