//! Run command - generate every permutation and merge the partitions.

use std::path::PathBuf;

use clap::ValueEnum;
use permshard::config::{PipelineConfig, MAX_WORKERS_LIMIT};
use permshard::partition::NamingScheme;
use permshard::pipeline::Pipeline;
use permshard::sequence::{InputSequence, REFERENCE_INPUT_LEN};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Per-task file naming on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NamingArg {
    /// perm_<element>.txt
    Element,
    /// perm_<position>.txt
    Index,
}

impl From<NamingArg> for NamingScheme {
    fn from(arg: NamingArg) -> Self {
        match arg {
            NamingArg::Element => NamingScheme::Element,
            NamingArg::Index => NamingScheme::Index,
        }
    }
}

/// Arguments for the run command.
pub struct RunArgs {
    pub elements: Vec<String>,
    pub output_dir: Option<PathBuf>,
    pub combined: Option<PathBuf>,
    pub workers: Option<usize>,
    pub naming: Option<NamingArg>,
    pub config: Option<PathBuf>,
    pub debug: bool,
}

/// Run the pipeline command.
pub fn run(args: RunArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(args.config.as_deref(), args.debug)?;
    runner.log_startup("run");

    let config = resolve_config(&args, &PipelineConfig::from_config_file(runner.config()))?;
    let elements = resolve_elements(args.elements);
    let input = InputSequence::new(elements)?;

    println!("Generating permutations of {} elements", input.len());
    println!("  Output directory: {}", config.output_dir().display());
    println!("  Combined output:  {}", config.combined_file().display());
    println!("  Naming:           {}", config.naming());
    println!();

    let report = Pipeline::new(config).run(&input)?;

    for output in &report.task_outputs {
        println!(
            "  {} ({} records)",
            output.location().display(),
            output.records()
        );
    }
    println!();
    println!(
        "Combined {} records into {}",
        report.total_records(),
        report.combined_path().display()
    );
    println!("{}", report.summary());

    Ok(())
}

/// Overlay command-line flags on the config-file settings.
fn resolve_config(args: &RunArgs, base: &PipelineConfig) -> Result<PipelineConfig, CliError> {
    let mut config = base.clone();

    if let Some(dir) = &args.output_dir {
        config = config.with_output_dir(dir);
    }
    if let Some(file) = &args.combined {
        config = config.with_combined_file(file);
    }
    if let Some(naming) = args.naming {
        config = config.with_naming(naming.into());
    }
    if let Some(workers) = args.workers {
        if workers > MAX_WORKERS_LIMIT {
            return Err(CliError::InvalidArgs(format!(
                "--workers must be at most {}",
                MAX_WORKERS_LIMIT
            )));
        }
        config = config.with_max_workers(workers);
    }

    Ok(config)
}

/// Elements from the command line, or the reference input `1..=10`.
fn resolve_elements(elements: Vec<String>) -> Vec<String> {
    if elements.is_empty() {
        (1..=REFERENCE_INPUT_LEN).map(|i| i.to_string()).collect()
    } else {
        elements
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> RunArgs {
        RunArgs {
            elements: Vec::new(),
            output_dir: None,
            combined: None,
            workers: None,
            naming: None,
            config: None,
            debug: false,
        }
    }

    #[test]
    fn test_resolve_elements_defaults_to_reference() {
        let elements = resolve_elements(Vec::new());
        assert_eq!(elements.len(), 10);
        assert_eq!(elements[0], "1");
        assert_eq!(elements[9], "10");
    }

    #[test]
    fn test_resolve_elements_keeps_given() {
        let given = vec!["a".to_string(), "b".to_string()];
        assert_eq!(resolve_elements(given.clone()), given);
    }

    #[test]
    fn test_flags_override_config() {
        let mut args = args();
        args.output_dir = Some(PathBuf::from("out"));
        args.workers = Some(2);
        args.naming = Some(NamingArg::Index);

        let base = PipelineConfig::new().with_combined_file("from_config.txt");
        let config = resolve_config(&args, &base).unwrap();

        assert_eq!(config.output_dir(), PathBuf::from("out"));
        assert_eq!(config.combined_file(), PathBuf::from("from_config.txt"));
        assert_eq!(config.max_workers(), 2);
        assert_eq!(config.naming(), NamingScheme::Index);
    }

    #[test]
    fn test_too_many_workers_rejected() {
        let mut args = args();
        args.workers = Some(MAX_WORKERS_LIMIT + 1);
        let err = resolve_config(&args, &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::InvalidArgs(_)));
    }
}
