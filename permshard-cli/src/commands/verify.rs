//! Verify command - check a combined output file.

use std::path::PathBuf;

use permshard::verify::verify_combined;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the verify command.
pub struct VerifyArgs {
    pub combined: Option<PathBuf>,
    pub length: usize,
    pub config: Option<PathBuf>,
    pub debug: bool,
}

/// Run the verify command.
pub fn run(args: VerifyArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(args.config.as_deref(), args.debug)?;
    runner.log_startup("verify");

    let path = args
        .combined
        .unwrap_or_else(|| runner.config().output.combined_file.clone());

    let report = verify_combined(&path, args.length)?;

    println!("Verification of {}", path.display());
    println!("  Records:          {}", report.records);
    match report.expected {
        Some(expected) => println!("  Expected:         {}", expected),
        None => println!("  Expected:         (overflows u64)"),
    }
    println!("  Duplicates:       {}", report.duplicates);
    println!("  Malformed:        {}", report.malformed);
    println!("  Order violations: {}", report.order_violations);
    println!("  Leading elements: {}", report.heads.len());

    if report.is_valid() {
        println!();
        println!("OK");
        Ok(())
    } else {
        Err(CliError::VerificationFailed(format!(
            "{} is not a complete permutation set of length {}",
            path.display(),
            args.length
        )))
    }
}
