//! Consistency check for a combined output file.
//!
//! Re-reads the file in a single streaming pass and checks it against the
//! guarantees a successful run gives: `n!` records, no duplicates, every line
//! a well-formed record of `n` elements, and records grouped by head in one
//! contiguous block per head.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::StorageError;
use crate::permute::factorial;
use crate::record::{parse_record, record_head};

/// Findings of [`verify_combined`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyReport {
    /// File that was checked
    pub path: PathBuf,
    /// Records (lines) found
    pub records: u64,
    /// Records a complete run of length `n` produces, `None` if `n!` overflows.
    /// An empty input produces no tasks and therefore no records.
    pub expected: Option<u64>,
    /// Lines identical to an earlier line
    pub duplicates: u64,
    /// Lines that are not a record of the expected length
    pub malformed: u64,
    /// Records whose head returns to a head already closed off earlier
    pub order_violations: u64,
    /// Distinct heads in order of first appearance
    pub heads: Vec<String>,
}

impl VerifyReport {
    /// True when the file holds exactly the permutations of a run.
    pub fn is_valid(&self) -> bool {
        self.expected == Some(self.records)
            && self.duplicates == 0
            && self.malformed == 0
            && self.order_violations == 0
    }
}

/// Check the combined output at `path` for an input of length `n`.
///
/// Duplicate detection keeps every distinct line in memory, so this is meant
/// for inputs small enough to enumerate comfortably.
pub fn verify_combined(path: &Path, n: usize) -> Result<VerifyReport, StorageError> {
    let file = File::open(path).map_err(|e| StorageError::read(path, e))?;
    let reader = BufReader::new(file);

    let mut seen: HashSet<String> = HashSet::new();
    let mut heads: Vec<String> = Vec::new();
    let mut records = 0u64;
    let mut duplicates = 0u64;
    let mut malformed = 0u64;
    let mut order_violations = 0u64;

    for line in reader.lines() {
        let line = line.map_err(|e| StorageError::read(path, e))?;
        records += 1;

        let well_formed = matches!(parse_record(&line), Ok(elements) if elements.len() == n);
        if !well_formed {
            malformed += 1;
        }

        if let Some(head) = record_head(&line) {
            match heads.iter().position(|h| h == head) {
                None => heads.push(head.to_string()),
                Some(pos) if pos + 1 != heads.len() => order_violations += 1,
                Some(_) => {}
            }
        }

        if !seen.insert(line) {
            duplicates += 1;
        }
    }

    let report = VerifyReport {
        path: path.to_path_buf(),
        records,
        expected: if n == 0 { Some(0) } else { factorial(n) },
        duplicates,
        malformed,
        order_violations,
        heads,
    };

    if report.is_valid() {
        info!(path = %path.display(), records, "Combined output verified");
    } else {
        warn!(
            path = %path.display(),
            records,
            expected = ?report.expected,
            duplicates,
            malformed,
            order_violations,
            "Combined output failed verification"
        );
    }

    Ok(report)
}
