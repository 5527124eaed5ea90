//! Ordered merge of task outputs into one combined file.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::StorageError;
use crate::generator::TaskOutput;

/// Result of a successful merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombineSummary {
    /// Where the combined records were written
    pub path: PathBuf,
    /// Number of task outputs merged
    pub sources: usize,
    /// Number of records written
    pub records: u64,
}

/// Concatenates task outputs, in the order given, into a single file.
///
/// Each output is streamed line by line, so memory use is bounded by the
/// longest record rather than the size of any file. Outputs are never
/// interleaved.
#[derive(Debug, Clone)]
pub struct Combiner {
    destination: PathBuf,
}

impl Combiner {
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
        }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Merge `outputs` into the destination file, replacing its contents.
    ///
    /// On error the destination is left partially written.
    pub fn combine(&self, outputs: &[TaskOutput]) -> Result<CombineSummary, StorageError> {
        let dest = &self.destination;
        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StorageError::create_dir(parent, e))?;
        }

        let file = File::create(dest).map_err(|e| StorageError::create(dest, e))?;
        let mut writer = BufWriter::new(file);

        let records = combine_into(outputs, &mut writer, dest)?;
        writer.flush().map_err(|e| StorageError::write(dest, e))?;

        info!(
            path = %dest.display(),
            sources = outputs.len(),
            records,
            "Combined output written"
        );

        Ok(CombineSummary {
            path: dest.clone(),
            sources: outputs.len(),
            records,
        })
    }
}

/// Stream the records of `outputs` into `out`, returning the record count.
///
/// `dest` only labels write errors. A final line missing its newline gets
/// one so records from consecutive outputs never run together.
pub fn combine_into<W: Write>(
    outputs: &[TaskOutput],
    out: &mut W,
    dest: &Path,
) -> Result<u64, StorageError> {
    let mut line = Vec::new();
    let mut total = 0u64;

    for output in outputs {
        let path = output.location();
        let file = File::open(path).map_err(|e| StorageError::read(path, e))?;
        let mut reader = BufReader::new(file);
        let mut records = 0u64;

        loop {
            line.clear();
            let read = reader
                .read_until(b'\n', &mut line)
                .map_err(|e| StorageError::read(path, e))?;
            if read == 0 {
                break;
            }
            if line.last() != Some(&b'\n') {
                line.push(b'\n');
            }
            out.write_all(&line)
                .map_err(|e| StorageError::write(dest, e))?;
            records += 1;
        }

        debug!(
            task = output.index(),
            path = %path.display(),
            records,
            "Merged task output"
        );
        total += records;
    }

    Ok(total)
}
