//! Independent read-back of the merged output.
//!
//! Nothing here looks at what the merge stage remembers; every figure comes
//! from the bytes on disk. The output is streamed line by line so memory stays
//! bounded by the longest line rather than the whole corpus.

use crate::collector::MergeStats;
use crate::error::MergeError;
use serde::Serialize;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

/// Opening text of every separator line
pub const MARKER_PREFIX: &str = "=== ";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct VerifyStats {
    /// Occurrences of [`MARKER_PREFIX`]. Documents containing that text inflate this.
    pub markers: u64,
    pub lines: u64,
    /// Whitespace-delimited tokens outside separator lines
    pub words: u64,
    /// From filesystem metadata, not from counting read bytes
    pub byte_size: u64,
}

/// A figure the read-back disagrees with the merge stage on
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Discrepancy {
    DocumentCount { merged: u64, markers: u64 },
    ByteSize { expected: u64, on_disk: u64 },
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discrepancy::DocumentCount { merged, markers } => {
                write!(f, "merged {} documents but found {} markers", merged, markers)
            }
            Discrepancy::ByteSize { expected, on_disk } => {
                write!(f, "expected {} bytes but file holds {}", expected, on_disk)
            }
        }
    }
}

pub fn verify(output_path: &Path) -> Result<VerifyStats, MergeError> {
    let metadata = match fs::metadata(output_path) {
        Ok(m) if m.is_file() => m,
        Ok(_) => return Err(MergeError::NotFound(output_path.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(MergeError::NotFound(output_path.to_path_buf()));
        }
        Err(e) => return Err(MergeError::Io(e)),
    };

    let mut reader = BufReader::new(File::open(output_path).map_err(MergeError::Io)?);
    let mut stats = VerifyStats {
        byte_size: metadata.len(),
        ..VerifyStats::default()
    };

    // Neither the marker prefix nor a word can span a newline, so per-line
    // counting agrees with counting over the whole text.
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).map_err(MergeError::Io)? == 0 {
            break;
        }
        stats.lines += 1;
        let text = String::from_utf8_lossy(&line);
        stats.markers += text.matches(MARKER_PREFIX).count() as u64;
        if !is_separator_line(&text) {
            stats.words += text.split_whitespace().count() as u64;
        }
    }

    info!(
        markers = stats.markers,
        lines = stats.lines,
        words = stats.words,
        bytes = stats.byte_size,
        "verification finished"
    );
    Ok(stats)
}

fn is_separator_line(line: &str) -> bool {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.len() > 2 * MARKER_PREFIX.len()
        && line.starts_with(MARKER_PREFIX)
        && line.ends_with(" ===")
}

/// Cross-check the read-back against the merge stage's own totals.
pub fn compare(merged: &MergeStats, verified: &VerifyStats) -> Vec<Discrepancy> {
    let mut found = Vec::new();
    if merged.documents != verified.markers {
        found.push(Discrepancy::DocumentCount {
            merged: merged.documents,
            markers: verified.markers,
        });
    }
    if merged.total_bytes() != verified.byte_size {
        found.push(Discrepancy::ByteSize {
            expected: merged.total_bytes(),
            on_disk: verified.byte_size,
        });
    }
    debug!(count = found.len(), "compared merge and verify totals");
    found
}
