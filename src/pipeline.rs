use crate::collector::{self, MergeStats};
use crate::config::MergeConfig;
use crate::error::MergeError;
use crate::report::{MergeEvent, Reporter};
use crate::verifier::{self, Discrepancy, VerifyStats};
use serde::Serialize;
use std::fs;
use tracing::{info, warn};

/// How the merged output measures up against the advisory size goal
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TargetProgress {
    pub target_bytes: u64,
    pub actual_bytes: u64,
}

impl TargetProgress {
    pub fn reached(&self) -> bool {
        self.actual_bytes >= self.target_bytes
    }

    pub fn remaining_bytes(&self) -> u64 {
        self.target_bytes.saturating_sub(self.actual_bytes)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PipelineReport {
    pub merge: MergeStats,
    pub verify: VerifyStats,
    pub discrepancies: Vec<Discrepancy>,
    pub target: TargetProgress,
}

/// Discover, merge, then read the output back.
///
/// Missing or empty input fails before the output path is touched. The
/// verify stage only runs after a successful merge. Mismatches between the
/// two stages are reported, and only fail the run when `config.strict` is set.
pub fn run(
    config: &MergeConfig,
    reporter: &mut dyn Reporter,
) -> Result<PipelineReport, MergeError> {
    let files = collector::discover_excluding(
        config.input_dir(),
        &config.suffix,
        Some(config.output_path()),
    )?;
    if files.is_empty() {
        return Err(MergeError::EmptyInput(config.input_dir().to_path_buf()));
    }
    info!(count = files.len(), dir = %config.input_dir().display(), "found input documents");
    reporter.on_event(&MergeEvent::Discovered { count: files.len() });

    let merge = collector::merge(&files, config.output_path(), reporter)?;

    let actual_bytes = fs::metadata(config.output_path()).map_err(MergeError::Io)?.len();
    let target = TargetProgress {
        target_bytes: config.target_size_bytes,
        actual_bytes,
    };
    reporter.on_event(&MergeEvent::TargetChecked(target.clone()));

    let verify = verifier::verify(config.output_path())?;
    reporter.on_event(&MergeEvent::Verified(verify.clone()));

    let discrepancies = verifier::compare(&merge, &verify);
    if !discrepancies.is_empty() {
        for discrepancy in &discrepancies {
            warn!(%discrepancy, "verification mismatch");
        }
        reporter.on_event(&MergeEvent::Discrepancies(discrepancies.clone()));
        if config.strict {
            return Err(MergeError::Inconsistent(discrepancies));
        }
    }

    Ok(PipelineReport {
        merge,
        verify,
        discrepancies,
        target,
    })
}
