//! Length and ambiguity filtering.

use crate::record::Record;
use crate::stage::StageOutcome;

/// Thresholds of the quality filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityThresholds {
    /// Records shorter than this are removed.
    pub min_length: usize,
    /// Records whose longest N-run is longer than this are removed.
    pub max_n_run: usize,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        QualityThresholds {
            min_length: 200,
            max_n_run: 100,
        }
    }
}

/// Length of the longest maximal run of `N` (case-insensitive).
pub fn longest_n_run(seq: &str) -> usize {
    let mut longest = 0usize;
    let mut run = 0usize;
    for b in seq.bytes() {
        if b.eq_ignore_ascii_case(&b'N') {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    longest
}

/// Length is counted in residues (characters), not bytes.
pub fn passes(seq: &str, t: &QualityThresholds) -> bool {
    seq.chars().count() >= t.min_length && longest_n_run(seq) <= t.max_n_run
}

/// Remove records that are too short or carry too long an N-run.
pub fn filter(records: &[Record], t: &QualityThresholds) -> StageOutcome {
    let keep: Vec<bool> = records.iter().map(|r| passes(&r.sequence, t)).collect();
    let outcome = StageOutcome::from_mask(records, &keep);
    log::debug!(
        "quality (min_length={}, max_n_run={}): kept {}, removed {}",
        t.min_length,
        t.max_n_run,
        outcome.kept.len(),
        outcome.removed.len()
    );
    outcome
}
