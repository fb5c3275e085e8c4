//! Clade-scoped monthly sampling.
//!
//! Records of the target clades are bucketed by collection month and each
//! bucket is reduced with a [`KeepPolicy`]. Undated records share one bucket
//! that is always kept whole.

use crate::error::{FlowError, Result};
use crate::record::Record;
use crate::stage::StageOutcome;
use crate::temporal::KeepPolicy;
use chrono::Datelike;
use indexmap::IndexMap;

/// Parameters of [`sample`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CladeSampling {
    pub clades: Vec<String>,
    pub keep: KeepPolicy,
    /// Bucket each target clade on its own instead of pooling them.
    pub separately: bool,
}

fn clade_matches(record: &Record, target: &str) -> bool {
    record
        .metadata
        .clade
        .as_deref()
        .is_some_and(|c| c.trim().eq_ignore_ascii_case(target))
}

/// Restrict to the target clades and keep first/last/both per month.
///
/// If no record belongs to a target clade the result is empty and every
/// input header is reported removed.
pub fn sample(records: &[Record], params: &CladeSampling) -> Result<StageOutcome> {
    let mut targets: Vec<&str> = Vec::new();
    for t in params.clades.iter().map(|c| c.trim()).filter(|c| !c.is_empty()) {
        if !targets.iter().any(|seen| seen.eq_ignore_ascii_case(t)) {
            targets.push(t);
        }
    }
    if targets.is_empty() {
        return Err(FlowError::InvalidParameter(
            "clade sampling needs at least one target clade".to_string(),
        ));
    }

    let matching: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| targets.iter().any(|t| clade_matches(r, t)))
        .map(|(i, _)| i)
        .collect();
    if matching.is_empty() {
        log::warn!("clade sampling: no records in clades {:?}", targets);
        let removed = records.iter().map(|r| r.raw_header.clone()).collect();
        return Ok(StageOutcome {
            removed,
            advisory: Some(format!("no records matched clades {}", targets.join(", "))),
            ..Default::default()
        });
    }

    let mut selected = vec![false; records.len()];
    if params.separately {
        for t in &targets {
            let members: Vec<usize> = matching
                .iter()
                .copied()
                .filter(|&i| clade_matches(&records[i], t))
                .collect();
            select_monthly(records, &members, params.keep, &mut selected);
        }
    } else {
        select_monthly(records, &matching, params.keep, &mut selected);
    }

    let outcome = StageOutcome::from_mask(records, &selected);
    log::debug!(
        "clade sampling {:?} (keep {}, separately={}): kept {}, removed {}",
        targets,
        params.keep,
        params.separately,
        outcome.kept.len(),
        outcome.removed.len()
    );
    Ok(outcome)
}

/// Mark the records of `members` that survive monthly bucketing.
fn select_monthly(records: &[Record], members: &[usize], keep: KeepPolicy, selected: &mut [bool]) {
    let mut buckets: IndexMap<Option<(i32, u32)>, Vec<usize>> = IndexMap::new();
    for &i in members {
        let month = records[i]
            .metadata
            .collection_date
            .map(|d| (d.year(), d.month()));
        buckets.entry(month).or_default().push(i);
    }

    for (month, bucket) in buckets.iter_mut() {
        if month.is_none() {
            for &i in bucket.iter() {
                selected[i] = true;
            }
            continue;
        }
        bucket.sort_by(|&a, &b| {
            let (ra, rb) = (&records[a], &records[b]);
            ra.metadata
                .collection_date
                .cmp(&rb.metadata.collection_date)
                .then_with(|| ra.raw_header.cmp(&rb.raw_header))
        });
        for i in keep.select(bucket) {
            selected[i] = true;
        }
    }
}
