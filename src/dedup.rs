//! Sequence deduplication.
//!
//! `basic` keeps the first record of every distinct sequence. `advanced`
//! keeps one record per (sequence, subtype) pair so identical sequences
//! reported under different subtypes all survive.

use crate::record::{Field, Record};
use crate::stage::StageOutcome;
use indexmap::IndexMap;
use std::collections::HashSet;

/// Keep the first record (in input order) of every distinct sequence.
pub fn basic(records: &[Record]) -> StageOutcome {
    let mut seen: HashSet<&str> = HashSet::with_capacity(records.len());
    let keep: Vec<bool> = records
        .iter()
        .map(|r| seen.insert(r.sequence.as_str()))
        .collect();
    let outcome = StageOutcome::from_mask(records, &keep);
    log::debug!(
        "dedup basic: {} distinct sequences, removed {}",
        seen.len(),
        outcome.removed.len()
    );
    outcome
}

/// Keep one record per subtype within each group of identical sequences.
///
/// Members of a duplicated group are scanned in header order, so which
/// record represents a subtype does not depend on input order.
pub fn advanced(records: &[Record]) -> StageOutcome {
    let mut groups: IndexMap<&str, Vec<usize>> = IndexMap::new();
    for (i, r) in records.iter().enumerate() {
        groups.entry(r.sequence.as_str()).or_default().push(i);
    }

    let mut keep = vec![true; records.len()];
    for members in groups.values_mut().filter(|m| m.len() > 1) {
        members.sort_by(|&a, &b| records[a].raw_header.cmp(&records[b].raw_header));
        let mut kept_types = HashSet::new();
        for &i in members.iter() {
            keep[i] = kept_types.insert(records[i].metadata.value(Field::Subtype));
        }
    }

    let outcome = StageOutcome::from_mask(records, &keep);
    log::debug!(
        "dedup advanced: {} sequence groups, removed {}",
        groups.len(),
        outcome.removed.len()
    );
    outcome
}
