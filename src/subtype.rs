//! Subtype filtering.

use crate::record::{Field, Record};
use crate::stage::StageOutcome;

/// Normalise target tokens: trimmed, uppercased, blanks and `ALL` dropped.
pub fn normalise_targets<S: AsRef<str>>(targets: &[S]) -> Vec<String> {
    targets
        .iter()
        .flat_map(|t| t.as_ref().split(','))
        .map(|t| t.trim().to_ascii_uppercase())
        .filter(|t| !t.is_empty() && t != "ALL")
        .collect()
}

/// Keep records whose subtype contains any of `targets` (case-insensitive).
///
/// Compound subtypes such as `H5N1+H9N2` match either component. An empty
/// (or `All`-only) target list returns the input unchanged with an advisory.
pub fn filter<S: AsRef<str>>(records: &[Record], targets: &[S]) -> StageOutcome {
    let targets = normalise_targets(targets);
    if targets.is_empty() {
        log::warn!("subtype filter: no target subtypes given, records left unchanged");
        return StageOutcome::unchanged(records, "no target subtypes given; nothing filtered");
    }

    let keep: Vec<bool> = records
        .iter()
        .map(|r| {
            let subtype = r.metadata.value(Field::Subtype).trim().to_ascii_uppercase();
            targets.iter().any(|t| subtype.contains(t.as_str()))
        })
        .collect();
    let outcome = StageOutcome::from_mask(records, &keep);
    log::debug!(
        "subtype filter {:?}: kept {}, removed {}",
        targets,
        outcome.kept.len(),
        outcome.removed.len()
    );
    outcome
}
