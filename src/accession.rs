//! Accession extraction.

use crate::header::{ACCESSION_PREFIX, ISOLATE_ACCESSION_PREFIX};
use crate::record::Record;
use indexmap::IndexSet;

/// Accession of one record: its isolate id when that is an accession,
/// otherwise the first `EPI_ISL_` token of the pipe-split header.
pub fn accession_of(record: &Record) -> Option<&str> {
    if let Some(id) = record.metadata.isolate_id.as_deref() {
        if id.starts_with(ACCESSION_PREFIX) {
            return Some(id);
        }
    }
    record
        .header_text()
        .split('|')
        .map(str::trim)
        .find(|t| t.starts_with(ISOLATE_ACCESSION_PREFIX))
}

/// Distinct accessions in first-seen order.
pub fn extract(records: &[Record]) -> Vec<String> {
    let accessions: IndexSet<&str> = records.iter().filter_map(accession_of).collect();
    log::debug!(
        "extracted {} distinct accessions from {} records",
        accessions.len(),
        records.len()
    );
    accessions.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn isolate_id_is_preferred() {
        let recs = parse(">A/x/y/1/2020|H5N1|HA|2020|EPI123|2.3.4\nACGT\n").records;
        assert_eq!(extract(&recs), vec!["EPI123".to_string()]);
    }

    #[test]
    fn falls_back_to_header_tokens() {
        // isolate id slot holds something that is not an accession
        let recs = parse(">A/x/y/1/2020|H5N1|HA|2020|lab-7|2.3.4|Duck|Laos|EPI_ISL_55\nACGT\n").records;
        assert_eq!(recs[0].metadata.isolate_id.as_deref(), Some("lab-7"));
        assert_eq!(extract(&recs), vec!["EPI_ISL_55".to_string()]);
    }

    #[test]
    fn deduplicates_in_first_seen_order_and_skips_missing() {
        let text = "\
>A/a/b/1/2020|EPI_ISL_2|2020-01-01
ACGT
>no accession here
ACGT
>A/a/b/2/2020|EPI_ISL_1
ACGT
>A/a/b/3/2020|EPI_ISL_2
ACGT
";
        let recs = parse(text).records;
        assert_eq!(
            extract(&recs),
            vec!["EPI_ISL_2".to_string(), "EPI_ISL_1".to_string()]
        );
    }
}
