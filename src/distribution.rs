//! Category counts over a metadata field.

use crate::record::{Field, Record};
use indexmap::IndexMap;

/// Count records per value of `field`, in first-seen order.
///
/// For calendar fields (`date`, `year`, `month`) undated records are left
/// out; other fields count unset values under "Unknown".
pub fn count(records: &[Record], field: Field) -> IndexMap<String, usize> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for r in records {
        let value = if field.is_calendar() {
            match r.metadata.calendar_value(field) {
                Some(v) => v,
                None => continue,
            }
        } else {
            r.metadata.value(field).into_owned()
        };
        *counts.entry(value).or_insert(0) += 1;
    }
    counts
}

/// Counts ordered by descending count, ties by label.
pub fn sorted_by_count(counts: &IndexMap<String, usize>) -> Vec<(&str, usize)> {
    let mut rows: Vec<(&str, usize)> = counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn records() -> Vec<Record> {
        parse(
            "\
>A/duck/Laos/1/2020|H5N6|HA|2020-03-02
ACGT
>A/duck/Laos/2/2020|H5N1|HA|2020-03-20
ACGT
>A/chicken/Laos/3/2021|H5N1|HA|2021
ACGT
>A/chicken/Laos/4/2021|H5N1|HA
ACGT
",
        )
        .records
    }

    #[test]
    fn counts_literal_values() {
        let counts = count(&records(), Field::Subtype);
        assert_eq!(counts.get("H5N1"), Some(&3));
        assert_eq!(counts.get("H5N6"), Some(&1));
        assert_eq!(counts.keys().next().map(String::as_str), Some("H5N6"));
    }

    #[test]
    fn calendar_fields_skip_undated_records() {
        let years = count(&records(), Field::Year);
        assert_eq!(years.get("2020"), Some(&2));
        assert_eq!(years.get("2021"), Some(&1));
        assert_eq!(years.values().sum::<usize>(), 3);

        let months = count(&records(), Field::Month);
        assert_eq!(months.get("2020-03"), Some(&2));
        assert_eq!(months.get("2021-01"), Some(&1));
    }

    #[test]
    fn unset_values_count_as_unknown() {
        let counts = count(&records(), Field::Clade);
        assert_eq!(counts.get("Unknown"), Some(&4));
    }

    #[test]
    fn sorted_rows_descend_by_count() {
        let counts = count(&records(), Field::Subtype);
        assert_eq!(sorted_by_count(&counts), vec![("H5N1", 3), ("H5N6", 1)]);
    }
}
