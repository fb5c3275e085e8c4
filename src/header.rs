//! Header metadata extraction and canonical header generation.
//!
//! Two header dialects are recognised:
//!
//! - **pipe**: `>IsolateName|Type|Segment|Date|ID|Clade|Host|Location`, trailing
//!   fields optional;
//! - **legacy**: `>A/Host/Location/Number/Year`, optionally followed by
//!   `|EPI_ISL_...` and `|date` tokens in either order.
//!
//! Host and location missing from the header are back-filled from the
//! isolate name. None of the heuristics here fail; anything that cannot be
//! inferred stays unset.

use crate::dates::parse_date;
use crate::record::{known, Metadata, Record, UNKNOWN};
use regex::Regex;
use std::sync::OnceLock;

/// Prefix shared by all accessions of the isolate database.
pub const ACCESSION_PREFIX: &str = "EPI";
/// Prefix of isolate-level accessions, e.g. `EPI_ISL_402124`.
pub const ISOLATE_ACCESSION_PREFIX: &str = "EPI_ISL_";

/// Host terms recognised in the second segment of an isolate name.
pub const KNOWN_HOSTS: &[&str] = &[
    "environment",
    "water",
    "poultry",
    "wild bird",
    "waterfowl",
    "avian",
    "chicken",
    "turkey",
    "duck",
    "goose",
    "human",
    "swine",
    "pig",
    "equine",
    "horse",
    "canine",
    "dog",
    "cat",
    "mink",
    "ferret",
];

/// Extract metadata from a header line (with or without the leading `>`).
pub fn extract_metadata(raw_header: &str) -> Metadata {
    let clean = raw_header.trim().trim_start_matches('>').trim();
    let tokens: Vec<&str> = clean.split('|').map(str::trim).collect();

    // Legacy names carry no pipes of their own; anything after the first pipe
    // is an accession or a date.
    let is_legacy = tokens.len() == 1
        || tokens[1].starts_with(ACCESSION_PREFIX)
        || parse_date(tokens[1]).is_some();
    let mut md = if is_legacy {
        legacy_metadata(&tokens)
    } else {
        pipe_metadata(&tokens)
    };

    let (host, location) = md
        .isolate_name
        .as_deref()
        .map(host_and_location)
        .unwrap_or((None, None));
    if md.host.is_none() {
        md.host = host;
    }
    if md.location.is_none() {
        md.location = location;
    }
    md
}

fn pipe_metadata(tokens: &[&str]) -> Metadata {
    let at = |i: usize| tokens.get(i).and_then(|t| known(t));
    Metadata {
        isolate_name: at(0),
        subtype: at(1),
        segment: at(2),
        collection_date: tokens.get(3).and_then(|t| parse_date(t)),
        isolate_id: at(4),
        clade: at(5),
        host: at(6),
        location: at(7),
    }
}

fn legacy_metadata(tokens: &[&str]) -> Metadata {
    let isolate_name = tokens.first().and_then(|t| known(t));
    let mut md = Metadata {
        subtype: isolate_name.as_deref().and_then(infer_subtype),
        segment: isolate_name.as_deref().and_then(infer_segment),
        isolate_name,
        ..Default::default()
    };

    for token in tokens.iter().skip(1) {
        if md.isolate_id.is_none() && token.starts_with(ACCESSION_PREFIX) {
            md.isolate_id = known(token);
        } else if md.collection_date.is_none() {
            md.collection_date = parse_date(token);
        }
    }
    md
}

/// Derive `(host, location)` from a slash-separated isolate name.
///
/// With three or more segments the second is a host if it names a known
/// host term (or is literally "unknown"), and the location follows it;
/// otherwise the second segment is the location. With exactly two segments
/// the second is the location.
pub fn host_and_location(isolate_name: &str) -> (Option<String>, Option<String>) {
    let parts: Vec<&str> = isolate_name.split('/').map(str::trim).collect();
    match parts.as_slice() {
        [] | [_] => (None, None),
        [_, location] => (None, known(&capitalize(location))),
        [_, second, third, ..] => {
            if is_host_term(second) {
                (known(&capitalize(second)), known(&capitalize(third)))
            } else {
                (None, known(&capitalize(second)))
            }
        }
    }
}

/// Whole-word match against [`KNOWN_HOSTS`] after folding `_` and `-` to
/// spaces: `Muscovy duck` is a host, `Catalonia` is not a `cat`.
fn is_host_term(token: &str) -> bool {
    let norm: String = token
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c == '_' || c == '-' { ' ' } else { c })
        .collect();
    let norm = norm.trim();
    if norm == "unknown" {
        return true;
    }
    let padded = format!(" {} ", norm);
    KNOWN_HOSTS
        .iter()
        .any(|term| padded.contains(&format!(" {} ", term)))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn subtype_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\(?H(\d+)N(\d+)\)?").ok())
        .as_ref()
}

/// Influenza type from the isolate name: `A`/`B` from the name prefix,
/// refined to `H<n>N<n>` when the name carries a subtype.
fn infer_subtype(isolate_name: &str) -> Option<String> {
    let mut subtype = if isolate_name.starts_with("A/") {
        Some("A".to_string())
    } else if isolate_name.starts_with("B/") {
        Some("B".to_string())
    } else {
        None
    };
    if let Some(caps) = subtype_regex().and_then(|re| re.captures(isolate_name)) {
        subtype = Some(format!("H{}N{}", &caps[1], &caps[2]));
    }
    subtype
}

/// Segment marker (`HA` or `NA`) appearing as a standalone token of the name.
///
/// Tokens split on any non-alphanumeric character, so `2019_HA` carries a
/// marker while `A/HANOI/1/2005` does not.
fn infer_segment(isolate_name: &str) -> Option<String> {
    isolate_name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .find(|t| *t == "HA" || *t == "NA")
        .map(str::to_string)
}

/// Build the compact canonical header for `md`.
///
/// Fields are emitted in schema order; unset fields are omitted.
pub fn canonical_header(md: &Metadata) -> String {
    let date = md
        .collection_date
        .map(|d| d.format("%Y-%m-%d").to_string());
    let fields = [
        md.isolate_name.as_deref(),
        md.subtype.as_deref(),
        md.segment.as_deref(),
        date.as_deref(),
        md.isolate_id.as_deref(),
        md.clade.as_deref(),
        md.host.as_deref(),
        md.location.as_deref(),
    ];
    let parts: Vec<&str> = fields
        .iter()
        .map(|f| f.unwrap_or(UNKNOWN))
        .filter(|v| !v.is_empty() && *v != UNKNOWN)
        .collect();
    format!(">{}", parts.join("|"))
}

/// Regenerate every record's header in canonical form.
///
/// Sequence and metadata are carried over unchanged.
pub fn convert_headers(records: &[Record]) -> Vec<Record> {
    records
        .iter()
        .map(|r| Record {
            raw_header: canonical_header(&r.metadata),
            sequence: r.sequence.clone(),
            metadata: r.metadata.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn pipe_header_with_backfilled_host_and_location() {
        let md = extract_metadata(">A/Chicken/Vietnam/10/2005|H5N1|HA|2005-01-01|EPI123|2.3.4");
        assert_eq!(md.isolate_name.as_deref(), Some("A/Chicken/Vietnam/10/2005"));
        assert_eq!(md.subtype.as_deref(), Some("H5N1"));
        assert_eq!(md.segment.as_deref(), Some("HA"));
        assert_eq!(md.collection_date, NaiveDate::from_ymd_opt(2005, 1, 1));
        assert_eq!(md.isolate_id.as_deref(), Some("EPI123"));
        assert_eq!(md.clade.as_deref(), Some("2.3.4"));
        assert_eq!(md.host.as_deref(), Some("Chicken"));
        assert_eq!(md.location.as_deref(), Some("Vietnam"));
    }

    #[test]
    fn pipe_header_explicit_host_and_location_win() {
        let md = extract_metadata(">A/duck/Laos/1/2020|H5N6|NA|2020|EPI_ISL_9|2.3.4.4b|Mallard|Vientiane");
        assert_eq!(md.host.as_deref(), Some("Mallard"));
        assert_eq!(md.location.as_deref(), Some("Vientiane"));
    }

    #[test]
    fn pipe_header_empty_and_missing_tokens_stay_unknown() {
        let md = extract_metadata(">X1||HA");
        assert_eq!(md.isolate_name.as_deref(), Some("X1"));
        assert_eq!(md.subtype, None);
        assert_eq!(md.segment.as_deref(), Some("HA"));
        assert_eq!(md.collection_date, None);
        assert_eq!(md.isolate_id, None);
        assert_eq!(md.host, None);
        assert_eq!(md.location, None);
    }

    #[test]
    fn bare_legacy_header() {
        let md = extract_metadata(">A/chicken/Vietnam/10/2005");
        assert_eq!(md.subtype.as_deref(), Some("A"));
        assert_eq!(md.host.as_deref(), Some("Chicken"));
        assert_eq!(md.location.as_deref(), Some("Vietnam"));
        assert_eq!(md.isolate_id, None);
        assert_eq!(md.segment, None);
    }

    #[test]
    fn legacy_header_with_accession_and_date() {
        let md = extract_metadata(">A/swine/Iowa/A02524816/2020(H1N1)|EPI_ISL_1234|2020-08-11");
        assert_eq!(md.subtype.as_deref(), Some("H1N1"));
        assert_eq!(md.isolate_id.as_deref(), Some("EPI_ISL_1234"));
        assert_eq!(md.collection_date, NaiveDate::from_ymd_opt(2020, 8, 11));
        assert_eq!(md.host.as_deref(), Some("Swine"));
        assert_eq!(md.location.as_deref(), Some("Iowa"));
    }

    #[test]
    fn legacy_header_followed_by_date_only() {
        let md = extract_metadata(">A/duck/Laos/1/2020|2020-05-01");
        assert_eq!(md.isolate_name.as_deref(), Some("A/duck/Laos/1/2020"));
        assert_eq!(md.subtype.as_deref(), Some("A"));
        assert_eq!(md.collection_date, NaiveDate::from_ymd_opt(2020, 5, 1));
        assert_eq!(md.host.as_deref(), Some("Duck"));
        assert_eq!(md.location.as_deref(), Some("Laos"));
        assert_eq!(md.isolate_id, None);
    }

    #[test]
    fn pipe_header_type_token_is_not_a_date() {
        let md = extract_metadata(">A/duck/Laos/1/2020|H5N1|HA|2020-05-01");
        assert_eq!(md.subtype.as_deref(), Some("H5N1"));
        assert_eq!(md.segment.as_deref(), Some("HA"));
        assert_eq!(md.collection_date, NaiveDate::from_ymd_opt(2020, 5, 1));
    }

    #[test]
    fn legacy_type_b_and_segment_marker() {
        let md = extract_metadata(">B/Washington/02/2019_HA");
        assert_eq!(md.subtype.as_deref(), Some("B"));
        assert_eq!(md.segment.as_deref(), Some("HA"));
        assert_eq!(md.host, None);
        assert_eq!(md.location.as_deref(), Some("Washington"));
    }

    #[test]
    fn host_heuristic_by_segment_count() {
        assert_eq!(host_and_location("A"), (None, None));
        assert_eq!(host_and_location("A/Texas"), (None, Some("Texas".to_string())));
        assert_eq!(
            host_and_location("A/Texas/50/2012"),
            (None, Some("Texas".to_string()))
        );
        assert_eq!(
            host_and_location("A/wild_bird/Hokkaido/1/2022"),
            (Some("Wild_bird".to_string()), Some("Hokkaido".to_string()))
        );
        assert_eq!(
            host_and_location("A/unknown/Egypt/1/2016"),
            (None, Some("Egypt".to_string()))
        );
    }

    #[test]
    fn host_terms_match_whole_words_only() {
        assert!(is_host_term("Muscovy duck"));
        assert!(is_host_term("CHICKEN"));
        assert!(!is_host_term("Catalonia"));
    }

    #[test]
    fn segment_marker_must_stand_alone() {
        assert_eq!(infer_segment("A/HANOI/1/2005"), None);
        assert_eq!(infer_segment("A/duck/Hanoi/1/2005-NA").as_deref(), Some("NA"));
    }

    #[test]
    fn canonical_header_omits_unknowns() {
        let md = Metadata {
            isolate_name: Some("A/duck/Laos/1/2020".to_string()),
            subtype: Some("H5N6".to_string()),
            clade: Some("2.3.4.4b".to_string()),
            ..Default::default()
        };
        assert_eq!(canonical_header(&md), ">A/duck/Laos/1/2020|H5N6|2.3.4.4b");
    }

    #[test]
    fn converted_header_round_trips_explicit_fields() {
        let md = Metadata {
            isolate_name: Some("A/goose/Guangdong/1/1996".to_string()),
            subtype: Some("H5N1".to_string()),
            segment: Some("HA".to_string()),
            collection_date: NaiveDate::from_ymd_opt(1996, 6, 1),
            isolate_id: Some("EPI_ISL_1254".to_string()),
            clade: Some("0".to_string()),
            host: Some("Goose".to_string()),
            location: Some("Guangdong".to_string()),
        };
        let rec = Record::new(">whatever", "ACGT", md.clone());
        let converted = convert_headers(std::slice::from_ref(&rec));
        assert_eq!(converted[0].sequence, "ACGT");
        assert_eq!(converted[0].metadata, md);
        assert_eq!(extract_metadata(&converted[0].raw_header), md);
    }
}
