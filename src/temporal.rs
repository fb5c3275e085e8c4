//! Temporal diversity sampling.
//!
//! Records are grouped on one or more metadata axes, each group is ordered
//! by a sort field, and the first and/or last record of every group is kept.
//! Sorting by date drops undated records before grouping; sorting by any
//! other field keeps them and orders them by the field's text.

use crate::error::{FlowError, Result};
use crate::record::{Field, Record};
use crate::stage::StageOutcome;
use indexmap::IndexMap;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Which records of an ordered group survive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeepPolicy {
    First,
    Last,
    #[default]
    Both,
}

impl KeepPolicy {
    /// Pick positions from an already-ordered group.
    ///
    /// `Both` on a single-member group yields that member once.
    pub fn select(&self, ordered: &[usize]) -> Vec<usize> {
        let (Some(&first), Some(&last)) = (ordered.first(), ordered.last()) else {
            return Vec::new();
        };
        match self {
            KeepPolicy::First => vec![first],
            KeepPolicy::Last => vec![last],
            KeepPolicy::Both if ordered.len() == 1 => vec![first],
            KeepPolicy::Both => vec![first, last],
        }
    }
}

impl FromStr for KeepPolicy {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" | "earliest" => Ok(KeepPolicy::First),
            "last" | "latest" => Ok(KeepPolicy::Last),
            "both" => Ok(KeepPolicy::Both),
            _ => Err(FlowError::UnknownKeepPolicy(s.trim().to_string())),
        }
    }
}

impl fmt::Display for KeepPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KeepPolicy::First => "first",
            KeepPolicy::Last => "last",
            KeepPolicy::Both => "both",
        })
    }
}

/// How records are bucketed before selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GroupBy {
    Location,
    Host,
    Clade,
    #[default]
    LocationHost,
    LocationHostMonthClade,
    /// User-declared list of metadata fields.
    Custom(Vec<Field>),
    /// Every record in one bucket.
    Universal,
}

impl GroupBy {
    /// Build a custom grouping from field names.
    pub fn custom<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let fields = names
            .iter()
            .map(|n| n.as_ref().parse::<Field>())
            .collect::<Result<Vec<_>>>()?;
        if fields.is_empty() {
            return Err(FlowError::InvalidParameter(
                "custom grouping needs at least one field".to_string(),
            ));
        }
        Ok(GroupBy::Custom(fields))
    }

    pub fn fields(&self) -> &[Field] {
        match self {
            GroupBy::Location => &[Field::Location],
            GroupBy::Host => &[Field::Host],
            GroupBy::Clade => &[Field::Clade],
            GroupBy::LocationHost => &[Field::Location, Field::Host],
            GroupBy::LocationHostMonthClade => {
                &[Field::Location, Field::Host, Field::MonthOfYear, Field::Clade]
            }
            GroupBy::Custom(fields) => fields.as_slice(),
            GroupBy::Universal => &[],
        }
    }
}

impl FromStr for GroupBy {
    type Err = FlowError;

    /// Accepts the named groupings, `none`, or `custom:field1,field2`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(list) = s.strip_prefix("custom:") {
            let names: Vec<&str> = list.split(',').map(str::trim).filter(|n| !n.is_empty()).collect();
            return GroupBy::custom(names.as_slice());
        }
        match s.to_ascii_lowercase().as_str() {
            "location" => Ok(GroupBy::Location),
            "host" => Ok(GroupBy::Host),
            "clade" => Ok(GroupBy::Clade),
            "location_host" => Ok(GroupBy::LocationHost),
            "location_host_month_clade" => Ok(GroupBy::LocationHostMonthClade),
            "none" | "all" => Ok(GroupBy::Universal),
            _ => Err(FlowError::UnknownGrouping(s.to_string())),
        }
    }
}

/// Parameters of [`sample`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporalSampling {
    pub group_by: GroupBy,
    pub sort_by: Field,
    pub keep: KeepPolicy,
}

impl Default for TemporalSampling {
    fn default() -> Self {
        TemporalSampling {
            group_by: GroupBy::default(),
            sort_by: Field::Date,
            keep: KeepPolicy::default(),
        }
    }
}

/// Group, order and reduce `records`.
///
/// When sorting by date, undated records are reported in `excluded` and the
/// remaining ones form the input set; `removed` is relative to that set.
/// Fails with [`FlowError::NoDatedRecords`] if no dated record remains.
pub fn sample(records: &[Record], params: &TemporalSampling) -> Result<StageOutcome> {
    if let GroupBy::Custom(fields) = &params.group_by {
        if fields.is_empty() {
            return Err(FlowError::InvalidParameter(
                "custom grouping needs at least one field".to_string(),
            ));
        }
    }

    let by_date = params.sort_by == Field::Date;
    let eligible: Vec<bool> = records
        .iter()
        .map(|r| !by_date || r.metadata.collection_date.is_some())
        .collect();
    if by_date && !eligible.contains(&true) {
        return Err(FlowError::NoDatedRecords);
    }

    let fields = params.group_by.fields();
    let mut groups: IndexMap<Vec<Cow<'_, str>>, Vec<usize>> = IndexMap::new();
    for (i, r) in records.iter().enumerate().filter(|(i, _)| eligible[*i]) {
        let key = fields.iter().map(|f| r.metadata.value(*f)).collect();
        groups.entry(key).or_default().push(i);
    }

    let mut selected = vec![false; records.len()];
    for members in groups.values_mut() {
        if by_date {
            members.sort_by_key(|&i| records[i].metadata.collection_date);
        } else {
            members.sort_by(|&a, &b| {
                records[a]
                    .metadata
                    .value(params.sort_by)
                    .cmp(&records[b].metadata.value(params.sort_by))
            });
        }
        for i in params.keep.select(members) {
            selected[i] = true;
        }
    }

    let mut outcome = StageOutcome::default();
    for (i, r) in records.iter().enumerate() {
        if !eligible[i] {
            outcome.excluded.push(r.raw_header.clone());
        } else if selected[i] {
            outcome.kept.push(r.clone());
        } else {
            outcome.removed.push(r.raw_header.clone());
        }
    }
    log::debug!(
        "temporal sampling ({} groups, sort by {}, keep {}): kept {}, removed {}, excluded {}",
        groups.len(),
        params.sort_by,
        params.keep,
        outcome.kept.len(),
        outcome.removed.len(),
        outcome.excluded.len()
    );
    if !outcome.excluded.is_empty() {
        let note = format!("{} undated records excluded", outcome.excluded.len());
        return Ok(outcome.with_advisory(note));
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Metadata;
    use chrono::NaiveDate;

    fn rec(header: &str, location: &str, host: &str, date: Option<(i32, u32, u32)>) -> Record {
        Record::new(
            header,
            "ACGT",
            Metadata {
                location: Some(location.to_string()),
                host: Some(host.to_string()),
                collection_date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
                ..Default::default()
            },
        )
    }

    fn headers(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.raw_header.as_str()).collect()
    }

    fn by(group_by: GroupBy, sort_by: Field, keep: KeepPolicy) -> TemporalSampling {
        TemporalSampling {
            group_by,
            sort_by,
            keep,
        }
    }

    #[test]
    fn keep_both_takes_earliest_and_latest_per_group() {
        let recs = vec![
            rec(">mid", "Vietnam", "Duck", Some((2005, 6, 1))),
            rec(">late", "Vietnam", "Chicken", Some((2007, 1, 1))),
            rec(">early", "Vietnam", "Duck", Some((2004, 2, 1))),
            rec(">solo", "Egypt", "Chicken", Some((2010, 1, 1))),
        ];
        let out = sample(&recs, &by(GroupBy::Location, Field::Date, KeepPolicy::Both)).unwrap();
        assert_eq!(headers(&out.kept), vec![">late", ">early", ">solo"]);
        assert_eq!(out.removed, vec![">mid".to_string()]);
    }

    #[test]
    fn keep_both_on_single_member_group_keeps_one() {
        let recs = vec![rec(">only", "Laos", "Duck", Some((2020, 1, 1)))];
        let out = sample(&recs, &by(GroupBy::LocationHost, Field::Date, KeepPolicy::Both)).unwrap();
        assert_eq!(out.kept.len(), 1);
    }

    #[test]
    fn first_and_last_policies() {
        let recs = vec![
            rec(">b", "X", "Duck", Some((2001, 1, 1))),
            rec(">a", "X", "Duck", Some((2000, 1, 1))),
            rec(">c", "X", "Duck", Some((2002, 1, 1))),
        ];
        let first = sample(&recs, &by(GroupBy::Universal, Field::Date, KeepPolicy::First)).unwrap();
        assert_eq!(headers(&first.kept), vec![">a"]);
        let last = sample(&recs, &by(GroupBy::Universal, Field::Date, KeepPolicy::Last)).unwrap();
        assert_eq!(headers(&last.kept), vec![">c"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let recs = vec![
            rec(">first", "X", "Duck", Some((2001, 1, 1))),
            rec(">second", "X", "Duck", Some((2001, 1, 1))),
            rec(">third", "X", "Duck", Some((2001, 1, 1))),
        ];
        let out = sample(&recs, &by(GroupBy::Location, Field::Date, KeepPolicy::Both)).unwrap();
        assert_eq!(headers(&out.kept), vec![">first", ">third"]);
    }

    #[test]
    fn date_sort_excludes_undated_records() {
        let recs = vec![
            rec(">dated", "X", "Duck", Some((2001, 1, 1))),
            rec(">undated", "X", "Duck", None),
        ];
        let out = sample(&recs, &by(GroupBy::Location, Field::Date, KeepPolicy::Both)).unwrap();
        assert_eq!(headers(&out.kept), vec![">dated"]);
        assert!(out.removed.is_empty());
        assert_eq!(out.excluded, vec![">undated".to_string()]);
        assert!(out.advisory.is_some());
    }

    #[test]
    fn date_sort_with_no_dates_is_an_error() {
        let recs = vec![rec(">undated", "X", "Duck", None)];
        let err = sample(&recs, &TemporalSampling::default()).unwrap_err();
        assert!(matches!(err, FlowError::NoDatedRecords));
    }

    #[test]
    fn textual_sort_keeps_undated_records() {
        let recs = vec![
            rec(">zeta", "X", "Turkey", None),
            rec(">alpha", "X", "Chicken", None),
            rec(">mu", "X", "Duck", Some((2001, 1, 1))),
        ];
        let out = sample(&recs, &by(GroupBy::Location, Field::Host, KeepPolicy::Both)).unwrap();
        assert_eq!(headers(&out.kept), vec![">zeta", ">alpha"]);
        assert_eq!(out.removed, vec![">mu".to_string()]);
        assert!(out.excluded.is_empty());
    }

    #[test]
    fn month_clade_grouping_ignores_the_year() {
        let mut recs = vec![
            rec(">jan05", "X", "Duck", Some((2005, 1, 10))),
            rec(">jan07", "X", "Duck", Some((2007, 1, 10))),
            rec(">feb05", "X", "Duck", Some((2005, 2, 10))),
        ];
        for r in &mut recs {
            r.metadata.clade = Some("1".to_string());
        }
        let params = by(GroupBy::LocationHostMonthClade, Field::Date, KeepPolicy::First);
        let out = sample(&recs, &params).unwrap();
        assert_eq!(headers(&out.kept), vec![">jan05", ">feb05"]);
        assert_eq!(out.removed, vec![">jan07".to_string()]);
    }

    #[test]
    fn custom_grouping_by_field_names() {
        let group_by = GroupBy::custom(&["host"]).unwrap();
        let recs = vec![
            rec(">a", "X", "Duck", Some((2001, 1, 1))),
            rec(">b", "Y", "Duck", Some((2002, 1, 1))),
            rec(">c", "Z", "Swine", Some((2003, 1, 1))),
        ];
        let out = sample(&recs, &by(group_by, Field::Date, KeepPolicy::First)).unwrap();
        assert_eq!(headers(&out.kept), vec![">a", ">c"]);
    }

    #[test]
    fn unknown_grouping_literals_are_rejected() {
        assert!(matches!(
            "continent".parse::<GroupBy>(),
            Err(FlowError::UnknownGrouping(_))
        ));
        assert!(matches!(
            "custom:host,colour".parse::<GroupBy>(),
            Err(FlowError::UnknownField(f)) if f == "colour"
        ));
        assert!("custom:".parse::<GroupBy>().is_err());
        assert_eq!(
            "custom:location, month".parse::<GroupBy>().unwrap(),
            GroupBy::Custom(vec![Field::Location, Field::Month])
        );
    }

    #[test]
    fn keep_policy_literals() {
        assert_eq!("FIRST".parse::<KeepPolicy>().unwrap(), KeepPolicy::First);
        assert!("middle".parse::<KeepPolicy>().is_err());
    }
}
