//! Stage results, typed stage descriptions and the pipeline that threads them.
//!
//! Every stage is a pure function from a record slice to a [`StageOutcome`].
//! [`Pipeline`] holds the active collection and an explicit analysis log;
//! a stage that fails leaves the active collection as it was.

use crate::clade::{self, CladeSampling};
use crate::dedup;
use crate::error::Result;
use crate::header::convert_headers;
use crate::quality::{self, QualityThresholds};
use crate::record::Record;
use crate::subtype;
use crate::temporal::{self, TemporalSampling};
use serde::Serialize;
use std::fmt;

/// Result of applying one stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageOutcome {
    /// Records that survive, in input order.
    pub kept: Vec<Record>,
    /// Headers of records the stage rejected.
    pub removed: Vec<String>,
    /// Headers dropped before the stage's selection ran (e.g. undated
    /// records when sampling by date). Not counted in `removed`.
    pub excluded: Vec<String>,
    /// Caller-facing note for conditions that are not errors.
    pub advisory: Option<String>,
}

impl StageOutcome {
    /// Split `records` by a keep mask, preserving input order on both sides.
    pub fn from_mask(records: &[Record], keep: &[bool]) -> Self {
        let mut outcome = StageOutcome::default();
        for (rec, &k) in records.iter().zip(keep) {
            if k {
                outcome.kept.push(rec.clone());
            } else {
                outcome.removed.push(rec.raw_header.clone());
            }
        }
        outcome
    }

    /// The input returned untouched with an advisory.
    pub fn unchanged(records: &[Record], advisory: impl Into<String>) -> Self {
        StageOutcome {
            kept: records.to_vec(),
            advisory: Some(advisory.into()),
            ..Default::default()
        }
    }

    pub fn with_advisory(mut self, advisory: impl Into<String>) -> Self {
        self.advisory = Some(advisory.into());
        self
    }
}

/// A configured stage, ready to apply.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    ConvertHeaders,
    Quality(QualityThresholds),
    DedupBasic,
    DedupAdvanced,
    Subtype(Vec<String>),
    Temporal(TemporalSampling),
    Clade(CladeSampling),
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::ConvertHeaders => "convert headers",
            Stage::Quality(_) => "quality filter",
            Stage::DedupBasic => "deduplicate (sequence)",
            Stage::DedupAdvanced => "deduplicate (sequence + subtype)",
            Stage::Subtype(_) => "subtype filter",
            Stage::Temporal(_) => "temporal diversity sampling",
            Stage::Clade(_) => "clade monthly sampling",
        }
    }

    pub fn apply(&self, records: &[Record]) -> Result<StageOutcome> {
        let outcome = match self {
            Stage::ConvertHeaders => StageOutcome {
                kept: convert_headers(records),
                ..Default::default()
            },
            Stage::Quality(t) => quality::filter(records, t),
            Stage::DedupBasic => dedup::basic(records),
            Stage::DedupAdvanced => dedup::advanced(records),
            Stage::Subtype(targets) => subtype::filter(records, targets.as_slice()),
            Stage::Temporal(params) => temporal::sample(records, params)?,
            Stage::Clade(params) => clade::sample(records, params)?,
        };
        Ok(outcome)
    }
}

/// One line of the analysis log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub stage: String,
    pub input: usize,
    pub kept: usize,
    pub removed: usize,
    pub excluded: usize,
    pub advisory: Option<String>,
    pub error: Option<String>,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(err) = &self.error {
            return write!(f, "{}: failed ({}); {} records unchanged", self.stage, err, self.input);
        }
        write!(
            f,
            "{}: {} -> {} kept, {} removed",
            self.stage, self.input, self.kept, self.removed
        )?;
        if self.excluded > 0 {
            write!(f, ", {} excluded", self.excluded)?;
        }
        if let Some(note) = &self.advisory {
            write!(f, " ({})", note)?;
        }
        Ok(())
    }
}

/// Active record collection plus the log of stages applied to it.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    original_count: usize,
    records: Vec<Record>,
    log: Vec<LogEntry>,
}

impl Pipeline {
    pub fn new(records: Vec<Record>) -> Self {
        Pipeline {
            original_count: records.len(),
            records,
            log: Vec::new(),
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn original_count(&self) -> usize {
        self.original_count
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// Apply `stage`; on success the kept records become the active collection.
    ///
    /// Errors are logged and returned; the active collection is left untouched.
    pub fn apply(&mut self, stage: &Stage) -> Result<StageOutcome> {
        let input = self.records.len();
        match stage.apply(&self.records) {
            Ok(outcome) => {
                let entry = LogEntry {
                    stage: stage.name().to_string(),
                    input,
                    kept: outcome.kept.len(),
                    removed: outcome.removed.len(),
                    excluded: outcome.excluded.len(),
                    advisory: outcome.advisory.clone(),
                    error: None,
                };
                log::info!("{}", entry);
                self.log.push(entry);
                self.records = outcome.kept.clone();
                Ok(outcome)
            }
            Err(err) => {
                let entry = LogEntry {
                    stage: stage.name().to_string(),
                    input,
                    kept: input,
                    removed: 0,
                    excluded: 0,
                    advisory: None,
                    error: Some(err.to_string()),
                };
                log::warn!("{}", entry);
                self.log.push(entry);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::record::Field;
    use crate::temporal::{GroupBy, KeepPolicy};

    fn records() -> Vec<Record> {
        parse(">A/duck/Laos/1/2020|H5N6\nACGTACGT\n>A/duck/Laos/2/2020|H5N6\nACGTACGT\n>B/Texas/1/2019\nGGCC\n")
            .records
    }

    #[test]
    fn mask_split_preserves_order() {
        let recs = records();
        let out = StageOutcome::from_mask(&recs, &[false, true, false]);
        assert_eq!(out.kept.len(), 1);
        assert_eq!(out.kept[0].raw_header, ">A/duck/Laos/2/2020|H5N6");
        assert_eq!(
            out.removed,
            vec![">A/duck/Laos/1/2020|H5N6".to_string(), ">B/Texas/1/2019".to_string()]
        );
    }

    #[test]
    fn pipeline_threads_stages_and_logs() {
        let mut p = Pipeline::new(records());
        p.apply(&Stage::DedupBasic).unwrap();
        p.apply(&Stage::Quality(QualityThresholds {
            min_length: 5,
            max_n_run: 0,
        }))
        .unwrap();
        assert_eq!(p.original_count(), 3);
        assert_eq!(p.records().len(), 1);
        assert_eq!(p.log().len(), 2);
        assert_eq!(p.log()[0].removed, 1);
        assert_eq!(p.log()[1].to_string(), "quality filter: 2 -> 1 kept, 1 removed");
    }

    #[test]
    fn failing_stage_leaves_collection_untouched() {
        let mut p = Pipeline::new(records());
        let stage = Stage::Temporal(TemporalSampling {
            group_by: GroupBy::Location,
            sort_by: Field::Date,
            keep: KeepPolicy::Both,
        });
        assert!(p.apply(&stage).is_err());
        assert_eq!(p.records().len(), 3);
        assert!(p.log()[0].error.is_some());
    }
}
