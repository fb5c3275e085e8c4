//! Dataset summaries and the analysis report.

use crate::distribution::{count, sorted_by_count};
use crate::record::{Field, Record};
use crate::stage::{LogEntry, Pipeline};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt::Write as _;

/// Size overview of a record collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub records: usize,
    pub total_bases: usize,
    pub mean_length: f64,
    pub total_mib: f64,
}

impl DatasetSummary {
    pub fn of(records: &[Record]) -> Self {
        let total_bases: usize = records.iter().map(|r| r.sequence.len()).sum();
        let mean_length = if records.is_empty() {
            0.0
        } else {
            total_bases as f64 / records.len() as f64
        };
        DatasetSummary {
            records: records.len(),
            total_bases,
            mean_length,
            total_mib: total_bases as f64 / 1024.0 / 1024.0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated: String,
    pub original: usize,
    pub total: usize,
    pub removed: usize,
    pub summary: DatasetSummary,
    pub log: Vec<LogEntry>,
    pub subtype_distribution: IndexMap<String, usize>,
}

impl Report {
    /// Snapshot of a pipeline, stamped with the local time.
    pub fn from_pipeline(pipeline: &Pipeline) -> Self {
        let generated = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        Report::with_timestamp(pipeline, generated)
    }

    pub fn with_timestamp(pipeline: &Pipeline, generated: impl Into<String>) -> Self {
        let records = pipeline.records();
        Report {
            generated: generated.into(),
            original: pipeline.original_count(),
            total: records.len(),
            removed: pipeline.original_count().saturating_sub(records.len()),
            summary: DatasetSummary::of(records),
            log: pipeline.log().to_vec(),
            subtype_distribution: count(records, Field::Subtype),
        }
    }

    pub fn to_text(&self) -> String {
        let rule = "=".repeat(70);
        let mut out = String::new();
        let _ = writeln!(out, "{rule}\nFASTA Analysis Report\nGenerated: {}\n{rule}", self.generated);
        let _ = writeln!(out, "\nTotal Sequences: {}", self.total);
        let _ = writeln!(out, "Original Sequences: {}", self.original);
        let _ = writeln!(out, "Sequences Removed: {}", self.removed);
        let _ = writeln!(
            out,
            "Mean Length: {:.0} bp\nTotal Size: {:.2} MB",
            self.summary.mean_length, self.summary.total_mib
        );
        let _ = writeln!(out, "\n{rule}\nAnalysis Log:\n{rule}");
        for entry in &self.log {
            let _ = writeln!(out, "{entry}");
        }
        let _ = writeln!(out, "\n{rule}\nSubtype Distribution:\n{rule}");
        for (subtype, n) in sorted_by_count(&self.subtype_distribution) {
            let _ = writeln!(out, "{subtype}: {n}");
        }
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
