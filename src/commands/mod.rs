//! Subcommand implementations and the argument groups they share.

pub mod convert;
pub mod export;
pub mod filter;
pub mod run;
pub mod sample;

use anyhow::{Context, Result};
use clap::Args;
use fastaflow::seqio::{read_fasta_files, write_fasta, write_lines};
use fastaflow::{Record, StageOutcome};
use std::path::PathBuf;

/// Input FASTA files, parsed and concatenated in order.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Input FASTA file(s) (optionally .gz)
    #[arg(short = 'i', long = "input", value_name = "FASTA", required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,
}

impl InputArgs {
    /// Parse all inputs; parse problems are reported as warnings, not failures.
    pub fn load(&self) -> Result<Vec<Record>> {
        let parsed = read_fasta_files(&self.inputs).context("Failed to read input FASTA")?;
        for err in &parsed.errors {
            log::warn!("{}", err);
        }
        if parsed.records.is_empty() {
            log::warn!("no records parsed from {} input file(s)", self.inputs.len());
        }
        Ok(parsed.records)
    }
}

/// Where a stage writes its kept records and removed headers.
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output FASTA path (.gz to compress)
    #[arg(short = 'o', long = "output", value_name = "FASTA")]
    pub output: PathBuf,

    /// Optional file listing removed headers, one per line
    #[arg(long = "removed", value_name = "TXT")]
    pub removed: Option<PathBuf>,

    /// Sequence line width (0 = unwrapped)
    #[arg(long = "line-width", value_name = "INT", default_value_t = 0)]
    pub line_width: usize,
}

impl OutputArgs {
    pub fn write_records(&self, records: &[Record]) -> Result<()> {
        write_fasta(records, &self.output, self.line_width)
            .with_context(|| format!("Failed to write {}", self.output.display()))
    }

    /// Write a stage outcome: kept records, then the removed list if requested.
    pub fn write_outcome(&self, outcome: &StageOutcome) -> Result<()> {
        if let Some(note) = &outcome.advisory {
            log::warn!("{}", note);
        }
        self.write_records(&outcome.kept)?;
        if let Some(path) = &self.removed {
            let mut removed = outcome.removed.clone();
            removed.extend(outcome.excluded.iter().cloned());
            write_lines(&removed, path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        eprintln!(
            "Kept {} records, removed {}{} -> {}",
            outcome.kept.len(),
            outcome.removed.len(),
            if outcome.excluded.is_empty() {
                String::new()
            } else {
                format!(", excluded {}", outcome.excluded.len())
            },
            self.output.display()
        );
        Ok(())
    }
}
