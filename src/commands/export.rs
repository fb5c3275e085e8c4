//! Terminal consumers: `accessions` and `distribution`.

use super::InputArgs;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use fastaflow::seqio::write_lines;
use fastaflow::{accession, distribution, Field};
use std::io::Write;
use std::path::PathBuf;

/// Extract EPI_ISL accessions, one per line, first-seen order.
#[derive(Args, Debug, Clone)]
pub struct AccessionsArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output text file
    #[arg(short = 'o', long = "output", value_name = "TXT")]
    pub output: PathBuf,
}

pub fn run_accessions(args: AccessionsArgs) -> Result<()> {
    let records = args.input.load()?;
    let accessions = accession::extract(&records);
    if accessions.is_empty() {
        return Err(anyhow!("No accession numbers found in {} records", records.len()));
    }
    write_lines(&accessions, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    eprintln!(
        "Wrote {} accessions to {}",
        accessions.len(),
        args.output.display()
    );
    Ok(())
}

/// Count records per value of a metadata field.
#[derive(Args, Debug, Clone)]
pub struct DistributionArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Field to tally (type, segment, clade, host, location, year, month, ...)
    #[arg(short = 'f', long = "field", value_name = "FIELD", default_value = "type")]
    pub field: Field,

    /// Emit JSON instead of tab-separated rows
    #[arg(long = "json")]
    pub json: bool,

    /// Output path (stdout when omitted)
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

pub fn run_distribution(args: DistributionArgs) -> Result<()> {
    let records = args.input.load()?;
    let counts = distribution::count(&records, args.field);

    let text = if args.json {
        serde_json::to_string_pretty(&counts)? + "\n"
    } else {
        let mut rows = format!("{}\tcount\n", args.field);
        for (label, n) in distribution::sorted_by_count(&counts) {
            rows.push_str(&format!("{}\t{}\n", label, n));
        }
        rows
    };

    match &args.output {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => std::io::stdout().write_all(text.as_bytes())?,
    }
    Ok(())
}
