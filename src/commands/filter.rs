//! Filtering subcommands: `quality`, `dedup` and `subtype`.

use super::{InputArgs, OutputArgs};
use anyhow::Result;
use clap::{Args, ValueEnum};
use fastaflow::{dedup, quality, subtype, QualityThresholds};

#[derive(Args, Debug, Clone)]
pub struct QualityArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Minimum sequence length (shorter records are removed)
    #[arg(long = "min-length", value_name = "INT", default_value_t = 200)]
    pub min_length: usize,

    /// Longest allowed run of N
    #[arg(long = "max-n-run", value_name = "INT", default_value_t = 100)]
    pub max_n_run: usize,
}

pub fn run_quality(args: QualityArgs) -> Result<()> {
    let records = args.input.load()?;
    let thresholds = QualityThresholds {
        min_length: args.min_length,
        max_n_run: args.max_n_run,
    };
    let outcome = quality::filter(&records, &thresholds);
    args.output.write_outcome(&outcome)
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupMode {
    /// Identical sequences collapse to the first record
    Basic,
    /// Identical sequences collapse to one record per subtype
    Advanced,
}

#[derive(Args, Debug, Clone)]
pub struct DedupArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Deduplication policy
    #[arg(long = "mode", value_enum, default_value_t = DedupMode::Basic)]
    pub mode: DedupMode,
}

pub fn run_dedup(args: DedupArgs) -> Result<()> {
    let records = args.input.load()?;
    let outcome = match args.mode {
        DedupMode::Basic => dedup::basic(&records),
        DedupMode::Advanced => dedup::advanced(&records),
    };
    args.output.write_outcome(&outcome)
}

#[derive(Args, Debug, Clone)]
pub struct SubtypeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Target subtypes, comma separated (e.g. H5N1,H3N2)
    #[arg(short = 't', long = "targets", value_name = "LIST", value_delimiter = ',')]
    pub targets: Vec<String>,
}

pub fn run_subtype(args: SubtypeArgs) -> Result<()> {
    let records = args.input.load()?;
    let outcome = subtype::filter(&records, args.targets.as_slice());
    args.output.write_outcome(&outcome)
}
