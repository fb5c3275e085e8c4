//! Sampling subcommands: `temporal` and `clade`.

use super::{InputArgs, OutputArgs};
use anyhow::{Context, Result};
use clap::Args;
use fastaflow::{clade, temporal, CladeSampling, Field, GroupBy, KeepPolicy, TemporalSampling};

#[derive(Args, Debug, Clone)]
pub struct TemporalArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Grouping: location, host, clade, location_host, location_host_month_clade, none
    #[arg(long = "group-by", value_name = "GROUPING", default_value = "location_host")]
    pub group_by: GroupBy,

    /// Group on these metadata fields instead (comma separated)
    #[arg(long = "custom-fields", value_name = "FIELDS", value_delimiter = ',')]
    pub custom_fields: Vec<String>,

    /// Field ordering each group (date, location, host, clade, ...)
    #[arg(long = "sort-by", value_name = "FIELD", default_value = "date")]
    pub sort_by: Field,

    /// Records kept per group: first, last or both
    #[arg(long = "keep", value_name = "POLICY", default_value = "both")]
    pub keep: KeepPolicy,
}

pub fn run_temporal(args: TemporalArgs) -> Result<()> {
    let group_by = if args.custom_fields.is_empty() {
        args.group_by.clone()
    } else {
        GroupBy::custom(args.custom_fields.as_slice())?
    };
    let params = TemporalSampling {
        group_by,
        sort_by: args.sort_by,
        keep: args.keep,
    };
    let records = args.input.load()?;
    let outcome = temporal::sample(&records, &params).context("Temporal sampling failed")?;
    args.output.write_outcome(&outcome)
}

#[derive(Args, Debug, Clone)]
pub struct CladeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Target clades, comma separated (e.g. 2.3.4.4b)
    #[arg(short = 'c', long = "clades", value_name = "LIST", value_delimiter = ',', required = true)]
    pub clades: Vec<String>,

    /// Records kept per month: first, last or both
    #[arg(long = "keep", value_name = "POLICY", default_value = "both")]
    pub keep: KeepPolicy,

    /// Bucket each clade separately instead of pooling them
    #[arg(long = "separately")]
    pub separately: bool,
}

pub fn run_clade(args: CladeArgs) -> Result<()> {
    let params = CladeSampling {
        clades: args.clades.clone(),
        keep: args.keep,
        separately: args.separately,
    };
    let records = args.input.load()?;
    let outcome = clade::sample(&records, &params).context("Clade sampling failed")?;
    args.output.write_outcome(&outcome)
}
