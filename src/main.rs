//! fastaflow: viral surveillance FASTA CLI
//!
//! Subcommands:
//! - `convert`: rewrite headers to the canonical pipe format
//! - `quality`, `dedup`, `subtype`: filters
//! - `temporal`, `clade`: diversity sampling
//! - `accessions`, `distribution`: terminal consumers
//! - `run`: apply a TOML pipeline of stages and write a report

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{convert, export, filter, run, sample};

/// fastaflow CLI
#[derive(Parser, Debug)]
#[command(name = "fastaflow")]
#[command(author, version, about = "Parse, filter and sample viral surveillance FASTA files", long_about = None)]
struct Cli {
    /// Log progress (info level); RUST_LOG overrides
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Rewrite headers to IsolateName|Type|Segment|Date|ID|Clade|Host|Location
    Convert(convert::ConvertArgs),
    /// Remove records below length or above N-run thresholds
    Quality(filter::QualityArgs),
    /// Remove duplicate sequences
    Dedup(filter::DedupArgs),
    /// Keep records matching target subtypes
    Subtype(filter::SubtypeArgs),
    /// Keep the earliest/latest record per metadata group
    Temporal(sample::TemporalArgs),
    /// Keep the earliest/latest record per month within target clades
    Clade(sample::CladeArgs),
    /// Extract EPI_ISL accession numbers
    Accessions(export::AccessionsArgs),
    /// Count records per metadata value
    Distribution(export::DistributionArgs),
    /// Run a configured pipeline of stages
    Run(run::RunArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    fastaflow::logging::init_logger(cli.verbose);
    match cli.command {
        Commands::Convert(args) => convert::run(args)?,
        Commands::Quality(args) => filter::run_quality(args)?,
        Commands::Dedup(args) => filter::run_dedup(args)?,
        Commands::Subtype(args) => filter::run_subtype(args)?,
        Commands::Temporal(args) => sample::run_temporal(args)?,
        Commands::Clade(args) => sample::run_clade(args)?,
        Commands::Accessions(args) => export::run_accessions(args)?,
        Commands::Distribution(args) => export::run_distribution(args)?,
        Commands::Run(args) => run::run(args)?,
    }
    Ok(())
}
