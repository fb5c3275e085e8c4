//! fastaflow: parsing and sampling engine for viral surveillance FASTA files.
//!
//! Raw text is parsed into [`Record`]s with header metadata extracted from
//! pipe-delimited or legacy slash-style headers. Records then flow through
//! any sequence of stages (quality filter, deduplication, subtype filter,
//! temporal diversity sampling, clade monthly sampling), each a pure function
//! returning the kept records and the removed headers. Accession lists,
//! distribution counts and reports are computed from the final collection.
//!
//! ```
//! use fastaflow::{parser, quality, QualityThresholds};
//!
//! let text = ">A/chicken/Vietnam/10/2005|H5N1|HA|2005-01-01|EPI123|2.3.4\nACGTNNNNACGT\n";
//! let parsed = parser::parse(text);
//! let out = quality::filter(&parsed.records, &QualityThresholds { min_length: 10, max_n_run: 4 });
//! assert_eq!(out.kept.len(), 1);
//! assert_eq!(out.kept[0].metadata.host.as_deref(), Some("Chicken"));
//! ```

pub mod accession;
pub mod cache;
pub mod clade;
pub mod config;
pub mod dates;
pub mod dedup;
pub mod distribution;
pub mod error;
pub mod header;
pub mod logging;
pub mod parser;
pub mod quality;
pub mod record;
pub mod report;
pub mod seqio;
pub mod stage;
pub mod subtype;
pub mod temporal;

pub use clade::CladeSampling;
pub use error::{FlowError, ParseError};
pub use parser::ParseOutcome;
pub use quality::QualityThresholds;
pub use record::{Field, Metadata, Record, UNKNOWN};
pub use stage::{Pipeline, Stage, StageOutcome};
pub use temporal::{GroupBy, KeepPolicy, TemporalSampling};
