//! Error types for the fastaflow engine.
//!
//! Library code returns [`FlowError`] for operation-level failures; the CLI
//! wraps these in `anyhow::Result` with file context. Problems found while
//! scanning FASTA text are never fatal and are collected as [`ParseError`]
//! values next to the parsed records.

use std::path::PathBuf;
use thiserror::Error;

/// Operation-level failure of a stage, config load or file operation.
///
/// A stage returning one of these has not produced a result; callers keep
/// their previous record collection.
#[derive(Debug, Error)]
pub enum FlowError {
    /// A metadata field name that no record carries.
    #[error("unknown metadata field '{0}'")]
    UnknownField(String),

    /// A grouping literal that is not one of the recognised groupings.
    #[error("unknown grouping '{0}' (expected location, host, clade, location_host, location_host_month_clade, none or custom:<fields>)")]
    UnknownGrouping(String),

    /// A keep-policy literal other than first/last/both.
    #[error("unknown keep policy '{0}' (expected first, last or both)")]
    UnknownKeepPolicy(String),

    /// Sorting by date left no records to sample.
    #[error("no records with a collection date remain; nothing to sample")]
    NoDatedRecords,

    /// A parameter outside its valid domain.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Pipeline configuration could not be read or understood.
    #[error("invalid pipeline config: {0}")]
    Config(String),

    /// I/O error with path context.
    #[error("I/O error during {operation} on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl FlowError {
    pub fn io(path: impl Into<PathBuf>, operation: &'static str, source: std::io::Error) -> Self {
        FlowError::Io {
            path: path.into(),
            operation,
            source,
        }
    }
}

/// Non-fatal problem found while scanning FASTA text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A header with no sequence symbols after normalisation.
    #[error("line {line}: header '{header}' has an empty sequence")]
    EmptySequence { line: usize, header: String },

    /// Sequence data seen before the first header line.
    #[error("line {line}: sequence data before any header")]
    SequenceBeforeHeader { line: usize },
}

pub type Result<T> = std::result::Result<T, FlowError>;
