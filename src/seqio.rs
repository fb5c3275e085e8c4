//! File input and output: FASTA (optionally gzipped) and plain line lists.

use crate::error::{FlowError, Result};
use crate::parser::{parse_reader, ParseOutcome};
use crate::record::Record;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

fn is_gz(path: &Path) -> bool {
    path.extension().map(|e| e.eq_ignore_ascii_case("gz")).unwrap_or(false)
}

fn open_maybe_gz(path: &Path) -> Result<Box<dyn BufRead>> {
    let f = File::open(path).map_err(|e| FlowError::io(path, "open", e))?;
    if is_gz(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(f))))
    } else {
        Ok(Box::new(BufReader::new(f)))
    }
}

fn create_maybe_gz(path: &Path) -> Result<Box<dyn Write>> {
    let f = File::create(path).map_err(|e| FlowError::io(path, "create", e))?;
    if is_gz(path) {
        Ok(Box::new(BufWriter::new(GzEncoder::new(f, Compression::default()))))
    } else {
        Ok(Box::new(BufWriter::new(f)))
    }
}

/// Parse one FASTA file (plain or `.gz`), streaming it line by line.
pub fn read_fasta<P: AsRef<Path>>(path: P) -> Result<ParseOutcome> {
    let path = path.as_ref();
    let reader = open_maybe_gz(path)?;
    parse_reader(reader).map_err(|e| FlowError::io(path, "read", e))
}

/// Parse several files and concatenate their records in argument order.
pub fn read_fasta_files<P: AsRef<Path>>(paths: &[P]) -> Result<ParseOutcome> {
    let mut all = ParseOutcome::default();
    for path in paths {
        let outcome = read_fasta(path)?;
        log::info!(
            "{}: {} records, {} problems",
            path.as_ref().display(),
            outcome.records.len(),
            outcome.errors.len()
        );
        all.extend(outcome);
    }
    Ok(all)
}

/// Write records as FASTA, wrapping sequence lines to `line_width`
/// (0 leaves each sequence on one line). `.gz` paths are gzip-compressed.
pub fn write_fasta<P: AsRef<Path>>(records: &[Record], path: P, line_width: usize) -> Result<()> {
    let path = path.as_ref();
    let mut fh = create_maybe_gz(path)?;
    write_fasta_to(&mut fh, records, line_width)
        .and_then(|_| fh.flush())
        .map_err(|e| FlowError::io(path, "write", e))
}

/// Write records as FASTA to any writer.
pub fn write_fasta_to<W: Write + ?Sized>(out: &mut W, records: &[Record], line_width: usize) -> std::io::Result<()> {
    let lw = if line_width == 0 { usize::MAX } else { line_width };
    for rec in records {
        writeln!(out, "{}", rec.raw_header)?;
        let seq = rec.sequence.as_bytes();
        let mut start = 0usize;
        while start < seq.len() {
            let end = start.saturating_add(lw).min(seq.len());
            out.write_all(&seq[start..end])?;
            writeln!(out)?;
            start = end;
        }
    }
    Ok(())
}

/// Write one item per line (accession lists, removed headers).
pub fn write_lines<P: AsRef<Path>, S: AsRef<str>>(lines: &[S], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut fh = create_maybe_gz(path)?;
    lines
        .iter()
        .try_for_each(|l| writeln!(fh, "{}", l.as_ref()))
        .and_then(|_| fh.flush())
        .map_err(|e| FlowError::io(path, "write", e))
}
