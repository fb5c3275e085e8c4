//! FASTA text scanner.
//!
//! Lines are consumed one at a time; only the record being assembled is
//! buffered. A `>` line starts a record, non-empty lines after it are
//! sequence. Problems (a header whose sequence is empty, sequence before any
//! header) are collected as [`ParseError`]s and scanning carries on.

use crate::error::ParseError;
use crate::header::extract_metadata;
use crate::record::Record;
use std::io::BufRead;

/// Records parsed from one text plus the non-fatal problems found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    pub records: Vec<Record>,
    pub errors: Vec<ParseError>,
}

impl ParseOutcome {
    /// Append another outcome, keeping record order.
    pub fn extend(&mut self, other: ParseOutcome) {
        self.records.extend(other.records);
        self.errors.extend(other.errors);
    }
}

/// Parse FASTA text held in memory.
pub fn parse(text: &str) -> ParseOutcome {
    let mut scanner = Scanner::default();
    for line in text.lines() {
        scanner.push_line(line);
    }
    scanner.finish()
}

/// Parse FASTA text from a reader, line by line.
pub fn parse_reader<R: BufRead>(reader: R) -> std::io::Result<ParseOutcome> {
    let mut scanner = Scanner::default();
    for line in reader.lines() {
        scanner.push_line(&line?);
    }
    Ok(scanner.finish())
}

#[derive(Default)]
struct Scanner {
    records: Vec<Record>,
    errors: Vec<ParseError>,
    /// Line number and text of the header being assembled.
    header: Option<(usize, String)>,
    seq: String,
    line_no: usize,
}

impl Scanner {
    fn push_line(&mut self, line: &str) {
        self.line_no += 1;
        let line = line.trim_end_matches(['\r', '\n']);
        if line.starts_with('>') {
            self.flush();
            self.header = Some((self.line_no, line.trim().to_string()));
        } else if line.trim().is_empty() {
            // blank lines separate nothing
        } else if self.header.is_none() {
            self.errors
                .push(ParseError::SequenceBeforeHeader { line: self.line_no });
        } else {
            self.seq.extend(
                line.chars()
                    .filter(|c| !c.is_whitespace() && *c != '-')
                    .map(|c| c.to_ascii_uppercase()),
            );
        }
    }

    fn flush(&mut self) {
        let Some((line, header)) = self.header.take() else {
            return;
        };
        if self.seq.is_empty() {
            self.errors.push(ParseError::EmptySequence { line, header });
            return;
        }
        let metadata = extract_metadata(&header);
        let sequence = std::mem::take(&mut self.seq);
        self.records.push(Record::new(header, sequence, metadata));
    }

    fn finish(mut self) -> ParseOutcome {
        self.flush();
        log::debug!(
            "parsed {} records ({} problems) from {} lines",
            self.records.len(),
            self.errors.len(),
            self.line_no
        );
        ParseOutcome {
            records: self.records,
            errors: self.errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_line_sequences_are_joined_and_normalised() {
        let out = parse(">r1\nac-gt\n  ACG T\n\n>r2\nnnnn\n");
        assert!(out.errors.is_empty());
        assert_eq!(out.records.len(), 2);
        assert_eq!(out.records[0].raw_header, ">r1");
        assert_eq!(out.records[0].sequence, "ACGTACGT");
        assert_eq!(out.records[1].sequence, "NNNN");
    }

    #[test]
    fn empty_sequence_is_reported_not_emitted() {
        let out = parse(">empty\n--\n>full\nACGT\n>trailing\n");
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].raw_header, ">full");
        assert_eq!(
            out.errors,
            vec![
                ParseError::EmptySequence {
                    line: 1,
                    header: ">empty".to_string()
                },
                ParseError::EmptySequence {
                    line: 5,
                    header: ">trailing".to_string()
                },
            ]
        );
    }

    #[test]
    fn sequence_before_header_is_reported() {
        let out = parse("ACGT\n>r1\nACGT\n");
        assert_eq!(out.errors, vec![ParseError::SequenceBeforeHeader { line: 1 }]);
        assert_eq!(out.records.len(), 1);
    }

    #[test]
    fn crlf_input_is_handled() {
        let out = parse(">r1|H3N2\r\nACGT\r\n");
        assert_eq!(out.records[0].raw_header, ">r1|H3N2");
        assert_eq!(out.records[0].sequence, "ACGT");
        assert_eq!(out.records[0].metadata.subtype.as_deref(), Some("H3N2"));
    }

    #[test]
    fn unreadable_date_token_leaves_date_unset() {
        let out = parse(">x|H5N1|HA|200é010\nACGT\n");
        assert!(out.errors.is_empty());
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].metadata.collection_date, None);
        assert_eq!(out.records[0].metadata.subtype.as_deref(), Some("H5N1"));
    }

    #[test]
    fn reader_and_text_agree() {
        let text = ">A/duck/Laos/1/2020|H5N6\nACGT\nTTGA\n>B/Texas/1/2019\nGGCC\n";
        let from_reader = parse_reader(text.as_bytes()).unwrap();
        assert_eq!(from_reader, parse(text));
    }
}
