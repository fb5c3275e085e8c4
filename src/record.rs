//! The record type threaded through every stage.
//!
//! Categorical metadata is `Option<String>`: `None` is the "Unknown" marker
//! and renders as [`UNKNOWN`] wherever a textual value is needed (grouping
//! keys, distribution labels). The collection date is a plain
//! `Option<NaiveDate>`, already canonicalised to the first day of its
//! year/month when the source literal was coarser than a full date.

use crate::error::FlowError;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Rendering of an unset categorical field.
pub const UNKNOWN: &str = "Unknown";

/// Normalise a raw metadata token: trimmed, with empty and "unknown" mapped to `None`.
pub fn known(value: &str) -> Option<String> {
    let v = value.trim();
    if v.is_empty() || v.eq_ignore_ascii_case(UNKNOWN) {
        None
    } else {
        Some(v.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub isolate_name: Option<String>,
    /// Subtype, e.g. `H5N1` (the `type` field of the header schema).
    pub subtype: Option<String>,
    pub segment: Option<String>,
    pub collection_date: Option<NaiveDate>,
    /// Accession of the isolate, e.g. `EPI_ISL_402124`.
    pub isolate_id: Option<String>,
    pub clade: Option<String>,
    pub host: Option<String>,
    pub location: Option<String>,
}

impl Metadata {
    /// Textual value of `field`, with [`UNKNOWN`] for unset values.
    ///
    /// Dates render as ISO `YYYY-MM-DD`, `Year` as `YYYY`, `Month` as `YYYY-MM`
    /// and `MonthOfYear` as `MM`.
    pub fn value(&self, field: Field) -> Cow<'_, str> {
        let text = match field {
            Field::IsolateName => self.isolate_name.as_deref(),
            Field::Subtype => self.subtype.as_deref(),
            Field::Segment => self.segment.as_deref(),
            Field::IsolateId => self.isolate_id.as_deref(),
            Field::Clade => self.clade.as_deref(),
            Field::Host => self.host.as_deref(),
            Field::Location => self.location.as_deref(),
            Field::Date | Field::Year | Field::Month | Field::MonthOfYear => {
                return match self.calendar_value(field) {
                    Some(v) => Cow::Owned(v),
                    None => Cow::Borrowed(UNKNOWN),
                };
            }
        };
        Cow::Borrowed(text.unwrap_or(UNKNOWN))
    }

    /// Date-derived value of a calendar field, `None` when the record is undated.
    pub fn calendar_value(&self, field: Field) -> Option<String> {
        let date = self.collection_date?;
        match field {
            Field::Date => Some(date.format("%Y-%m-%d").to_string()),
            Field::Year => Some(format!("{:04}", date.year())),
            Field::Month => Some(format!("{:04}-{:02}", date.year(), date.month())),
            Field::MonthOfYear => Some(format!("{:02}", date.month())),
            _ => None,
        }
    }
}

/// One FASTA record: its header line, normalised sequence and parsed metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Header line as read, including the leading `>`.
    pub raw_header: String,
    /// Uppercase sequence with whitespace and gap symbols removed; never empty.
    pub sequence: String,
    pub metadata: Metadata,
}

impl Record {
    pub fn new(raw_header: impl Into<String>, sequence: impl Into<String>, metadata: Metadata) -> Self {
        Record {
            raw_header: raw_header.into(),
            sequence: sequence.into(),
            metadata,
        }
    }

    /// Header text without the leading marker.
    pub fn header_text(&self) -> &str {
        self.raw_header
            .strip_prefix('>')
            .unwrap_or(&self.raw_header)
            .trim()
    }
}

/// Metadata axis addressable by name (grouping, sorting, distribution counts).
///
/// `Year`, `Month` and `MonthOfYear` are virtual fields computed from the
/// collection date. `Month` keeps the year; `MonthOfYear` is the bare 1-12
/// calendar month, so January 2005 and January 2007 share a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    IsolateName,
    Subtype,
    Segment,
    Date,
    IsolateId,
    Clade,
    Host,
    Location,
    Year,
    Month,
    MonthOfYear,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::IsolateName => "isolate_name",
            Field::Subtype => "type",
            Field::Segment => "segment",
            Field::Date => "date",
            Field::IsolateId => "isolate_id",
            Field::Clade => "clade",
            Field::Host => "host",
            Field::Location => "location",
            Field::Year => "year",
            Field::Month => "month",
            Field::MonthOfYear => "month_of_year",
        }
    }

    /// True for fields whose value is derived from the collection date.
    pub fn is_calendar(&self) -> bool {
        matches!(
            self,
            Field::Date | Field::Year | Field::Month | Field::MonthOfYear
        )
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field = match s.trim().to_ascii_lowercase().as_str() {
            "isolate_name" | "isolate" | "name" => Field::IsolateName,
            "type" | "subtype" => Field::Subtype,
            "segment" => Field::Segment,
            "date" | "collection_date" => Field::Date,
            "isolate_id" | "id" | "accession" => Field::IsolateId,
            "clade" => Field::Clade,
            "host" => Field::Host,
            "location" => Field::Location,
            "year" => Field::Year,
            "month" => Field::Month,
            "month_of_year" | "calendar_month" => Field::MonthOfYear,
            _ => return Err(FlowError::UnknownField(s.trim().to_string())),
        };
        Ok(field)
    }
}
