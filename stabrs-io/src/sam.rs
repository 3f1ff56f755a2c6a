use std::io::{self, Write};

use noodles::sam;
use noodles::sam::alignment::Record as AlignmentRecord;
use noodles::sam::alignment::record::Flags;

use stabrs_core::models::{Interval, RecordWrite};

use crate::error::{FormatError, ParseError, Result};
use crate::format::Format;
use crate::reader::LineSource;

/// A SAM alignment line. The interval is the reference span of the alignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamRecord {
    pub name: Option<String>,
    pub flags: Flags,
    pub reference_sequence_name: Option<String>,
    /// 0-based alignment start; `None` when POS is 0.
    pub alignment_start: Option<u32>,
    span: u32,
    line: String,
}

impl SamRecord {
    pub fn parse(line: &str) -> std::result::Result<Self, ParseError> {
        let mut reader = sam::io::Reader::new(line.as_bytes());
        let mut record = sam::Record::default();
        if reader.read_record(&mut record).map_err(ParseError::Sam)? == 0 {
            return Err(ParseError::MissingField("QNAME"));
        }

        let flags = record.flags().map_err(ParseError::Sam)?;
        // a CIGAR of `*` consumes no reference bases
        let span = match AlignmentRecord::alignment_span(&record) {
            Some(span) => span.map_err(ParseError::Sam)?,
            None => 0,
        };
        let alignment_start = match record.alignment_start() {
            Some(pos) => {
                let start = pos.map_err(ParseError::Sam)?.get() - 1;
                start
                    .checked_add(span)
                    .and_then(|end| u32::try_from(end).ok())
                    .ok_or(ParseError::OutOfRange("alignment"))?;
                Some(start as u32)
            }
            None => None,
        };

        Ok(SamRecord {
            name: record
                .name()
                .map(|name| String::from_utf8_lossy(name).into_owned()),
            flags,
            reference_sequence_name: record
                .reference_sequence_name()
                .map(|name| String::from_utf8_lossy(name).into_owned()),
            alignment_start,
            span: span as u32,
            line: line.to_string(),
        })
    }

    /// Unmapped reads have no reference interval and never take part in a query.
    pub fn is_unmapped(&self) -> bool {
        self.flags.is_unmapped()
            || self.reference_sequence_name.is_none()
            || self.alignment_start.is_none()
    }

    /// The original line.
    pub fn as_str(&self) -> &str {
        &self.line
    }
}

impl Interval for SamRecord {
    fn chrom(&self) -> &str {
        self.reference_sequence_name.as_deref().unwrap_or("*")
    }

    fn start(&self) -> u32 {
        self.alignment_start.unwrap_or(0)
    }

    fn end(&self) -> u32 {
        self.start() + self.span
    }
}

impl RecordWrite for SamRecord {
    fn write_record<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "{}", self.line)
    }
}

/// `@` header lines, kept for the output.
pub(crate) fn read_header(src: &mut LineSource) -> Result<Vec<String>> {
    Ok(src.take_while(|line| line.starts_with('@'))?)
}

/// Next mapped alignment; unmapped ones are skipped.
pub(crate) fn read_record(src: &mut LineSource) -> Result<Option<SamRecord>> {
    while let Some(line) = src.next_content_line(|line| line.starts_with('@'))? {
        let record = SamRecord::parse(&line)
            .map_err(|e| FormatError::malformed(Format::Sam, src.line_no(), e))?;
        if !record.is_unmapped() {
            return Ok(Some(record));
        }
    }
    Ok(None)
}
