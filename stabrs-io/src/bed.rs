use std::io::{self, Write};

use stabrs_core::models::{Interval, RecordWrite, Region};

use crate::error::{FormatError, ParseError, Result};
use crate::format::Format;
use crate::reader::LineSource;

/// A BED line: the parsed [`Region`] plus the line as it was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BedRecord {
    pub region: Region,
    line: String,
}

impl BedRecord {
    pub fn parse(line: &str) -> std::result::Result<Self, ParseError> {
        Ok(BedRecord {
            region: line.parse::<Region>()?,
            line: line.to_string(),
        })
    }

    /// The original line.
    pub fn as_str(&self) -> &str {
        &self.line
    }
}

impl Interval for BedRecord {
    fn chrom(&self) -> &str {
        &self.region.chr
    }

    fn start(&self) -> u32 {
        self.region.start
    }

    fn end(&self) -> u32 {
        self.region.end
    }
}

impl RecordWrite for BedRecord {
    fn write_record<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "{}", self.line)
    }
}

fn is_header(line: &str) -> bool {
    line.starts_with('#') || line.starts_with("track") || line.starts_with("browser")
}

/// BED headers (`#`, `track`, `browser`) are dropped, not carried to the output.
pub(crate) fn read_header(src: &mut LineSource) -> Result<Vec<String>> {
    src.take_while(|line| line.trim().is_empty() || is_header(line))?;
    Ok(Vec::new())
}

pub(crate) fn read_record(src: &mut LineSource) -> Result<Option<BedRecord>> {
    let Some(line) = src.next_content_line(is_header)? else {
        return Ok(None);
    };
    BedRecord::parse(&line)
        .map(Some)
        .map_err(|e| FormatError::malformed(Format::Bed, src.line_no(), e))
}
