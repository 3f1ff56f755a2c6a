use std::io::{self, Write};

use stabrs_core::models::{Interval, RecordWrite};

use crate::error::{FormatError, ParseError, Result};
use crate::format::Format;
use crate::reader::LineSource;

/// A VCF data line. The interval covers the reference allele: `[POS-1, POS-1+len(REF))`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VcfRecord {
    pub chrom: String,
    /// 1-based position as written in the file.
    pub pos: u32,
    pub id: String,
    pub reference: String,
    pub alternate: String,
    line: String,
}

impl VcfRecord {
    pub fn parse(line: &str) -> std::result::Result<Self, ParseError> {
        let mut fields = line.split('\t');
        let mut next = |name: &'static str| {
            fields
                .next()
                .filter(|f| !f.is_empty())
                .ok_or(ParseError::MissingField(name))
        };

        let chrom = next("CHROM")?.to_string();
        let pos_str = next("POS")?;
        let id = next("ID")?.to_string();
        let reference = next("REF")?.to_string();
        let alternate = next("ALT")?.to_string();

        let pos = pos_str
            .parse::<u32>()
            .map_err(|_| ParseError::number("POS", pos_str))?;
        if pos == 0 {
            return Err(ParseError::ZeroPosition("POS"));
        }
        u32::try_from(reference.len())
            .ok()
            .and_then(|len| (pos - 1).checked_add(len))
            .ok_or(ParseError::OutOfRange("REF allele"))?;

        Ok(VcfRecord {
            chrom,
            pos,
            id,
            reference,
            alternate,
            line: line.to_string(),
        })
    }

    /// The original line.
    pub fn as_str(&self) -> &str {
        &self.line
    }
}

impl Interval for VcfRecord {
    fn chrom(&self) -> &str {
        &self.chrom
    }

    fn start(&self) -> u32 {
        self.pos - 1
    }

    fn end(&self) -> u32 {
        self.start() + self.reference.len() as u32
    }
}

impl RecordWrite for VcfRecord {
    fn write_record<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "{}", self.line)
    }
}

/// Meta (`##`) lines and the `#CHROM` column line, kept for the output.
pub(crate) fn read_header(src: &mut LineSource) -> Result<Vec<String>> {
    Ok(src.take_while(|line| line.starts_with('#'))?)
}

pub(crate) fn read_record(src: &mut LineSource) -> Result<Option<VcfRecord>> {
    let Some(line) = src.next_content_line(|line| line.starts_with('#'))? else {
        return Ok(None);
    };
    VcfRecord::parse(&line)
        .map(Some)
        .map_err(|e| FormatError::malformed(Format::Vcf, src.line_no(), e))
}
