use std::io::{self, Write};

use stabrs_core::models::{Interval, RecordWrite};

use crate::error::{FormatError, ParseError, Result};
use crate::format::Format;
use crate::reader::LineSource;

/// A chain: a `chain` header line and the ungapped block lines that follow it.
///
/// Header coordinates are 0-based half-open, so the interval on the target side is
/// `[t_start, t_end)` as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainRecord {
    pub score: i64,
    pub t_name: String,
    pub t_size: u32,
    pub t_strand: char,
    pub t_start: u32,
    pub t_end: u32,
    pub q_name: String,
    pub q_size: u32,
    pub q_strand: char,
    pub q_start: u32,
    pub q_end: u32,
    pub id: String,
    header: String,
    blocks: Vec<String>,
}

fn parse_strand(s: &str) -> std::result::Result<char, ParseError> {
    match s {
        "+" => Ok('+'),
        "-" => Ok('-'),
        other => Err(ParseError::BadStrand(other.to_string())),
    }
}

fn parse_u32(s: &str, name: &'static str) -> std::result::Result<u32, ParseError> {
    s.parse::<u32>().map_err(|_| ParseError::number(name, s))
}

impl ChainRecord {
    fn parse_header(line: &str) -> std::result::Result<ChainRecord, ParseError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.first() != Some(&"chain") {
            return Err(ParseError::NotAChainHeader);
        }
        if fields.len() < 12 {
            return Err(ParseError::FieldCount {
                expected: "at least 12 header",
                found: fields.len(),
            });
        }

        let t_start = parse_u32(fields[5], "tStart")?;
        let t_end = parse_u32(fields[6], "tEnd")?;
        if t_end < t_start {
            return Err(ParseError::BadRange {
                start: t_start,
                end: t_end,
            });
        }

        Ok(ChainRecord {
            score: fields[1]
                .parse()
                .map_err(|_| ParseError::number("score", fields[1]))?,
            t_name: fields[2].to_string(),
            t_size: parse_u32(fields[3], "tSize")?,
            t_strand: parse_strand(fields[4])?,
            t_start,
            t_end,
            q_name: fields[7].to_string(),
            q_size: parse_u32(fields[8], "qSize")?,
            q_strand: parse_strand(fields[9])?,
            q_start: parse_u32(fields[10], "qStart")?,
            q_end: parse_u32(fields[11], "qEnd")?,
            id: fields.get(12).map(|s| s.to_string()).unwrap_or_default(),
            header: line.to_string(),
            blocks: Vec::new(),
        })
    }

    /// Block lines (`size dt dq`, the last one just `size`), as read.
    pub fn blocks(&self) -> &[String] {
        &self.blocks
    }
}

fn check_block(line: &str) -> std::result::Result<(), ParseError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 1 && fields.len() != 3 {
        return Err(ParseError::FieldCount {
            expected: "1 or 3 block",
            found: fields.len(),
        });
    }
    for f in fields {
        parse_u32(f, "block field")?;
    }
    Ok(())
}

impl Interval for ChainRecord {
    fn chrom(&self) -> &str {
        &self.t_name
    }

    fn start(&self) -> u32 {
        self.t_start
    }

    fn end(&self) -> u32 {
        self.t_end
    }
}

impl RecordWrite for ChainRecord {
    fn write_record<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "{}", self.header)?;
        for block in &self.blocks {
            writeln!(writer, "{}", block)?;
        }
        writeln!(writer)
    }
}

/// Leading `#` comment lines are dropped.
pub(crate) fn read_header(src: &mut LineSource) -> Result<Vec<String>> {
    src.take_while(|line| line.starts_with('#'))?;
    Ok(Vec::new())
}

pub(crate) fn read_record(src: &mut LineSource) -> Result<Option<ChainRecord>> {
    let Some(header) = src.next_content_line(|line| line.starts_with('#'))? else {
        return Ok(None);
    };
    let mut record = ChainRecord::parse_header(&header)
        .map_err(|e| FormatError::malformed(Format::Chain, src.line_no(), e))?;

    let blocks = src.take_while(|line| !line.trim().is_empty() && !line.starts_with("chain"))?;
    // take_while leaves the line counter on the last block
    let first_block_line = src.line_no() + 1 - blocks.len();
    for (i, block) in blocks.iter().enumerate() {
        check_block(block)
            .map_err(|e| FormatError::malformed(Format::Chain, first_block_line + i, e))?;
    }
    record.blocks = blocks;

    Ok(Some(record))
}
