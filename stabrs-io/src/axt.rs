use std::io::{self, Write};

use stabrs_core::models::{Interval, RecordWrite};

use crate::error::{FormatError, ParseError, Result};
use crate::format::Format;
use crate::reader::LineSource;

/// One pairwise alignment block: a summary line followed by the two aligned sequences.
///
/// The interval is taken on the first (target) sequence. Summary coordinates are 1-based and
/// inclusive, so the interval is `[t_start - 1, t_end)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxtRecord {
    pub number: u64,
    pub t_name: String,
    pub t_start: u32,
    pub t_end: u32,
    pub q_name: String,
    pub q_start: u32,
    pub q_end: u32,
    pub strand: char,
    pub score: i64,
    summary: String,
    t_seq: String,
    q_seq: String,
}

fn parse_strand(s: &str) -> std::result::Result<char, ParseError> {
    match s {
        "+" => Ok('+'),
        "-" => Ok('-'),
        other => Err(ParseError::BadStrand(other.to_string())),
    }
}

impl AxtRecord {
    fn parse_summary(line: &str) -> std::result::Result<AxtRecord, ParseError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 9 {
            return Err(ParseError::FieldCount {
                expected: "9 summary",
                found: fields.len(),
            });
        }

        let num = |i: usize, name: &'static str| {
            fields[i]
                .parse::<u32>()
                .map_err(|_| ParseError::number(name, fields[i]))
        };
        let t_start = num(2, "tStart")?;
        let t_end = num(3, "tEnd")?;
        let q_start = num(5, "qStart")?;
        let q_end = num(6, "qEnd")?;

        if t_start == 0 || t_end < t_start - 1 {
            return Err(ParseError::BadRange {
                start: t_start,
                end: t_end,
            });
        }

        Ok(AxtRecord {
            number: fields[0]
                .parse()
                .map_err(|_| ParseError::number("alignment number", fields[0]))?,
            t_name: fields[1].to_string(),
            t_start,
            t_end,
            q_name: fields[4].to_string(),
            q_start,
            q_end,
            strand: parse_strand(fields[7])?,
            score: fields[8]
                .parse()
                .map_err(|_| ParseError::number("score", fields[8]))?,
            summary: line.to_string(),
            t_seq: String::new(),
            q_seq: String::new(),
        })
    }

    pub fn target_sequence(&self) -> &str {
        &self.t_seq
    }

    pub fn query_sequence(&self) -> &str {
        &self.q_seq
    }
}

impl Interval for AxtRecord {
    fn chrom(&self) -> &str {
        &self.t_name
    }

    fn start(&self) -> u32 {
        self.t_start - 1
    }

    fn end(&self) -> u32 {
        self.t_end
    }
}

impl RecordWrite for AxtRecord {
    fn write_record<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "{}", self.summary)?;
        writeln!(writer, "{}", self.t_seq)?;
        writeln!(writer, "{}", self.q_seq)?;
        writeln!(writer)
    }
}

/// Leading `#` comment lines are dropped.
pub(crate) fn read_header(src: &mut LineSource) -> Result<Vec<String>> {
    src.take_while(|line| line.starts_with('#'))?;
    Ok(Vec::new())
}

pub(crate) fn read_record(src: &mut LineSource) -> Result<Option<AxtRecord>> {
    let Some(summary) = src.next_content_line(|line| line.starts_with('#'))? else {
        return Ok(None);
    };
    let mut record = AxtRecord::parse_summary(&summary)
        .map_err(|e| FormatError::malformed(Format::Axt, src.line_no(), e))?;

    for seq in [&mut record.t_seq, &mut record.q_seq] {
        match src.next_line()? {
            Some(line) if !line.trim().is_empty() => *seq = line,
            _ => {
                return Err(FormatError::malformed(
                    Format::Axt,
                    src.line_no(),
                    ParseError::MissingSequence,
                ));
            }
        }
    }

    Ok(Some(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::RecordReader;

    use std::io::Cursor;

    use pretty_assertions::assert_eq;
    use rstest::*;

    const AXT: &str = "# comment\n\
0 chr19 3001012 3001075 chr11 70568380 70568443 - 3500\n\
TCAGCTCATAAATCACCTCCTGCCACAAGCCTGGCCTGGTCCCAGGAGAGTGTCCAGGCTCAGA\n\
TCTGTTCATAAACCACCTGCCATGACAAGCCTGGCCTGTTCCCAAGACAATGTCCAGGCTCAGA\n\
\n\
1 chr19 3008279 3008357 chr11 70573976 70574054 - 3900\n\
CACAATCTTCACATTGAGATCCTGAGTTGCTGATCAGAATGGAAGGCTGAGCTAAGATGAGCGACGAGGCAATGTCACA\n\
CACAGTCTTCACATTGAGGTACCAAGTTGTGGATCAGAATGGAAAGCTAGGCTATGATGAGGGACAGTGCGCTGTCACA\n";

    #[rstest]
    fn test_read_axt() {
        let reader = RecordReader::new(Format::Axt, Cursor::new(AXT)).unwrap();
        assert!(reader.header().is_empty());

        let spans: Vec<(String, u32, u32)> = reader
            .map(|r| r.unwrap())
            .map(|r| (r.chrom().to_string(), r.start(), r.end()))
            .collect();
        assert_eq!(
            spans,
            vec![
                ("chr19".to_string(), 3001011, 3001075),
                ("chr19".to_string(), 3008278, 3008357),
            ]
        );
    }

    #[rstest]
    fn test_axt_written_verbatim() {
        let mut src = LineSource::new(Cursor::new(AXT));
        read_header(&mut src).unwrap();
        let record = read_record(&mut src).unwrap().unwrap();
        assert_eq!(record.q_name, "chr11");
        assert_eq!(record.strand, '-');
        assert_eq!(record.score, 3500);

        let mut out = Vec::new();
        record.write_record(&mut out).unwrap();
        let expected: String = AXT.lines().skip(1).take(4).map(|l| format!("{l}\n")).collect();
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[rstest]
    fn test_truncated_block() {
        let text = "0 chr1 1 10 chr2 1 10 + 100\nACGTACGTAC\n";
        let mut src = LineSource::new(Cursor::new(text));
        let err = read_record(&mut src).unwrap_err();
        assert!(matches!(
            err,
            FormatError::Malformed {
                format: Format::Axt,
                source: ParseError::MissingSequence,
                ..
            }
        ));
    }

    #[rstest]
    #[case("0 chr1 1 10 chr2 1 10 + ", "expected 9 summary fields, found 8")]
    #[case("0 chr1 0 10 chr2 1 10 + 100", "bad target range 0-10")]
    #[case("0 chr1 1 10 chr2 1 10 ? 100", "bad strand '?'")]
    #[case("x chr1 1 10 chr2 1 10 + 100", "bad alignment number 'x'")]
    fn test_bad_summary(#[case] line: &str, #[case] message: &str) {
        let err = AxtRecord::parse_summary(line).unwrap_err();
        assert_eq!(err.to_string(), message);
    }
}
