use std::fmt::{self, Display};
use std::io::{self, Write};
use std::str::FromStr;

use crate::errors::CoreError;
use crate::models::{Interval, RecordWrite};

///
/// Region struct, a plain BED-like record: chromosome, half-open coordinates and whatever
/// columns followed them.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct Region {
    pub chr: String,
    pub start: u32,
    pub end: u32,

    pub rest: Option<String>,
}

impl Region {
    pub fn new(chr: &str, start: u32, end: u32) -> Self {
        Region {
            chr: chr.to_string(),
            start,
            end,
            rest: None,
        }
    }

    ///
    /// Get file string of Region
    ///
    pub fn as_string(&self) -> String {
        format!(
            "{}\t{}\t{}{}",
            self.chr,
            self.start,
            self.end,
            self.rest
                .as_deref()
                .map_or(String::new(), |s| format!("\t{}", s)),
        )
    }
}

impl Interval for Region {
    #[inline]
    fn chrom(&self) -> &str {
        &self.chr
    }

    #[inline]
    fn start(&self) -> u32 {
        self.start
    }

    #[inline]
    fn end(&self) -> u32 {
        self.end
    }
}

impl RecordWrite for Region {
    fn write_record<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "{}", self.as_string())
    }
}

impl FromStr for Region {
    type Err = CoreError;

    /// Parse one tab separated `chrom start end [rest...]` line.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut fields = line.splitn(4, '\t');

        let chr = fields
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| CoreError::RegionParseError(format!("missing chromosome: {line}")))?;
        let start = fields
            .next()
            .and_then(|s| s.parse::<u32>().ok())
            .ok_or_else(|| CoreError::RegionParseError(format!("bad start position: {line}")))?;
        let end = fields
            .next()
            .and_then(|s| s.parse::<u32>().ok())
            .ok_or_else(|| CoreError::RegionParseError(format!("bad end position: {line}")))?;

        if end < start {
            return Err(CoreError::RegionParseError(format!(
                "end before start: {line}"
            )));
        }

        Ok(Region {
            chr: chr.to_string(),
            start,
            end,
            rest: fields.next().map(str::to_string).filter(|s| !s.is_empty()),
        })
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_parse_region_with_rest() {
        let region: Region = "chr1\t10\t20\tpeak1\t0.5".parse().unwrap();
        assert_eq!(region.chr, "chr1");
        assert_eq!(region.start, 10);
        assert_eq!(region.end, 20);
        assert_eq!(region.rest.as_deref(), Some("peak1\t0.5"));
        assert_eq!(region.as_string(), "chr1\t10\t20\tpeak1\t0.5");
    }

    #[rstest]
    fn test_parse_region_without_rest() {
        let region: Region = "chr2\t0\t5".parse().unwrap();
        assert_eq!(region, Region::new("chr2", 0, 5));
        assert_eq!(region.to_string(), "chr2\t0\t5");
    }

    #[rstest]
    #[case("chr1\tx\t20")]
    #[case("chr1\t10")]
    #[case("chr1\t30\t20")]
    #[case("chr1\t 10\t20")]
    #[case("")]
    fn test_parse_region_rejects_malformed(#[case] line: &str) {
        assert!(line.parse::<Region>().is_err());
    }

    #[rstest]
    fn test_write_record_is_one_line() {
        let mut buf: Vec<u8> = Vec::new();
        Region::new("chr3", 1, 9).write_record(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "chr3\t1\t9\n");
    }

    #[rstest]
    fn test_point_feature_has_zero_width() {
        let region = Region::new("chr1", 7, 7);
        assert_eq!(region.width(), 0);
    }
}
