use std::fmt::{self, Display};
use std::path::Path;

use stabrs_core::utils::{FileType, get_file_info};

use crate::error::{FormatError, Result};
use crate::reader::LineSource;
use crate::record::Record;
use crate::{axt, bed, chain, sam, vcf};

/// The record formats that can be read and written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Bed,
    Axt,
    Vcf,
    Sam,
    Chain,
}

impl Format {
    ///
    /// Pick the format from a file name. A trailing `.gz` is ignored, so `calls.vcf.gz` is VCF.
    ///
    pub fn from_path(path: &Path) -> Result<Format> {
        match get_file_info(path).file_type {
            FileType::BED => Ok(Format::Bed),
            FileType::AXT => Ok(Format::Axt),
            FileType::VCF => Ok(Format::Vcf),
            FileType::SAM => Ok(Format::Sam),
            FileType::CHAIN => Ok(Format::Chain),
            FileType::UNKNOWN => Err(FormatError::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Format::Bed => "BED",
            Format::Axt => "AXT",
            Format::Vcf => "VCF",
            Format::Sam => "SAM",
            Format::Chain => "chain",
        }
    }

    pub(crate) fn read_header(self, src: &mut LineSource) -> Result<Vec<String>> {
        match self {
            Format::Bed => bed::read_header(src),
            Format::Axt => axt::read_header(src),
            Format::Vcf => vcf::read_header(src),
            Format::Sam => sam::read_header(src),
            Format::Chain => chain::read_header(src),
        }
    }

    pub(crate) fn read_record(self, src: &mut LineSource) -> Result<Option<Record>> {
        Ok(match self {
            Format::Bed => bed::read_record(src)?.map(Record::Bed),
            Format::Axt => axt::read_record(src)?.map(Record::Axt),
            Format::Vcf => vcf::read_record(src)?.map(Record::Vcf),
            Format::Sam => sam::read_record(src)?.map(Record::Sam),
            Format::Chain => chain::read_record(src)?.map(Record::Chain),
        })
    }
}

impl Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case("select.bed", Format::Bed)]
    #[case("select.bed.gz", Format::Bed)]
    #[case("net.axt", Format::Axt)]
    #[case("calls.vcf.gz", Format::Vcf)]
    #[case("aln.sam", Format::Sam)]
    #[case("liftover.chain", Format::Chain)]
    fn test_from_path(#[case] name: &str, #[case] expected: Format) {
        assert_eq!(Format::from_path(Path::new(name)).unwrap(), expected);
    }

    #[rstest]
    #[case("reads.bam")]
    #[case("table.tsv.gz")]
    #[case("README")]
    fn test_from_path_unsupported(#[case] name: &str) {
        let err = Format::from_path(Path::new(name)).unwrap_err();
        assert!(matches!(err, FormatError::UnsupportedFormat(ref p) if p == name));
    }
}
