use std::io::{self, Write};

use stabrs_core::models::{Interval, RecordWrite};

use crate::axt::AxtRecord;
use crate::bed::BedRecord;
use crate::chain::ChainRecord;
use crate::format::Format;
use crate::sam::SamRecord;
use crate::vcf::VcfRecord;

/// One decoded record of any supported format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Bed(BedRecord),
    Axt(AxtRecord),
    Vcf(VcfRecord),
    Sam(SamRecord),
    Chain(ChainRecord),
}

impl Record {
    pub fn format(&self) -> Format {
        match self {
            Record::Bed(_) => Format::Bed,
            Record::Axt(_) => Format::Axt,
            Record::Vcf(_) => Format::Vcf,
            Record::Sam(_) => Format::Sam,
            Record::Chain(_) => Format::Chain,
        }
    }
}

impl Interval for Record {
    fn chrom(&self) -> &str {
        match self {
            Record::Bed(r) => r.chrom(),
            Record::Axt(r) => r.chrom(),
            Record::Vcf(r) => r.chrom(),
            Record::Sam(r) => r.chrom(),
            Record::Chain(r) => r.chrom(),
        }
    }

    fn start(&self) -> u32 {
        match self {
            Record::Bed(r) => r.start(),
            Record::Axt(r) => r.start(),
            Record::Vcf(r) => r.start(),
            Record::Sam(r) => r.start(),
            Record::Chain(r) => r.start(),
        }
    }

    fn end(&self) -> u32 {
        match self {
            Record::Bed(r) => r.end(),
            Record::Axt(r) => r.end(),
            Record::Vcf(r) => r.end(),
            Record::Sam(r) => r.end(),
            Record::Chain(r) => r.end(),
        }
    }
}

impl RecordWrite for Record {
    fn write_record<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        match self {
            Record::Bed(r) => r.write_record(writer),
            Record::Axt(r) => r.write_record(writer),
            Record::Vcf(r) => r.write_record(writer),
            Record::Sam(r) => r.write_record(writer),
            Record::Chain(r) => r.write_record(writer),
        }
    }
}
