//! # Record formats for stabrs.
//!
//! Streaming decoders for the line-oriented formats the overlap tool accepts: BED, AXT, VCF,
//! SAM and chain, each optionally gzip-compressed. The format is picked from the file
//! extension. Every decoded [`Record`] implements [`Interval`](stabrs_core::models::Interval)
//! so it can be indexed or queried, and [`RecordWrite`](stabrs_core::models::RecordWrite)
//! so it can be written back out exactly as it was read.
//!
//! ```rust
//! use std::io::Cursor;
//!
//! use stabrs_core::models::Interval;
//! use stabrs_io::{Format, RecordReader};
//!
//! let vcf = "##fileformat=VCFv4.2\n#CHROM\tPOS\tID\tREF\tALT\nchr1\t100\t.\tAC\tA\n";
//! let reader = RecordReader::new(Format::Vcf, Cursor::new(vcf)).unwrap();
//! assert_eq!(reader.header().len(), 2);
//!
//! let records: Vec<_> = reader.collect::<Result<_, _>>().unwrap();
//! assert_eq!((records[0].start(), records[0].end()), (99, 101));
//! ```
pub mod axt;
pub mod bed;
pub mod chain;
pub mod error;
pub mod format;
pub mod reader;
pub mod record;
pub mod sam;
pub mod vcf;

// re-expose core types
pub use error::*;
pub use format::Format;
pub use reader::{LineSource, RecordReader};
pub use record::Record;
