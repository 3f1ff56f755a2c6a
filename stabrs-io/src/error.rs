use std::io;
use thiserror::Error;

use stabrs_core::CoreError;

use crate::format::Format;

/// Why a single record line could not be decoded.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("missing {0} column")]
    MissingField(&'static str),

    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: &'static str, found: usize },

    #[error("bad {field} '{value}'")]
    BadNumber { field: &'static str, value: String },

    #[error("bad strand '{0}'")]
    BadStrand(String),

    #[error("bad target range {start}-{end}")]
    BadRange { start: u32, end: u32 },

    #[error("{0} must be at least 1")]
    ZeroPosition(&'static str),

    #[error("{0} runs past the coordinate range")]
    OutOfRange(&'static str),

    #[error("expected a 'chain' header line")]
    NotAChainHeader,

    #[error("alignment block is missing a sequence line")]
    MissingSequence,

    #[error(transparent)]
    Region(#[from] CoreError),

    #[error("invalid SAM record: {0}")]
    Sam(#[source] io::Error),
}

impl ParseError {
    pub(crate) fn number(field: &'static str, value: &str) -> Self {
        ParseError::BadNumber {
            field,
            value: value.to_string(),
        }
    }
}

/// Error type for stabrs-io operations.
#[derive(Error, Debug)]
pub enum FormatError {
    /// The file extension (after stripping `.gz`) is not a known record format.
    #[error("Unsupported file type: {0}. Expected one of .bed, .axt, .vcf, .sam, .chain (optionally .gz)")]
    UnsupportedFormat(String),

    /// A record could not be decoded.
    #[error("Malformed {format} record at line {line}: {source}")]
    Malformed {
        format: Format,
        line: usize,
        #[source]
        source: ParseError,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    /// IO error occurred during file operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl FormatError {
    pub(crate) fn malformed(format: Format, line: usize, source: ParseError) -> Self {
        FormatError::Malformed {
            format,
            line,
            source,
        }
    }
}

/// Result type alias for stabrs-io operations.
pub type Result<T> = std::result::Result<T, FormatError>;
