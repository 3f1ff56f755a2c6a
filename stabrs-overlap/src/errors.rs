use std::io;

use thiserror::Error;

use crate::relation::Relation;

/// Errors raised while configuring or running an overlap query.
#[derive(Debug, Error)]
pub enum OverlapError {
    /// The relationship code is not one of the known primitive or compound codes.
    #[error("Invalid relationship: '{0}'. Valid options are: {codes}", codes = Relation::valid_codes())]
    InvalidRelation(String),

    /// Merged output and non-overlap output were both requested.
    #[error("mergedOutput and nonOverlap are mutually exclusive")]
    IncompatibleOutputModes,

    /// The worker pool needs at least one thread.
    #[error("Thread count must be at least 1, got {0}")]
    InvalidThreadCount(usize),

    /// Channels need room for at least one message.
    #[error("Channel capacity must be at least 1")]
    InvalidChannelCapacity,

    /// The query stream failed to decode a record.
    #[error("Failed to read query record: {0}")]
    QueryStream(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A pipeline thread panicked.
    #[error("The {0} thread panicked")]
    ThreadPanicked(&'static str),

    #[error(transparent)]
    Io(#[from] io::Error),
}
