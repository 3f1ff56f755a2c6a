use crate::errors::OverlapError;
use crate::output::OutputMode;
use crate::relation::Relation;

/// Capacity of both the query channel and the answer channel unless overridden.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

/// Everything one overlap run needs to know, resolved before any file is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlapOptions {
    pub relation: Relation,
    pub output_mode: OutputMode,
    /// Number of query workers.
    pub threads: usize,
    /// Merge overlapping select intervals into clusters before building the tree.
    pub aggregate: bool,
    /// Emit answers in query order rather than as workers finish them.
    pub preserve_order: bool,
    pub channel_capacity: usize,
}

impl Default for OverlapOptions {
    fn default() -> Self {
        OverlapOptions {
            relation: Relation::Any,
            output_mode: OutputMode::default(),
            threads: 1,
            aggregate: false,
            preserve_order: true,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl OverlapOptions {
    pub fn validate(&self) -> Result<(), OverlapError> {
        if self.threads == 0 {
            return Err(OverlapError::InvalidThreadCount(self.threads));
        }
        if self.channel_capacity == 0 {
            return Err(OverlapError::InvalidChannelCapacity);
        }
        Ok(())
    }
}
