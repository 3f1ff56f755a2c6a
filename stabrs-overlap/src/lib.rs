//! Allen-relation stabbing queries over genomic intervals.
//!
//! This crate indexes a "select" set of genomic intervals once and then answers, for any query
//! interval, which select intervals stand in a chosen relationship to it: overlap, containment,
//! adjacency, strictly before or after, and so on. Relationships follow Allen's interval algebra
//! (13 mutually exclusive primitives) plus five compound relationships built from them.
//!
//! ## Features
//!
//! - **Rectangle queries**: every relationship maps to one rectangle over the stored intervals'
//!   `(start, end)` coordinates, answered by a single traversal of a nested-containment forest
//! - **Aggregation**: overlapping select intervals can be merged into clusters so a query is
//!   counted once per cluster rather than once per member
//! - **Concurrent pipeline**: a bounded producer/worker/consumer pipeline that streams queries
//!   over the read-only tree, optionally preserving input order
//!
//! ## Quick Start
//!
//! ```rust
//! use stabrs_core::models::Region;
//! use stabrs_overlap::{OverlapTree, Relation};
//!
//! // select set, e.g. gene bodies
//! let tree = OverlapTree::build(vec![
//!     Region::new("chr1", 10, 20),
//!     Region::new("chr1", 100, 200),
//! ]);
//!
//! let query = Region::new("chr1", 15, 25);
//! assert_eq!(tree.query(&query, Relation::Any).len(), 1);
//! assert_eq!(tree.query(&query, Relation::Within).len(), 0);
//!
//! // [10,20) ends exactly where [20,30) begins
//! let query = Region::new("chr1", 20, 30);
//! assert_eq!(tree.query(&query, Relation::M).len(), 1);
//! assert_eq!(tree.query(&query, Relation::O).len(), 0);
//! ```
//!
//! ## Running a whole query stream
//!
//! ```rust
//! use std::io;
//!
//! use stabrs_core::models::Region;
//! use stabrs_overlap::{AnswerWriter, OutputMode, OverlapOptions, OverlapTree, run_pipeline};
//!
//! let tree = OverlapTree::build(vec![Region::new("chr1", 0, 5)]);
//! let queries = vec![
//!     Ok::<_, io::Error>(Region::new("chr1", 2, 3)),
//!     Ok(Region::new("chr1", 10, 15)),
//! ];
//!
//! let options = OverlapOptions {
//!     output_mode: OutputMode::NonOverlapping,
//!     threads: 2,
//!     ..Default::default()
//! };
//! let mut writer = AnswerWriter::new(Vec::new(), options.output_mode);
//! let stats = run_pipeline(&tree, queries, &options, |answer| writer.write_answer(&answer)).unwrap();
//!
//! assert_eq!(stats.queries, 2);
//! assert_eq!(String::from_utf8(writer.into_inner()).unwrap(), "chr1\t10\t15\n");
//! ```

/// Merging overlapping select intervals into clusters.
pub mod aggregate;

/// Per-chromosome nested-containment forest.
///
/// See [`ChromTree`] for details.
pub mod chrom_tree;

pub mod errors;
pub mod options;
pub mod output;

/// Genome-wide index, one tree per chromosome.
pub mod overlap_tree;

/// The producer/worker/consumer query pipeline.
pub mod pipeline;

/// Interval relationships and their query rectangles.
pub mod relation;

// re-exports
pub use self::aggregate::{AggregateInterval, Target, merge_into_clusters};
pub use self::chrom_tree::{ChromTree, IntervalNode};
pub use self::errors::OverlapError;
pub use self::options::{DEFAULT_CHANNEL_CAPACITY, OverlapOptions};
pub use self::output::{AnswerWriter, OutputMode};
pub use self::overlap_tree::{IntoOverlapTree, OverlapTree};
pub use self::pipeline::{PipelineStats, QueryAnswer, run_pipeline};
pub use self::relation::{Rect, Relation};

