//! Core models shared by every stabrs crate.
//!
//! The central piece is the [`Interval`](models::Interval) capability: the minimal read
//! contract a genomic record has to satisfy to take part in an overlap query. Records are
//! half-open and 0-based, so `end - start` is the length and a point feature has
//! `end == start`.
//!
//! ```rust
//! use stabrs_core::models::{Interval, Region};
//!
//! let region = Region::new("chr1", 100, 200);
//! assert_eq!(region.chrom(), "chr1");
//! assert_eq!(region.width(), 100);
//! ```
pub mod errors;
pub mod models;
pub mod utils;

pub use errors::CoreError;
