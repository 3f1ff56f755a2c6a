//! Genome-wide stabbing queries across multiple chromosomes.
//!
//! [`OverlapTree`] partitions intervals by chromosome and keeps one [`ChromTree`] per
//! chromosome. Overlap never crosses chromosomes, so each query only touches the tree of its
//! own chromosome; queries on a chromosome with no select intervals simply return nothing.
//!
//! # Examples
//!
//! ```
//! use stabrs_core::models::Region;
//! use stabrs_overlap::{IntoOverlapTree, Relation};
//!
//! let genes = vec![
//!     Region::new("chr1", 1000, 2000),
//!     Region::new("chr1", 5000, 6000),
//!     Region::new("chr2", 1000, 3000),
//! ];
//! let tree = genes.into_overlap_tree();
//!
//! let hits = tree.query(&Region::new("chr1", 1500, 2500), Relation::Any);
//! assert_eq!(hits.len(), 1);
//!
//! let hits = tree.query(&Region::new("chr3", 1500, 2500), Relation::Any);
//! assert!(hits.is_empty());
//! ```
use fxhash::FxHashMap as HashMap;
use log::debug;

use stabrs_core::models::Interval;

use crate::chrom_tree::ChromTree;
use crate::relation::Relation;

/// A read-only, genome-wide index: one [`ChromTree`] per chromosome.
///
/// Built once and then shared by reference; it is `Sync` whenever the stored records are, so
/// worker threads can query it without locking.
#[derive(Debug, Clone)]
pub struct OverlapTree<T> {
    trees: HashMap<String, ChromTree<T>>,
}

impl<T: Interval> OverlapTree<T> {
    /// Partition `intervals` by chromosome and build a tree for each.
    pub fn build(intervals: Vec<T>) -> Self {
        // STEP 1: organize intervals into vectors, one for each chrom
        let mut by_chrom: HashMap<String, Vec<T>> = HashMap::default();
        for interval in intervals.into_iter() {
            match by_chrom.get_mut(interval.chrom()) {
                Some(chr_intervals) => chr_intervals.push(interval),
                None => {
                    by_chrom.insert(interval.chrom().to_string(), vec![interval]);
                }
            }
        }

        // STEP 2: take each vector and build the tree
        let mut trees: HashMap<String, ChromTree<T>> = HashMap::default();
        trees.reserve(by_chrom.len());
        for (chr, chr_intervals) in by_chrom.into_iter() {
            let tree = ChromTree::build(chr_intervals);
            debug!(
                "{}: {} intervals, {} nodes, {} roots",
                chr,
                tree.len(),
                tree.node_count(),
                tree.roots().len()
            );
            trees.insert(chr, tree);
        }

        OverlapTree { trees }
    }

    /// All stored intervals satisfying `relation` against `query`, in no particular order.
    pub fn query<'a, Q: Interval + ?Sized>(&'a self, query: &Q, relation: Relation) -> Vec<&'a T> {
        match self.trees.get(query.chrom()) {
            Some(tree) => tree.query(query, relation),
            None => Vec::new(),
        }
    }

    /// Iterate the matches of every query in turn, yielding `(query index, match)` pairs.
    pub fn query_iter<'a, 'b, Q: Interval>(
        &'a self,
        queries: &'b [Q],
        relation: Relation,
    ) -> impl Iterator<Item = (usize, &'a T)> {
        queries.iter().enumerate().flat_map(move |(i, q)| {
            self.query(q, relation).into_iter().map(move |hit| (i, hit))
        })
    }

    /// The tree for one chromosome, if any interval landed there.
    pub fn chrom_tree(&self, chrom: &str) -> Option<&ChromTree<T>> {
        self.trees.get(chrom)
    }

    pub fn chrom_count(&self) -> usize {
        self.trees.len()
    }

    /// Total number of stored intervals.
    pub fn len(&self) -> usize {
        self.trees.values().map(|t| t.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.values().all(|t| t.is_empty())
    }

    /// Total number of anchor nodes across all chromosomes.
    pub fn node_count(&self) -> usize {
        self.trees.values().map(|t| t.node_count()).sum()
    }
}

/// A trait for converting a collection of intervals into an [`OverlapTree`].
pub trait IntoOverlapTree<T> {
    /// Consumes the input and builds an [`OverlapTree`].
    fn into_overlap_tree(self) -> OverlapTree<T>;
}

impl<T: Interval> IntoOverlapTree<T> for Vec<T> {
    fn into_overlap_tree(self) -> OverlapTree<T> {
        OverlapTree::build(self)
    }
}
