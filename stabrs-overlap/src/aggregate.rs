//! Optional pre-pass that merges overlapping select intervals into clusters.
//!
//! With aggregation on, a query touching any member of a cluster is reported once against the
//! cluster rather than once per member. Each cluster keeps its members in a [`ChromTree`] of its
//! own so they can still be inspected or re-queried.
use std::io::{self, Write};

use stabrs_core::models::interval::coord_cmp;
use stabrs_core::models::{Interval, RecordWrite};

use crate::chrom_tree::ChromTree;
use crate::relation::Relation;

/// The union of a run of transitively overlapping intervals on one chromosome.
#[derive(Debug, Clone)]
pub struct AggregateInterval<T> {
    chrom: String,
    start: u32,
    end: u32,
    members: ChromTree<T>,
}

impl<T: Interval> AggregateInterval<T> {
    fn from_run(run: Vec<T>) -> Self {
        let chrom = run[0].chrom().to_string();
        let start = run.iter().map(|m| m.start()).min().unwrap_or(0);
        let end = run.iter().map(|m| m.end()).max().unwrap_or(start);
        AggregateInterval {
            chrom,
            start,
            end,
            members: ChromTree::build(run),
        }
    }

    /// The sub-tree holding the original member intervals.
    pub fn members(&self) -> &ChromTree<T> {
        &self.members
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Members satisfying `relation` against `query`.
    pub fn find_members<'a, Q: Interval + ?Sized>(
        &'a self,
        query: &Q,
        relation: Relation,
    ) -> Vec<&'a T> {
        if query.chrom() != self.chrom {
            return Vec::new();
        }
        self.members.query(query, relation)
    }
}

impl<T> Interval for AggregateInterval<T> {
    fn chrom(&self) -> &str {
        &self.chrom
    }

    fn start(&self) -> u32 {
        self.start
    }

    fn end(&self) -> u32 {
        self.end
    }
}

impl<T: RecordWrite> RecordWrite for AggregateInterval<T> {
    fn write_record<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        for member in &self.members {
            member.write_record(writer)?;
        }
        Ok(())
    }
}

/// A select-set entry after the merge pass: either an untouched interval or a cluster.
#[derive(Debug, Clone)]
pub enum Target<T> {
    Single(T),
    Aggregate(AggregateInterval<T>),
}

impl<T: Interval> Target<T> {
    pub fn is_aggregate(&self) -> bool {
        matches!(self, Target::Aggregate(_))
    }

    /// Number of original intervals this target stands for.
    pub fn member_count(&self) -> usize {
        match self {
            Target::Single(_) => 1,
            Target::Aggregate(agg) => agg.member_count(),
        }
    }
}

impl<T: Interval> Interval for Target<T> {
    fn chrom(&self) -> &str {
        match self {
            Target::Single(t) => t.chrom(),
            Target::Aggregate(agg) => agg.chrom(),
        }
    }

    fn start(&self) -> u32 {
        match self {
            Target::Single(t) => t.start(),
            Target::Aggregate(agg) => agg.start(),
        }
    }

    fn end(&self) -> u32 {
        match self {
            Target::Single(t) => t.end(),
            Target::Aggregate(agg) => agg.end(),
        }
    }
}

impl<T: RecordWrite> RecordWrite for Target<T> {
    fn write_record<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        match self {
            Target::Single(t) => t.write_record(writer),
            Target::Aggregate(agg) => agg.write_record(writer),
        }
    }
}

///
/// Merge transitively overlapping intervals into clusters.
///
/// Intervals are grouped by chromosome and swept in `(start, end)` order. A run keeps growing
/// while the next interval starts before the run's current end; touching intervals
/// (`next.start == run.end`) start a new run. Runs of one interval come back as
/// [`Target::Single`], longer runs as [`Target::Aggregate`].
///
pub fn merge_into_clusters<T: Interval>(mut intervals: Vec<T>) -> Vec<Target<T>> {
    intervals.sort_by(|a, b| a.chrom().cmp(b.chrom()).then_with(|| coord_cmp(a, b)));

    let mut targets = Vec::new();
    let mut run: Vec<T> = Vec::new();
    let mut run_end = 0u32;

    for interval in intervals {
        let extends = run
            .first()
            .is_some_and(|first| first.chrom() == interval.chrom() && interval.start() < run_end);

        if !extends {
            flush_run(&mut run, &mut targets);
            run_end = interval.end();
        } else {
            run_end = run_end.max(interval.end());
        }
        run.push(interval);
    }
    flush_run(&mut run, &mut targets);

    targets
}

fn flush_run<T: Interval>(run: &mut Vec<T>, targets: &mut Vec<Target<T>>) {
    match run.len() {
        0 => {}
        1 => {
            if let Some(single) = run.pop() {
                targets.push(Target::Single(single));
            }
        }
        _ => targets.push(Target::Aggregate(AggregateInterval::from_run(std::mem::take(run)))),
    }
}
