use std::ops::Range;

use stabrs_core::models::Interval;
use stabrs_core::models::interval::coord_cmp;

use crate::relation::{Rect, Relation, closed};

/// One node of a [`ChromTree`].
///
/// A node is anchored on the longest interval of a group sharing the same start. The rest of
/// that group are its "smaller intervals": same start, contained in the anchor. Links to other
/// nodes are indices into the tree's arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalNode {
    /// Index of the anchor interval in the tree's sorted interval store.
    pub item: usize,
    /// Same-start intervals inside the anchor. Stored ascending by end, so reading the range
    /// backwards yields them in descending end order.
    pub smaller: Range<usize>,
    /// Nearest enclosing node.
    pub parent: Option<usize>,
    /// Previous node with the same parent.
    pub left_sibling: Option<usize>,
    /// Contained nodes, ascending by start (and therefore by end).
    pub children: Vec<usize>,
    start: i64,
    end: i64,
}

/// A read-only stabbing structure over the intervals of one chromosome.
///
/// Intervals are sorted by `(start, end)`; groups with a shared start collapse onto one
/// anchor node. Anchors are linked into a containment forest: a node's parent is the closest
/// preceding anchor that contains it, and siblings never contain one another, so along any
/// sibling list both starts and ends strictly increase. Node indices follow start order,
/// which is also a pre-order walk of the forest.
///
/// A relation query is a rectangle search (see [`Relation::rect`]). It binary searches for the
/// last anchor that starts inside the rectangle, then walks the ancestor path to the root. At
/// each step it scans left siblings while their range still reaches the rectangle and
/// descends into them along their rightmost children. The cost is logarithmic search plus
/// forest depth plus the matches themselves.
///
/// # Examples
///
/// ```
/// use stabrs_core::models::Region;
/// use stabrs_overlap::{ChromTree, Relation};
///
/// let tree = ChromTree::build(vec![
///     Region::new("chr1", 10, 20),
///     Region::new("chr1", 12, 15),
///     Region::new("chr1", 30, 40),
/// ]);
///
/// let hits = tree.query(&Region::new("chr1", 14, 32), Relation::Any);
/// assert_eq!(hits.len(), 3);
///
/// let inside = tree.query(&Region::new("chr1", 11, 16), Relation::D);
/// assert_eq!(inside, vec![&Region::new("chr1", 12, 15)]);
/// ```
#[derive(Debug, Clone)]
pub struct ChromTree<T> {
    items: Vec<T>,
    nodes: Vec<IntervalNode>,
    roots: Vec<usize>,
}

impl<T: Interval> ChromTree<T> {
    /// Build the tree from the intervals of a single chromosome. Chromosome names are not
    /// inspected here; partitioning is the caller's job.
    pub fn build(mut items: Vec<T>) -> Self {
        items.sort_by(coord_cmp);

        let mut nodes: Vec<IntervalNode> = Vec::new();
        let mut roots: Vec<usize> = Vec::new();
        // chain of nested anchors, outermost first
        let mut stack: Vec<usize> = Vec::new();

        let mut group_start = 0;
        while group_start < items.len() {
            let start = items[group_start].start();
            let group_end = group_start
                + items[group_start..].partition_point(|it| it.start() == start);
            let anchor = group_end - 1;
            let (start, end) = closed(&items[anchor]);

            while let Some(&top) = stack.last() {
                if nodes[top].end >= end {
                    break;
                }
                stack.pop();
            }

            let idx = nodes.len();
            let parent = stack.last().copied();
            let left_sibling = match parent {
                Some(p) => nodes[p].children.last().copied(),
                None => roots.last().copied(),
            };
            match parent {
                Some(p) => nodes[p].children.push(idx),
                None => roots.push(idx),
            }

            nodes.push(IntervalNode {
                item: anchor,
                smaller: group_start..anchor,
                parent,
                left_sibling,
                children: Vec::new(),
                start,
                end,
            });
            stack.push(idx);
            group_start = group_end;
        }

        ChromTree {
            items,
            nodes,
            roots,
        }
    }

    /// Find every interval satisfying `relation` against `query`, in no particular order.
    pub fn query<'a, Q: Interval + ?Sized>(&'a self, query: &Q, relation: Relation) -> Vec<&'a T> {
        let mut hits = Vec::new();
        self.query_rect(&relation.rect(query), &mut hits);
        hits
    }

    /// Push every interval whose closed `(start, end)` lies in `rect` onto `out`.
    pub fn query_rect<'a>(&'a self, rect: &Rect, out: &mut Vec<&'a T>) {
        let rect = rect.tightened();
        if rect.is_empty() || self.nodes.is_empty() {
            return;
        }

        // last anchor starting at or before the right edge of the rectangle
        let last = self.nodes.partition_point(|n| n.start <= rect.x2);
        if last == 0 {
            return;
        }

        let mut on_path = Some(last - 1);
        while let Some(u) = on_path {
            let node = &self.nodes[u];
            self.visit(node, &rect, out);

            // the subtree of a sibling spans starts up to (not including) the next sibling's
            let mut right_start = node.start;
            let mut sibling = node.left_sibling;
            while let Some(v) = sibling {
                let left = &self.nodes[v];
                if left.end < rect.y1 || right_start <= rect.x1 {
                    break;
                }
                self.collect_subtree(v, &rect, out);
                right_start = left.start;
                sibling = left.left_sibling;
            }

            on_path = node.parent;
        }
    }

    /// Report the anchor and smaller intervals of one node that fall inside `rect`.
    #[inline]
    fn visit<'a>(&'a self, node: &IntervalNode, rect: &Rect, out: &mut Vec<&'a T>) {
        if node.start < rect.x1 || node.start > rect.x2 {
            return;
        }
        if rect.y1 <= node.end && node.end <= rect.y2 {
            out.push(&self.items[node.item]);
        }

        let smaller = &self.items[node.smaller.clone()];
        let lo = smaller.partition_point(|it| closed(it).1 < rect.y1);
        let hi = smaller.partition_point(|it| closed(it).1 <= rect.y2);
        if lo < hi {
            out.extend(smaller[lo..hi].iter().rev());
        }
    }

    /// Report matches in the subtree under `root`, which lies wholly left of the search anchor.
    fn collect_subtree<'a>(&'a self, root: usize, rect: &Rect, out: &mut Vec<&'a T>) {
        let mut pending = vec![root];
        while let Some(v) = pending.pop() {
            let node = &self.nodes[v];
            self.visit(node, rect, out);

            let children = &node.children;
            // children ending before the rectangle form a prefix
            let reach = children.partition_point(|&c| self.nodes[c].end < rect.y1);
            // children whose whole subtree starts before the rectangle also form a prefix
            let skip = children
                .partition_point(|&c| self.nodes[c].start <= rect.x1)
                .saturating_sub(1);
            pending.extend(children[reach.max(skip)..].iter().copied());
        }
    }

    /// Number of stored intervals.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of anchor nodes, i.e. distinct start positions.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &[IntervalNode] {
        &self.nodes
    }

    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// The interval a node is anchored on.
    pub fn anchor(&self, node: &IntervalNode) -> &T {
        &self.items[node.item]
    }

    /// Same-start intervals of a node, longest first.
    pub fn smaller_intervals<'a>(&'a self, node: &IntervalNode) -> impl Iterator<Item = &'a T> {
        self.items[node.smaller.clone()].iter().rev()
    }

    /// Iterate all stored intervals in `(start, end)` order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<'a, T> IntoIterator for &'a ChromTree<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> std::slice::Iter<'a, T> {
        self.items.iter()
    }
}
