//! Allen's interval algebra, reduced to rectangle tests.
//!
//! Coordinates are moved from half-open `[start, end)` to the closed pair `(start, end - 1)`
//! before any comparison. Every relation then becomes a rectangle `[x1, x2] x [y1, y2]`: a
//! target satisfies the relation iff its closed `(start, end)` pair lies inside the
//! rectangle. Signed 64-bit coordinates keep zero-length features (`end == start`) and the
//! open-ended sides of a rectangle representable.
use std::fmt::{self, Display, Write};
use std::str::FromStr;

use stabrs_core::models::Interval;

use crate::errors::OverlapError;

/// One of the 13 primitive Allen relations or one of the 5 compound relations.
///
/// Relations read as "the target is ... the query". For non-empty intervals exactly one
/// primitive holds for any ordered pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// Target starts before the query and ends inside it.
    O,
    /// Target starts inside the query and ends after it.
    Oi,
    /// Target lies strictly inside the query.
    D,
    /// Query lies strictly inside the target.
    Di,
    /// Target ends exactly where the query starts.
    M,
    /// Target starts exactly where the query ends.
    Mi,
    /// Same start, target ends first.
    S,
    /// Same start, target ends last.
    Si,
    /// Same end, target starts last.
    F,
    /// Same end, target starts first.
    Fi,
    /// Target is after the query, with a gap.
    Gt,
    /// Target is before the query, with a gap.
    Lt,
    /// Identical coordinates.
    E,
    Any,
    Within,
    Start,
    End,
    Equal,
}

pub const PRIMITIVES: [Relation; 13] = [
    Relation::O,
    Relation::Oi,
    Relation::D,
    Relation::Di,
    Relation::M,
    Relation::Mi,
    Relation::S,
    Relation::Si,
    Relation::F,
    Relation::Fi,
    Relation::Gt,
    Relation::Lt,
    Relation::E,
];

pub const COMPOUNDS: [Relation; 5] = [
    Relation::Any,
    Relation::Within,
    Relation::Start,
    Relation::End,
    Relation::Equal,
];

/// A closed rectangle over `(start, closed end)` pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x1: i64,
    pub x2: i64,
    pub y1: i64,
    pub y2: i64,
}

/// Closed coordinates of a half-open interval: `(start, end - 1)`.
#[inline]
pub fn closed<T: Interval + ?Sized>(interval: &T) -> (i64, i64) {
    (interval.start() as i64, interval.end() as i64 - 1)
}

impl Rect {
    #[inline]
    pub fn contains(&self, start: i64, end: i64) -> bool {
        self.x1 <= start && start <= self.x2 && self.y1 <= end && end <= self.y2
    }

    #[inline]
    pub fn contains_interval<T: Interval + ?Sized>(&self, interval: &T) -> bool {
        let (start, end) = closed(interval);
        self.contains(start, end)
    }

    /// Shrink the rectangle using the fact that every stored interval has
    /// `start <= end + 1` in closed coordinates.
    pub fn tightened(self) -> Rect {
        Rect {
            x1: self.x1,
            x2: self.x2.min(self.y2.saturating_add(1)),
            y1: self.y1.max(self.x1.saturating_sub(1)),
            y2: self.y2,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x1 > self.x2 || self.y1 > self.y2
    }
}

impl Relation {
    pub fn code(&self) -> &'static str {
        match self {
            Relation::O => "o",
            Relation::Oi => "oi",
            Relation::D => "d",
            Relation::Di => "di",
            Relation::M => "m",
            Relation::Mi => "mi",
            Relation::S => "s",
            Relation::Si => "si",
            Relation::F => "f",
            Relation::Fi => "fi",
            Relation::Gt => "gt",
            Relation::Lt => "lt",
            Relation::E => "e",
            Relation::Any => "any",
            Relation::Within => "within",
            Relation::Start => "start",
            Relation::End => "end",
            Relation::Equal => "equal",
        }
    }

    /// The primitives this relation is the disjoint union of. A primitive is its own union.
    pub fn primitives(&self) -> &'static [Relation] {
        use Relation::*;
        match self {
            Any => &[O, Oi, D, Di, M, Mi, S, Si, F, Fi, E],
            Within => &[D, S, F, E],
            Start => &[S, Si, E],
            End => &[F, Fi, E],
            Equal | E => &[E],
            O => &[O],
            Oi => &[Oi],
            D => &[D],
            Di => &[Di],
            M => &[M],
            Mi => &[Mi],
            S => &[S],
            Si => &[Si],
            F => &[F],
            Fi => &[Fi],
            Gt => &[Gt],
            Lt => &[Lt],
        }
    }

    /// Comma separated list of every valid code, for error messages.
    pub fn valid_codes() -> String {
        PRIMITIVES
            .iter()
            .chain(COMPOUNDS.iter())
            .map(|r| r.code())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// The rectangle a target's closed `(start, end)` must fall in for this relation to hold
    /// against `query`.
    pub fn rect<Q: Interval + ?Sized>(&self, query: &Q) -> Rect {
        const MIN: i64 = i64::MIN;
        const MAX: i64 = i64::MAX;
        let (x, y) = closed(query);

        let (x1, x2, y1, y2) = match self {
            Relation::O => (MIN, x - 1, x, y - 1),
            Relation::Oi => (x + 1, y, y + 1, MAX),
            Relation::D => (x + 1, MAX, MIN, y - 1),
            Relation::Di => (MIN, x - 1, y + 1, MAX),
            Relation::M => (MIN, MAX, x - 1, x - 1),
            Relation::Mi => (y + 1, y + 1, MIN, MAX),
            Relation::S => (x, x, MIN, y - 1),
            Relation::Si => (x, x, y + 1, MAX),
            Relation::F => (x + 1, MAX, y, y),
            Relation::Fi => (MIN, x - 1, y, y),
            Relation::Gt => (y + 2, MAX, MIN, MAX),
            Relation::Lt => (MIN, MAX, MIN, x - 2),
            Relation::E | Relation::Equal => (x, x, y, y),
            Relation::Any => (MIN, y + 1, x - 1, MAX),
            Relation::Within => (x, MAX, MIN, y),
            Relation::Start => (x, x, MIN, MAX),
            Relation::End => (MIN, MAX, y, y),
        };

        Rect { x1, x2, y1, y2 }
    }

    /// Evaluate the relation directly on a pair of intervals. Intervals on different
    /// chromosomes never relate.
    pub fn holds<Q, T>(&self, query: &Q, target: &T) -> bool
    where
        Q: Interval + ?Sized,
        T: Interval + ?Sized,
    {
        if query.chrom() != target.chrom() {
            return false;
        }
        let (x, y) = closed(query);
        let (tx, ty) = closed(target);

        self.primitives().iter().any(|p| match p {
            Relation::O => tx < x && x <= ty && ty < y,
            Relation::Oi => x < tx && tx <= y && y < ty,
            Relation::D => x < tx && ty < y,
            Relation::Di => tx < x && y < ty,
            Relation::M => ty + 1 == x,
            Relation::Mi => tx == y + 1,
            Relation::S => tx == x && ty < y,
            Relation::Si => tx == x && ty > y,
            Relation::F => ty == y && tx > x,
            Relation::Fi => ty == y && tx < x,
            Relation::Gt => tx > y + 1,
            Relation::Lt => ty + 1 < x,
            Relation::E => tx == x && ty == y,
            _ => unreachable!("primitives() only yields primitive relations"),
        })
    }

    /// The text printed by `--printRelationships`.
    pub fn diagram() -> String {
        // query line, target line, meaning
        let rows: [(Relation, &str, &str, &str); 13] = [
            (Relation::O, "    ======", "======", "target overlaps the start of the query"),
            (Relation::Oi, "======", "    ======", "target overlaps the end of the query"),
            (Relation::D, "==========", "  =====", "target inside the query"),
            (Relation::Di, "  =====", "==========", "query inside the target"),
            (Relation::M, "      =====", "======", "target ends where the query starts"),
            (Relation::Mi, "=====", "     ======", "target starts where the query ends"),
            (Relation::S, "==========", "=====", "same start, target ends first"),
            (Relation::Si, "=====", "==========", "same start, target ends last"),
            (Relation::F, "==========", "     =====", "same end, target starts last"),
            (Relation::Fi, "     =====", "==========", "same end, target starts first"),
            (Relation::Gt, "=====", "        =====", "target after the query"),
            (Relation::Lt, "        =====", "=====", "target before the query"),
            (Relation::E, "=====", "=====", "same start and end"),
        ];

        let mut out = String::new();
        let _ = writeln!(out, "Relationships between a query (Q) and a select target (T):");
        let _ = writeln!(out);
        for (relation, query, target, meaning) in rows.iter() {
            let _ = writeln!(out, "  {:<7}Q: {:<15}{}", relation.code(), query, meaning);
            let _ = writeln!(out, "  {:<7}T: {}", "", target);
            let _ = writeln!(out);
        }
        let _ = writeln!(out, "Compound relationships:");
        for relation in COMPOUNDS.iter() {
            let parts: Vec<&str> = relation.primitives().iter().map(|p| p.code()).collect();
            let _ = writeln!(out, "  {:<7}{}", relation.code(), parts.join(" | "));
        }
        out
    }
}

impl FromStr for Relation {
    type Err = OverlapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PRIMITIVES
            .iter()
            .chain(COMPOUNDS.iter())
            .find(|r| r.code() == s)
            .copied()
            .ok_or_else(|| OverlapError::InvalidRelation(s.to_string()))
    }
}

impl Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stabrs_core::models::Region;
    use stabrs_core::models::interval::intersects;

    use pretty_assertions::assert_eq;
    use rstest::*;

    fn region(start: u32, end: u32) -> Region {
        Region::new("chr1", start, end)
    }

    /// Every non-empty interval inside a small window, paired against a fixed query.
    fn all_targets() -> Vec<Region> {
        let mut targets = Vec::new();
        for start in 0..16 {
            for end in (start + 1)..=16 {
                targets.push(region(start, end));
            }
        }
        targets
    }

    #[rstest]
    fn test_parse_every_code() {
        for relation in PRIMITIVES.iter().chain(COMPOUNDS.iter()) {
            assert_eq!(relation.code().parse::<Relation>().unwrap(), *relation);
        }
        assert!("overlaps".parse::<Relation>().is_err());
        assert!("".parse::<Relation>().is_err());
    }

    #[rstest]
    #[case(region(5, 10))]
    #[case(region(4, 5))]
    #[case(region(0, 16))]
    fn test_primitives_are_mutually_exclusive(#[case] query: Region) {
        for target in all_targets() {
            let holding: Vec<Relation> = PRIMITIVES
                .iter()
                .copied()
                .filter(|r| r.holds(&query, &target))
                .collect();
            assert_eq!(holding.len(), 1, "{:?} vs {:?}: {:?}", query, target, holding);
        }
    }

    #[rstest]
    #[case(region(5, 10))]
    #[case(region(4, 5))]
    #[case(region(3, 12))]
    fn test_rect_agrees_with_holds(#[case] query: Region) {
        for relation in PRIMITIVES.iter().chain(COMPOUNDS.iter()) {
            let rect = relation.rect(&query);
            for target in all_targets() {
                assert_eq!(
                    rect.contains_interval(&target),
                    relation.holds(&query, &target),
                    "{} {:?} {:?}",
                    relation,
                    query,
                    target
                );
                assert_eq!(
                    rect.tightened().contains_interval(&target),
                    rect.contains_interval(&target)
                );
            }
        }
    }

    #[rstest]
    fn test_equal_iff_same_coordinates() {
        let query = region(5, 10);
        for target in all_targets() {
            let same = target.start == 5 && target.end == 10;
            assert_eq!(Relation::Equal.holds(&query, &target), same);
        }
    }

    #[rstest]
    fn test_any_is_intersection_or_adjacency() {
        let query = region(5, 10);
        for target in all_targets() {
            let intersect = intersects(&query, &target);
            let adjacent = target.end == 5 || target.start == 10;
            assert_eq!(Relation::Any.holds(&query, &target), intersect || adjacent);
        }
    }

    #[rstest]
    #[case(Relation::Any, true)]
    #[case(Relation::Within, false)]
    #[case(Relation::S, false)]
    #[case(Relation::O, true)]
    fn test_partial_overlap_scenario(#[case] relation: Relation, #[case] expected: bool) {
        let select = region(10, 20);
        let query = region(15, 25);
        assert_eq!(relation.holds(&query, &select), expected);
    }

    #[rstest]
    #[case(Relation::M, true)]
    #[case(Relation::Any, true)]
    #[case(Relation::O, false)]
    #[case(Relation::Lt, false)]
    fn test_adjacent_scenario(#[case] relation: Relation, #[case] expected: bool) {
        let select = region(10, 20);
        let query = region(20, 30);
        assert_eq!(relation.holds(&query, &select), expected);
    }

    #[rstest]
    fn test_other_chromosome_never_relates() {
        let query = region(5, 10);
        let target = Region::new("chr2", 5, 10);
        for relation in PRIMITIVES.iter().chain(COMPOUNDS.iter()) {
            assert!(!relation.holds(&query, &target));
        }
    }

    #[rstest]
    fn test_diagram_lists_every_code() {
        let diagram = Relation::diagram();
        for relation in PRIMITIVES.iter().chain(COMPOUNDS.iter()) {
            assert!(diagram.contains(&format!("  {:<7}", relation.code())));
        }
    }
}
