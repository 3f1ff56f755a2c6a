use std::cmp::Ordering;
use std::io::{self, Write};

/// The read contract every record type must satisfy to take part in a query.
///
/// Coordinates are half-open and 0-based: `start` is inclusive, `end` exclusive. Callers
/// guarantee `start <= end`; format decoders reject anything else before a record gets here.
pub trait Interval {
    fn chrom(&self) -> &str;

    fn start(&self) -> u32;

    fn end(&self) -> u32;

    /// Number of bases covered.
    #[inline]
    fn width(&self) -> u32 {
        self.end().saturating_sub(self.start())
    }
}

impl<T: Interval + ?Sized> Interval for &T {
    #[inline]
    fn chrom(&self) -> &str {
        (**self).chrom()
    }

    #[inline]
    fn start(&self) -> u32 {
        (**self).start()
    }

    #[inline]
    fn end(&self) -> u32 {
        (**self).end()
    }
}

impl<T: Interval + ?Sized> Interval for Box<T> {
    #[inline]
    fn chrom(&self) -> &str {
        (**self).chrom()
    }

    #[inline]
    fn start(&self) -> u32 {
        (**self).start()
    }

    #[inline]
    fn end(&self) -> u32 {
        (**self).end()
    }
}

/// Output-capable records serialize themselves back to a stream, newline terminated.
pub trait RecordWrite {
    fn write_record<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()>;
}

impl<T: RecordWrite + ?Sized> RecordWrite for &T {
    fn write_record<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        (**self).write_record(writer)
    }
}

/// Order two intervals by `(start, end)`, ignoring the chromosome.
#[inline]
pub fn coord_cmp<A: Interval, B: Interval>(a: &A, b: &B) -> Ordering {
    match a.start().cmp(&b.start()) {
        Ordering::Equal => a.end().cmp(&b.end()),
        other => other,
    }
}

/// Classic half-open intersection test on the same chromosome.
#[inline]
pub fn intersects<A: Interval, B: Interval>(a: &A, b: &B) -> bool {
    a.chrom() == b.chrom() && a.start().max(b.start()) < a.end().min(b.end())
}
