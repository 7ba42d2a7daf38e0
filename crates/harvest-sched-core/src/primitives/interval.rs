// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use crate::primitives::affine::{Delta, Point};
use num_traits::{CheckedSub, Zero};

/// A half-open interval `[start, end)` over an ordered point type.
///
/// Invariant: `start <= end`. An interval with `start == end` is empty.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Interval<P> {
    start: P,
    end: P,
}

impl<P: Copy + Ord> Interval<P> {
    /// Creates a new interval. Panics if `start > end`.
    #[inline]
    pub fn new(start: P, end: P) -> Self {
        assert!(start <= end, "Interval requires start <= end");
        Self { start, end }
    }

    #[inline]
    pub const fn start(&self) -> P {
        self.start
    }

    #[inline]
    pub const fn end(&self) -> P {
        self.end
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn contains_point(&self, p: P) -> bool {
        self.start <= p && p < self.end
    }

    /// Whether `other` lies entirely inside `self`.
    #[inline]
    pub fn contains(&self, other: &Self) -> bool {
        other.is_empty() || (self.start <= other.start && other.end <= self.end)
    }

    /// Whether the two intervals share any point. Touching intervals do not.
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The overlapping part of the two intervals, if any.
    #[inline]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if start < end { Some(Self { start, end }) } else { None }
    }

    /// The smallest interval covering both.
    #[inline]
    pub fn hull(&self, other: &Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl<T: Copy + Ord + CheckedSub + Zero, U: Copy + Ord> Interval<Point<T, U>> {
    /// Length of the interval.
    #[inline]
    pub fn measure(&self) -> Delta<T, U> {
        self.end - self.start
    }

    /// Length of the overlap with `other`, zero when disjoint.
    #[inline]
    pub fn overlap(&self, other: &Self) -> Delta<T, U> {
        match self.intersection(other) {
            Some(i) => i.measure(),
            None => Delta::zero(),
        }
    }
}

impl<P: std::fmt::Display> std::fmt::Display for Interval<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{TimeDelta, TimeInterval, TimePoint};

    #[inline]
    fn iv(a: i64, b: i64) -> TimeInterval<i64> {
        TimeInterval::new(TimePoint::new(a), TimePoint::new(b))
    }

    #[inline]
    fn td(v: i64) -> TimeDelta<i64> {
        TimeDelta::new(v)
    }

    #[test]
    #[should_panic]
    fn test_reversed_bounds_panic() {
        let _ = iv(5, 3);
    }

    #[test]
    fn test_emptiness_and_containment() {
        assert!(iv(3, 3).is_empty());
        assert!(!iv(3, 4).is_empty());
        assert!(iv(0, 10).contains(&iv(2, 5)));
        assert!(iv(0, 10).contains(&iv(0, 10)));
        assert!(!iv(0, 10).contains(&iv(5, 11)));
        // Empty intervals are contained everywhere.
        assert!(iv(0, 1).contains(&iv(100, 100)));
    }

    #[test]
    fn test_contains_point_half_open() {
        let i = iv(2, 5);
        assert!(i.contains_point(TimePoint::new(2)));
        assert!(i.contains_point(TimePoint::new(4)));
        assert!(!i.contains_point(TimePoint::new(5)));
    }

    #[test]
    fn test_intersects_touching_is_disjoint() {
        assert!(iv(0, 5).intersects(&iv(4, 8)));
        assert!(!iv(0, 5).intersects(&iv(5, 8)));
        assert!(!iv(0, 5).intersects(&iv(8, 9)));
    }

    #[test]
    fn test_intersection_and_hull() {
        assert_eq!(iv(0, 5).intersection(&iv(3, 8)), Some(iv(3, 5)));
        assert_eq!(iv(0, 5).intersection(&iv(5, 8)), None);
        assert_eq!(iv(0, 2).hull(&iv(5, 8)), iv(0, 8));
    }

    #[test]
    fn test_measure_and_overlap() {
        assert_eq!(iv(2, 7).measure(), td(5));
        assert_eq!(iv(0, 5).overlap(&iv(3, 9)), td(2));
        assert_eq!(iv(0, 5).overlap(&iv(6, 9)), td(0));
    }
}
