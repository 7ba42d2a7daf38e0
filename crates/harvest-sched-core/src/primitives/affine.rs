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

use num_traits::{CheckedAdd, CheckedSub, SaturatingAdd, SaturatingSub, Zero};
use std::{
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

/// Names used when formatting the phantom-marked affine types.
pub trait MarkerName {
    const NAME_POINT: &'static str;
    const NAME_DELTA: &'static str;
}

/// An absolute position on an axis tagged by marker `U`.
///
/// Points and deltas of the same marker interoperate; mixing markers is a
/// compile error, which is the whole reason the marker exists.
#[repr(transparent)]
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point<T, U>(T, core::marker::PhantomData<U>);

/// A signed distance between two [`Point`]s of the same marker.
#[repr(transparent)]
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Delta<T, U>(T, core::marker::PhantomData<U>);

impl<T, U> Point<T, U> {
    #[inline]
    pub const fn new(value: T) -> Self {
        Point(value, core::marker::PhantomData)
    }

    #[inline]
    pub fn zero() -> Self
    where
        T: Zero,
    {
        Point::new(T::zero())
    }

    #[inline]
    pub const fn value(&self) -> T
    where
        T: Copy,
    {
        self.0
    }

    #[inline]
    pub fn checked_add(self, d: Delta<T, U>) -> Option<Self>
    where
        T: CheckedAdd,
    {
        self.0.checked_add(&d.0).map(Point::new)
    }

    #[inline]
    pub fn checked_sub(self, d: Delta<T, U>) -> Option<Self>
    where
        T: CheckedSub,
    {
        self.0.checked_sub(&d.0).map(Point::new)
    }

    #[inline]
    pub fn saturating_add(self, d: Delta<T, U>) -> Self
    where
        T: SaturatingAdd,
    {
        Point::new(self.0.saturating_add(&d.0))
    }

    #[inline]
    pub fn saturating_sub(self, d: Delta<T, U>) -> Self
    where
        T: SaturatingSub,
    {
        Point::new(self.0.saturating_sub(&d.0))
    }

    /// Distance from `other` to `self`.
    #[inline]
    pub fn distance_from(self, other: Self) -> Delta<T, U>
    where
        T: CheckedSub,
    {
        Delta::new(
            self.0
                .checked_sub(&other.0)
                .expect("overflow in Point::distance_from"),
        )
    }
}

impl<T, U> Delta<T, U> {
    #[inline]
    pub const fn new(value: T) -> Self {
        Delta(value, core::marker::PhantomData)
    }

    #[inline]
    pub fn zero() -> Self
    where
        T: Zero,
    {
        Delta::new(T::zero())
    }

    #[inline]
    pub const fn value(&self) -> T
    where
        T: Copy,
    {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool
    where
        T: Zero,
    {
        self.0.is_zero()
    }

    #[inline]
    pub fn checked_add(self, rhs: Self) -> Option<Self>
    where
        T: CheckedAdd,
    {
        self.0.checked_add(&rhs.0).map(Delta::new)
    }

    #[inline]
    pub fn checked_sub(self, rhs: Self) -> Option<Self>
    where
        T: CheckedSub,
    {
        self.0.checked_sub(&rhs.0).map(Delta::new)
    }

    #[inline]
    pub fn max(self, rhs: Self) -> Self
    where
        T: Ord,
    {
        Delta::new(self.0.max(rhs.0))
    }

    #[inline]
    pub fn min(self, rhs: Self) -> Self
    where
        T: Ord,
    {
        Delta::new(self.0.min(rhs.0))
    }
}

impl<T: std::fmt::Display, U: MarkerName> std::fmt::Display for Point<T, U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", U::NAME_POINT, self.0)
    }
}

impl<T: std::fmt::Display, U: MarkerName> std::fmt::Display for Delta<T, U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", U::NAME_DELTA, self.0)
    }
}

impl<T: Zero, U> Default for Point<T, U> {
    #[inline]
    fn default() -> Self {
        Point::new(T::zero())
    }
}

impl<T: Zero, U> Default for Delta<T, U> {
    #[inline]
    fn default() -> Self {
        Delta::new(T::zero())
    }
}

impl<T: CheckedAdd, U> Add<Delta<T, U>> for Point<T, U> {
    type Output = Point<T, U>;

    #[inline]
    fn add(self, rhs: Delta<T, U>) -> Self::Output {
        Point::new(self.0.checked_add(&rhs.0).expect("overflow in Point + Delta"))
    }
}

impl<T: CheckedAdd, U> AddAssign<Delta<T, U>> for Point<T, U> {
    #[inline]
    fn add_assign(&mut self, rhs: Delta<T, U>) {
        self.0 = self.0.checked_add(&rhs.0).expect("overflow in Point += Delta");
    }
}

impl<T: CheckedSub, U> Sub<Delta<T, U>> for Point<T, U> {
    type Output = Point<T, U>;

    #[inline]
    fn sub(self, rhs: Delta<T, U>) -> Self::Output {
        Point::new(self.0.checked_sub(&rhs.0).expect("overflow in Point - Delta"))
    }
}

impl<T: CheckedSub, U> Sub<Point<T, U>> for Point<T, U> {
    type Output = Delta<T, U>;

    #[inline]
    fn sub(self, rhs: Point<T, U>) -> Self::Output {
        Delta::new(self.0.checked_sub(&rhs.0).expect("overflow in Point - Point"))
    }
}

impl<T: CheckedAdd, U> Add for Delta<T, U> {
    type Output = Delta<T, U>;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Delta::new(self.0.checked_add(&rhs.0).expect("overflow in Delta + Delta"))
    }
}

impl<T: CheckedAdd, U> AddAssign for Delta<T, U> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.checked_add(&rhs.0).expect("overflow in Delta += Delta");
    }
}

impl<T: CheckedSub, U> Sub for Delta<T, U> {
    type Output = Delta<T, U>;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Delta::new(self.0.checked_sub(&rhs.0).expect("overflow in Delta - Delta"))
    }
}

impl<T: CheckedSub, U> SubAssign for Delta<T, U> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.0 = self.0.checked_sub(&rhs.0).expect("overflow in Delta -= Delta");
    }
}

impl<T: Neg<Output = T>, U> Neg for Delta<T, U> {
    type Output = Delta<T, U>;

    #[inline]
    fn neg(self) -> Self::Output {
        Delta::new(-self.0)
    }
}

impl<T: Zero + CheckedAdd, U> Sum for Delta<T, U> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Delta::zero(), |acc, d| acc + d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{TimeDelta, TimePoint};

    #[inline]
    fn tp(v: i64) -> TimePoint<i64> {
        TimePoint::new(v)
    }

    #[inline]
    fn td(v: i64) -> TimeDelta<i64> {
        TimeDelta::new(v)
    }

    #[test]
    fn test_point_plus_delta() {
        assert_eq!(tp(10) + td(5), tp(15));
        assert_eq!(tp(10) - td(5), tp(5));
    }

    #[test]
    fn test_point_minus_point_is_delta() {
        assert_eq!(tp(10) - tp(3), td(7));
        assert_eq!(tp(3) - tp(10), td(-7));
    }

    #[test]
    fn test_delta_arithmetic() {
        assert_eq!(td(2) + td(3), td(5));
        assert_eq!(td(2) - td(3), td(-1));
        assert_eq!(-td(4), td(-4));
        assert_eq!(td(2).max(td(3)), td(3));
        assert_eq!(td(2).min(td(3)), td(2));
    }

    #[test]
    fn test_checked_arithmetic_detects_overflow() {
        assert!(tp(i64::MAX).checked_add(td(1)).is_none());
        assert!(tp(i64::MIN).checked_sub(td(1)).is_none());
        assert_eq!(tp(1).checked_add(td(1)), Some(tp(2)));
    }

    #[test]
    fn test_saturating_arithmetic() {
        assert_eq!(tp(i64::MAX).saturating_add(td(1)), tp(i64::MAX));
        assert_eq!(tp(i64::MIN).saturating_sub(td(1)), tp(i64::MIN));
    }

    #[test]
    fn test_sum_of_deltas() {
        let total: TimeDelta<i64> = [td(1), td(2), td(3)].into_iter().sum();
        assert_eq!(total, td(6));
    }

    #[test]
    fn test_display_uses_marker_names() {
        assert_eq!(format!("{}", tp(7)), "TimePoint(7)");
        assert_eq!(format!("{}", td(-2)), "TimeDelta(-2)");
    }
}
