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

use harvest_sched_core::prelude::Cost;

/// Scalar search fitness. Lower is better; ties are not improvements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fitness {
    total: Cost,
}

impl Fitness {
    #[inline]
    pub fn new(total: Cost) -> Self {
        debug_assert!(total.is_finite());
        Self { total }
    }

    #[inline]
    pub fn total(&self) -> Cost {
        self.total
    }

    #[inline]
    pub fn delta_from(&self, other: &Fitness) -> Cost {
        self.total - other.total
    }

    #[inline]
    pub fn is_better_than(&self, other: &Fitness) -> bool {
        self.total < other.total
    }
}

impl std::fmt::Display for Fitness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Fitness({:.3})", self.total)
    }
}
