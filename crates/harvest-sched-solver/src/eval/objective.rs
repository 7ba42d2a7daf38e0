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

use crate::eval::violations::Totals;
use harvest_sched_core::prelude::Cost;
use harvest_sched_model::prelude::{ObjectiveBreakdown, ViolationStat, ViolationSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationClass {
    Precedence,
    Calendar,
    Capacity,
    Mobilisation,
}

impl ViolationClass {
    pub const ALL: [ViolationClass; 4] = [
        ViolationClass::Precedence,
        ViolationClass::Calendar,
        ViolationClass::Capacity,
        ViolationClass::Mobilisation,
    ];
}

impl std::fmt::Display for ViolationClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViolationClass::Precedence => write!(f, "precedence"),
            ViolationClass::Calendar => write!(f, "calendar"),
            ViolationClass::Capacity => write!(f, "capacity"),
            ViolationClass::Mobilisation => write!(f, "mobilisation"),
        }
    }
}

/// Hard classes gate acceptance: the engine never keeps a candidate whose
/// hard magnitude is positive. Soft classes are priced per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstraintMode {
    Hard,
    Soft(f64),
}

impl ConstraintMode {
    /// Penalty weight applied per tick of magnitude. Hard classes still get
    /// a large finite weight so intermediate candidate costs stay ordered.
    #[inline]
    pub fn weight(&self) -> f64 {
        match self {
            ConstraintMode::Hard => 1.0e6,
            ConstraintMode::Soft(w) => *w,
        }
    }

    #[inline]
    pub fn is_hard(&self) -> bool {
        matches!(self, ConstraintMode::Hard)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViolationPolicy {
    precedence: ConstraintMode,
    calendar: ConstraintMode,
    capacity: ConstraintMode,
    mobilisation: ConstraintMode,
}

impl ViolationPolicy {
    #[inline]
    pub fn with_precedence(mut self, mode: ConstraintMode) -> Self {
        self.precedence = mode;
        self
    }

    #[inline]
    pub fn with_calendar(mut self, mode: ConstraintMode) -> Self {
        self.calendar = mode;
        self
    }

    #[inline]
    pub fn with_capacity(mut self, mode: ConstraintMode) -> Self {
        self.capacity = mode;
        self
    }

    #[inline]
    pub fn with_mobilisation(mut self, mode: ConstraintMode) -> Self {
        self.mobilisation = mode;
        self
    }

    #[inline]
    pub fn mode(&self, class: ViolationClass) -> ConstraintMode {
        match class {
            ViolationClass::Precedence => self.precedence,
            ViolationClass::Calendar => self.calendar,
            ViolationClass::Capacity => self.capacity,
            ViolationClass::Mobilisation => self.mobilisation,
        }
    }

    #[inline]
    pub fn is_hard(&self, class: ViolationClass) -> bool {
        self.mode(class).is_hard()
    }
}

impl Default for ViolationPolicy {
    /// Double-booking is hard, everything else is priced.
    fn default() -> Self {
        Self {
            precedence: ConstraintMode::Soft(50.0),
            calendar: ConstraintMode::Soft(20.0),
            capacity: ConstraintMode::Hard,
            mobilisation: ConstraintMode::Soft(30.0),
        }
    }
}

impl std::fmt::Display for ViolationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, class) in ViolationClass::ALL.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match self.mode(*class) {
                ConstraintMode::Hard => write!(f, "{class}=hard")?,
                ConstraintMode::Soft(w) => write!(f, "{class}=soft({w})")?,
            }
        }
        Ok(())
    }
}

/// Prices the four objective components into one scalar cost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectiveWeights {
    makespan_per_tick: f64,
    premium_per_tick: f64,
    mobilisation_scale: f64,
    policy: ViolationPolicy,
}

impl ObjectiveWeights {
    #[inline]
    pub fn with_makespan_per_tick(mut self, w: f64) -> Self {
        self.makespan_per_tick = w;
        self
    }

    #[inline]
    pub fn with_premium_per_tick(mut self, w: f64) -> Self {
        self.premium_per_tick = w;
        self
    }

    #[inline]
    pub fn with_mobilisation_scale(mut self, w: f64) -> Self {
        self.mobilisation_scale = w;
        self
    }

    #[inline]
    pub fn with_policy(mut self, policy: ViolationPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[inline]
    pub fn policy(&self) -> &ViolationPolicy {
        &self.policy
    }

    /// Weighted penalty over all violation classes.
    pub fn penalty(&self, totals: &Totals) -> Cost {
        self.policy.mode(ViolationClass::Precedence).weight() * totals.precedence.magnitude
            + self.policy.mode(ViolationClass::Calendar).weight() * totals.calendar.magnitude
            + self.policy.mode(ViolationClass::Capacity).weight() * totals.capacity.magnitude
            + self.policy.mode(ViolationClass::Mobilisation).weight() * totals.mobilisation.magnitude
    }

    /// Full breakdown for a schedule with the given makespan in ticks.
    pub fn breakdown(&self, totals: &Totals, makespan_ticks: i64) -> ObjectiveBreakdown {
        ObjectiveBreakdown::new(
            self.makespan_per_tick * makespan_ticks as f64,
            self.mobilisation_scale * totals.mobilisation_cost,
            self.premium_per_tick * totals.premium_ticks,
            self.penalty(totals),
        )
    }

    #[inline]
    pub fn cost(&self, totals: &Totals, makespan_ticks: i64) -> Cost {
        self.breakdown(totals, makespan_ticks).total()
    }
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            makespan_per_tick: 1.0,
            premium_per_tick: 0.25,
            mobilisation_scale: 1.0,
            policy: ViolationPolicy::default(),
        }
    }
}

impl std::fmt::Display for ObjectiveWeights {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "makespan/tick={}, premium/tick={}, mobilisation x{}, policy: {}",
            self.makespan_per_tick, self.premium_per_tick, self.mobilisation_scale, self.policy
        )
    }
}

/// Violation totals in report form.
pub fn summarize(totals: &Totals) -> ViolationSummary {
    let stat = |c: &crate::eval::violations::ClassTotal| ViolationStat::new(c.count, c.magnitude);
    ViolationSummary::new(
        stat(&totals.precedence),
        stat(&totals.calendar),
        stat(&totals.capacity),
        stat(&totals.mobilisation),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::violations::ClassTotal;

    #[test]
    fn test_default_policy_capacity_is_hard() {
        let policy = ViolationPolicy::default();
        assert!(policy.is_hard(ViolationClass::Capacity));
        assert!(!policy.is_hard(ViolationClass::Precedence));
    }

    #[test]
    fn test_cost_composition() {
        let weights = ObjectiveWeights::default()
            .with_makespan_per_tick(2.0)
            .with_premium_per_tick(0.5)
            .with_policy(
                ViolationPolicy::default()
                    .with_precedence(ConstraintMode::Soft(10.0))
                    .with_capacity(ConstraintMode::Soft(100.0)),
            );
        let totals = Totals {
            precedence: ClassTotal::new(2, 4.0),
            capacity: ClassTotal::new(1, 1.0),
            mobilisation_cost: 25.0,
            premium_ticks: 8.0,
            ..Totals::default()
        };
        let b = weights.breakdown(&totals, 100);
        assert_eq!(b.makespan(), 200.0);
        assert_eq!(b.mobilisation(), 25.0);
        assert_eq!(b.shift_premium(), 4.0);
        assert_eq!(b.violation_penalty(), 140.0);
        assert_eq!(b.total(), 369.0);
    }

    #[test]
    fn test_summarize() {
        let totals = Totals {
            calendar: ClassTotal::new(3, 12.0),
            ..Totals::default()
        };
        let summary = summarize(&totals);
        assert_eq!(summary.calendar().count(), 3);
        assert_eq!(summary.calendar().magnitude(), 12.0);
        assert!(summary.precedence().is_clean());
    }
}
