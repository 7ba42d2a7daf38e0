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

use crate::model::SolverModel;
use crate::search::operator::MoveOperator;
use crate::search::operator_library::{
    NudgeStart, RandomReassign, RegretRecreate, RuinRecreate, SwapAdjacent,
};
use crate::state::mv::MoveBatch;
use crate::state::schedule::ScheduleState;

/// An indexed set of move operators shared by all strategies. Indices are
/// stable, which is what adaptive strategies key their scores on.
pub struct OperatorRegistry<R: rand::Rng> {
    operators: Vec<Box<dyn MoveOperator<R>>>,
}

impl<R: rand::Rng> OperatorRegistry<R> {
    #[inline]
    pub fn new() -> Self {
        Self {
            operators: Vec::new(),
        }
    }

    /// The standard neighborhood mix: reassign, nudge, swap, plus the two
    /// ruin/repair flavors.
    pub fn standard() -> Self {
        Self::new()
            .with_operator(Box::new(RandomReassign))
            .with_operator(Box::new(NudgeStart))
            .with_operator(Box::new(SwapAdjacent))
            .with_operator(Box::new(RuinRecreate::default()))
            .with_operator(Box::new(RegretRecreate::default()))
    }

    #[inline]
    pub fn with_operator(mut self, op: Box<dyn MoveOperator<R>>) -> Self {
        self.operators.push(op);
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.operators.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    #[inline]
    pub fn name(&self, index: usize) -> &'static str {
        self.operators[index].name()
    }

    #[inline]
    pub fn propose_with(
        &self,
        index: usize,
        model: &SolverModel<'_>,
        state: &ScheduleState,
        rng: &mut R,
    ) -> Option<MoveBatch> {
        self.operators[index].propose(model, state, rng)
    }

    /// Uniform pick with retry: tries up to `len` operators starting at a
    /// random index and returns the first batch offered.
    pub fn propose_uniform(
        &self,
        model: &SolverModel<'_>,
        state: &ScheduleState,
        rng: &mut R,
    ) -> Option<(usize, MoveBatch)> {
        if self.operators.is_empty() {
            return None;
        }
        let offset = rng.random_range(0..self.operators.len());
        for i in 0..self.operators.len() {
            let index = (offset + i) % self.operators.len();
            if let Some(batch) = self.operators[index].propose(model, state, rng) {
                return Some((index, batch));
            }
        }
        None
    }

    /// Roulette-wheel pick over caller-owned weights (one per operator),
    /// falling through the remaining operators in index order when the
    /// picked one declines. Non-positive total weight degrades to uniform.
    pub fn propose_weighted(
        &self,
        weights: &[f64],
        model: &SolverModel<'_>,
        state: &ScheduleState,
        rng: &mut R,
    ) -> Option<(usize, MoveBatch)> {
        debug_assert_eq!(weights.len(), self.operators.len());
        if self.operators.is_empty() {
            return None;
        }
        let total: f64 = weights.iter().filter(|w| w.is_finite() && **w > 0.0).sum();
        let preferred = if total > 0.0 {
            let mut remaining = rng.random::<f64>() * total;
            let mut picked = self.operators.len() - 1;
            for (i, &w) in weights.iter().enumerate() {
                if w.is_finite() && w > 0.0 {
                    remaining -= w;
                    if remaining <= 0.0 {
                        picked = i;
                        break;
                    }
                }
            }
            picked
        } else {
            rng.random_range(0..self.operators.len())
        };
        for i in 0..self.operators.len() {
            let index = (preferred + i) % self.operators.len();
            if let Some(batch) = self.operators[index].propose(model, state, rng) {
                return Some((index, batch));
            }
        }
        None
    }
}

impl<R: rand::Rng> Default for OperatorRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: rand::Rng> std::fmt::Debug for OperatorRegistry<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.operators.iter().map(|o| o.name()).collect();
        write!(f, "OperatorRegistry {{ operators: {names:?} }}")
    }
}
