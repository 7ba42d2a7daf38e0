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
use crate::state::fitness::Fitness;
use crate::state::mv::MoveBatch;
use crate::state::schedule::ScheduleState;
use harvest_sched_core::prelude::Cost;

/// What happened to the last proposed batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationOutcome {
    pub accepted: bool,
    pub new_best: bool,
    pub rejected_hard: bool,
    pub delta: Cost,
}

impl IterationOutcome {
    #[inline]
    pub fn improved(&self) -> bool {
        self.accepted && self.delta < 0.0
    }
}

/// One metaheuristic: proposes batches, decides acceptance, and adapts its
/// internal schedule (temperature, tenure, scores) from outcomes.
///
/// The engine drives the loop; strategies stay free of timelines and undo
/// bookkeeping.
pub trait SearchStrategy<R: rand::Rng>: Send {
    fn name(&self) -> &'static str;

    /// Next candidate batch, or `None` when this strategy has nothing left
    /// to try on the current state.
    fn propose(
        &mut self,
        model: &SolverModel<'_>,
        state: &ScheduleState,
        rng: &mut R,
    ) -> Option<MoveBatch>;

    /// Whether to keep an applied candidate. `current` is the fitness before
    /// the batch, `candidate` after it, `best` the incumbent.
    fn accept(
        &mut self,
        current: Fitness,
        candidate: Fitness,
        best: Fitness,
        rng: &mut R,
    ) -> bool;

    /// Called once per iteration after the accept/reject decision.
    fn observe(&mut self, outcome: &IterationOutcome);
}

impl<R: rand::Rng, S: SearchStrategy<R> + ?Sized> SearchStrategy<R> for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn propose(
        &mut self,
        model: &SolverModel<'_>,
        state: &ScheduleState,
        rng: &mut R,
    ) -> Option<MoveBatch> {
        (**self).propose(model, state, rng)
    }

    fn accept(&mut self, current: Fitness, candidate: Fitness, best: Fitness, rng: &mut R) -> bool {
        (**self).accept(current, candidate, best, rng)
    }

    fn observe(&mut self, outcome: &IterationOutcome) {
        (**self).observe(outcome)
    }
}

impl<R: rand::Rng> std::fmt::Debug for dyn SearchStrategy<R> + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SearchStrategy {{ name: {} }}", self.name())
    }
}

impl<R: rand::Rng> std::fmt::Display for dyn SearchStrategy<R> + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
