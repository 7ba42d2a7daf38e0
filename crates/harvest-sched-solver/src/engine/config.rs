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

use crate::eval::ObjectiveWeights;
use std::time::Duration;

/// Engine-level knobs. Strategy-specific parameters live in the strategy
/// configs; this covers the outer loop only.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    seed: u64,
    max_iterations: u64,
    time_budget: Option<Duration>,
    no_improvement_limit: Option<u64>,
    stall_limit: u64,
    trace_interval: u64,
    restart_after: Option<u64>,
    weights: ObjectiveWeights,
}

impl SolverConfig {
    #[inline]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[inline]
    pub fn with_max_iterations(mut self, iterations: u64) -> Self {
        self.max_iterations = iterations;
        self
    }

    #[inline]
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    #[inline]
    pub fn with_no_improvement_limit(mut self, limit: u64) -> Self {
        self.no_improvement_limit = Some(limit);
        self
    }

    #[inline]
    pub fn with_stall_limit(mut self, limit: u64) -> Self {
        self.stall_limit = limit;
        self
    }

    #[inline]
    pub fn with_trace_interval(mut self, interval: u64) -> Self {
        self.trace_interval = interval;
        self
    }

    #[inline]
    pub fn with_restart_after(mut self, iterations: u64) -> Self {
        self.restart_after = Some(iterations);
        self
    }

    #[inline]
    pub fn with_weights(mut self, weights: ObjectiveWeights) -> Self {
        self.weights = weights;
        self
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    pub fn max_iterations(&self) -> u64 {
        self.max_iterations
    }

    #[inline]
    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget
    }

    #[inline]
    pub fn no_improvement_limit(&self) -> Option<u64> {
        self.no_improvement_limit
    }

    #[inline]
    pub fn stall_limit(&self) -> u64 {
        self.stall_limit
    }

    #[inline]
    pub fn trace_interval(&self) -> u64 {
        self.trace_interval
    }

    #[inline]
    pub fn restart_after(&self) -> Option<u64> {
        self.restart_after
    }

    #[inline]
    pub fn weights(&self) -> &ObjectiveWeights {
        &self.weights
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            max_iterations: 100_000,
            time_budget: None,
            no_improvement_limit: None,
            stall_limit: 1_000,
            trace_interval: 100,
            restart_after: None,
            weights: ObjectiveWeights::default(),
        }
    }
}

impl std::fmt::Display for SolverConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "seed={}, max_iterations={}, time_budget={:?}, no_improvement_limit={:?}, stall_limit={}, trace_interval={}, restart_after={:?}",
            self.seed,
            self.max_iterations,
            self.time_budget,
            self.no_improvement_limit,
            self.stall_limit,
            self.trace_interval,
            self.restart_after
        )
    }
}
