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

use crate::engine::config::SolverConfig;
use harvest_sched_model::prelude::TerminationReason;
use std::time::Duration;

/// Stop checks evaluated at the top of every iteration. Budgets are taken
/// from the config once so the loop never consults it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminationCriteria {
    max_iterations: u64,
    time_budget: Option<Duration>,
    no_improvement_limit: Option<u64>,
}

impl TerminationCriteria {
    pub fn from_config(config: &SolverConfig) -> Self {
        Self {
            max_iterations: config.max_iterations(),
            time_budget: config.time_budget(),
            no_improvement_limit: config.no_improvement_limit(),
        }
    }

    /// First matching reason wins; iteration budget is checked before the
    /// wall clock so fixed-seed runs terminate identically.
    pub fn check(
        &self,
        iterations: u64,
        since_best: u64,
        elapsed: Duration,
    ) -> Option<TerminationReason> {
        if iterations >= self.max_iterations {
            return Some(TerminationReason::IterationBudget);
        }
        if let Some(limit) = self.no_improvement_limit {
            if since_best >= limit {
                return Some(TerminationReason::NoImprovement);
            }
        }
        if let Some(budget) = self.time_budget {
            if elapsed >= budget {
                return Some(TerminationReason::TimeBudget);
            }
        }
        None
    }
}
