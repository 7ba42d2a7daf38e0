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

use crate::common::{JobIdentifier, MachineIdentifier, WorkerIdentifier};
use harvest_sched_core::prelude::Cost;
use serde::{Deserialize, Serialize};

/// One job placement in the final schedule. Times are raw ticks so the
/// report serializes without any unit wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledJob {
    job: JobIdentifier,
    machine: MachineIdentifier,
    worker: WorkerIdentifier,
    start: i64,
    end: i64,
}

impl ScheduledJob {
    #[inline]
    pub fn new(
        job: JobIdentifier,
        machine: MachineIdentifier,
        worker: WorkerIdentifier,
        start: i64,
        end: i64,
    ) -> Self {
        Self {
            job,
            machine,
            worker,
            start,
            end,
        }
    }

    #[inline]
    pub fn job(&self) -> JobIdentifier {
        self.job
    }

    #[inline]
    pub fn machine(&self) -> MachineIdentifier {
        self.machine
    }

    #[inline]
    pub fn worker(&self) -> WorkerIdentifier {
        self.worker
    }

    #[inline]
    pub fn start(&self) -> i64 {
        self.start
    }

    #[inline]
    pub fn end(&self) -> i64 {
        self.end
    }
}

/// Objective value split into its weighted components. `total` is always
/// the sum of the four parts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveBreakdown {
    makespan: Cost,
    mobilisation: Cost,
    shift_premium: Cost,
    violation_penalty: Cost,
    total: Cost,
}

impl ObjectiveBreakdown {
    #[inline]
    pub fn new(makespan: Cost, mobilisation: Cost, shift_premium: Cost, violation_penalty: Cost) -> Self {
        Self {
            makespan,
            mobilisation,
            shift_premium,
            violation_penalty,
            total: makespan + mobilisation + shift_premium + violation_penalty,
        }
    }

    #[inline]
    pub fn makespan(&self) -> Cost {
        self.makespan
    }

    #[inline]
    pub fn mobilisation(&self) -> Cost {
        self.mobilisation
    }

    #[inline]
    pub fn shift_premium(&self) -> Cost {
        self.shift_premium
    }

    #[inline]
    pub fn violation_penalty(&self) -> Cost {
        self.violation_penalty
    }

    #[inline]
    pub fn total(&self) -> Cost {
        self.total
    }
}

/// Count and accumulated magnitude of one violation class. The magnitude
/// unit is ticks of overlap or uncovered time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ViolationStat {
    count: u64,
    magnitude: f64,
}

impl ViolationStat {
    #[inline]
    pub fn new(count: u64, magnitude: f64) -> Self {
        Self { count, magnitude }
    }

    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    #[inline]
    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    #[inline]
    pub fn is_clean(&self) -> bool {
        self.count == 0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ViolationSummary {
    precedence: ViolationStat,
    calendar: ViolationStat,
    capacity: ViolationStat,
    mobilisation: ViolationStat,
}

impl ViolationSummary {
    #[inline]
    pub fn new(
        precedence: ViolationStat,
        calendar: ViolationStat,
        capacity: ViolationStat,
        mobilisation: ViolationStat,
    ) -> Self {
        Self {
            precedence,
            calendar,
            capacity,
            mobilisation,
        }
    }

    #[inline]
    pub fn precedence(&self) -> ViolationStat {
        self.precedence
    }

    #[inline]
    pub fn calendar(&self) -> ViolationStat {
        self.calendar
    }

    #[inline]
    pub fn capacity(&self) -> ViolationStat {
        self.capacity
    }

    #[inline]
    pub fn mobilisation(&self) -> ViolationStat {
        self.mobilisation
    }

    #[inline]
    pub fn is_clean(&self) -> bool {
        self.precedence.is_clean()
            && self.calendar.is_clean()
            && self.capacity.is_clean()
            && self.mobilisation.is_clean()
    }
}

/// Best and current objective at one sampled iteration. Traces are keyed
/// by iteration, never wall time, so runs with the same seed compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TracePoint {
    iteration: u64,
    best_cost: Cost,
    current_cost: Cost,
}

impl TracePoint {
    #[inline]
    pub fn new(iteration: u64, best_cost: Cost, current_cost: Cost) -> Self {
        Self {
            iteration,
            best_cost,
            current_cost,
        }
    }

    #[inline]
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    #[inline]
    pub fn best_cost(&self) -> Cost {
        self.best_cost
    }

    #[inline]
    pub fn current_cost(&self) -> Cost {
        self.current_cost
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationReason {
    Converged,
    IterationBudget,
    TimeBudget,
    NoImprovement,
    Stalled,
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::Converged => write!(f, "converged"),
            TerminationReason::IterationBudget => write!(f, "iteration budget exhausted"),
            TerminationReason::TimeBudget => write!(f, "time budget exhausted"),
            TerminationReason::NoImprovement => write!(f, "no improvement window elapsed"),
            TerminationReason::Stalled => write!(f, "search stalled"),
        }
    }
}

/// Full solver output: the schedule, the objective breakdown, residual
/// soft violations, and the convergence trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionReport {
    schedule: Vec<ScheduledJob>,
    objective: ObjectiveBreakdown,
    violations: ViolationSummary,
    trace: Vec<TracePoint>,
    termination: TerminationReason,
    iterations: u64,
    seed: u64,
}

impl SolutionReport {
    #[inline]
    pub fn new(
        schedule: Vec<ScheduledJob>,
        objective: ObjectiveBreakdown,
        violations: ViolationSummary,
        trace: Vec<TracePoint>,
        termination: TerminationReason,
        iterations: u64,
        seed: u64,
    ) -> Self {
        Self {
            schedule,
            objective,
            violations,
            trace,
            termination,
            iterations,
            seed,
        }
    }

    #[inline]
    pub fn schedule(&self) -> &[ScheduledJob] {
        &self.schedule
    }

    #[inline]
    pub fn objective(&self) -> &ObjectiveBreakdown {
        &self.objective
    }

    #[inline]
    pub fn violations(&self) -> &ViolationSummary {
        &self.violations
    }

    #[inline]
    pub fn trace(&self) -> &[TracePoint] {
        &self.trace
    }

    #[inline]
    pub fn termination(&self) -> TerminationReason {
        self.termination
    }

    #[inline]
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    pub fn makespan_end(&self) -> Option<i64> {
        self.schedule.iter().map(|s| s.end()).max()
    }
}
