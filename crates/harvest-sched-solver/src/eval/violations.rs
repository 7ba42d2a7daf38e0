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

//! Per-entity violation contributions.
//!
//! Every function here is pure and total: the incremental bookkeeping in
//! [`ScheduleState`](crate::state::schedule::ScheduleState) recomputes whole
//! contributions with these same functions, so a full rebuild and a chain of
//! incremental updates always agree.

use crate::model::{JobIndex, MachineIndex, SolverModel};
use crate::state::schedule::{Assignment, Timeline};
use harvest_sched_core::prelude::Cost;
use harvest_sched_model::prelude::{Time, TimeWindow};

/// Count and accumulated tick magnitude for one violation class.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClassTotal {
    pub count: u64,
    pub magnitude: f64,
}

impl ClassTotal {
    #[inline]
    pub fn new(count: u64, magnitude: f64) -> Self {
        Self { count, magnitude }
    }

    #[inline]
    pub fn record(&mut self, magnitude: f64) {
        self.count += 1;
        self.magnitude += magnitude;
    }

    #[inline]
    pub fn add(&mut self, other: ClassTotal) {
        self.count += other.count;
        self.magnitude += other.magnitude;
    }

    #[inline]
    pub fn sub(&mut self, other: ClassTotal) {
        self.count -= other.count;
        self.magnitude -= other.magnitude;
    }

    #[inline]
    pub fn is_clean(&self) -> bool {
        self.count == 0
    }
}

/// Running violation totals across the whole schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub precedence: ClassTotal,
    pub calendar: ClassTotal,
    pub capacity: ClassTotal,
    pub mobilisation: ClassTotal,
    pub mobilisation_cost: Cost,
    pub premium_ticks: f64,
}

#[inline]
fn window(start: i64, end: i64) -> TimeWindow {
    TimeWindow::new(Time::new(start), Time::new(end))
}

/// Strict-precedence contribution attributed to `job` as a successor: for
/// every strict predecessor finishing after this job starts, the overlap in
/// ticks.
pub fn job_precedence(
    model: &SolverModel<'_>,
    assignments: &[Assignment],
    job: JobIndex,
) -> ClassTotal {
    let start = assignments[job.get()].start();
    let mut total = ClassTotal::default();
    for &pred in model.predecessors(job) {
        let pred_end = assignments[pred.get()].start() + model.duration(pred);
        if pred_end > start {
            total.record((pred_end - start) as f64);
        }
    }
    total
}

/// Ticks of the job interval not covered by the machine calendar plus ticks
/// not covered by the worker calendar.
pub fn job_calendar(model: &SolverModel<'_>, job: JobIndex, asg: &Assignment) -> ClassTotal {
    let iv = window(asg.start(), asg.start() + model.duration(job));
    let mut total = ClassTotal::default();
    let machine_gap = model.machine_calendar(asg.machine()).uncovered(&iv).value();
    if machine_gap > 0 {
        total.record(machine_gap as f64);
    }
    let worker_gap = model.worker_calendar(asg.worker()).uncovered(&iv).value();
    if worker_gap > 0 {
        total.record(worker_gap as f64);
    }
    total
}

/// Premium-rate ticks the job occupies under the worker calendar. Legal but
/// surcharged in the objective.
pub fn job_premium(model: &SolverModel<'_>, job: JobIndex, asg: &Assignment) -> f64 {
    let iv = window(asg.start(), asg.start() + model.duration(job));
    model.worker_calendar(asg.worker()).premium_overlap(&iv).value() as f64
}

/// Double-booking on one resource timeline, measured as overlap between
/// consecutive entries in start order.
pub fn timeline_capacity(timeline: &Timeline) -> ClassTotal {
    let mut total = ClassTotal::default();
    for pair in timeline.entries().windows(2) {
        let overlap = pair[0].end() - pair[1].start();
        if overlap > 0 {
            total.record(overlap as f64);
        }
    }
    total
}

/// Mobilisation ledger for one machine: relocation cost along its timeline
/// (home block first, then block to block), and the gap shortfall wherever
/// the idle time between consecutive jobs is shorter than the travel time.
pub fn machine_mobilisation(
    model: &SolverModel<'_>,
    machine: MachineIndex,
    timeline: &Timeline,
) -> (Cost, ClassTotal) {
    let mut cost = 0.0;
    let mut short = ClassTotal::default();
    let entries = timeline.entries();
    let Some(first) = entries.first() else {
        return (cost, short);
    };

    if let Some(home) = model.machine_home(machine) {
        cost += model.mobilisation_cost(machine, home, model.block_of(first.job()));
    }
    for pair in entries.windows(2) {
        let from = model.block_of(pair[0].job());
        let to = model.block_of(pair[1].job());
        cost += model.mobilisation_cost(machine, from, to);
        let travel = model.mobilisation_time(machine, from, to);
        let gap = pair[1].start() - pair[0].end();
        if gap < travel {
            short.record((travel - gap) as f64);
        }
    }
    (cost, short)
}

/// Worker timelines carry no mobilisation, only capacity.
#[inline]
pub fn worker_capacity(timeline: &Timeline) -> ClassTotal {
    timeline_capacity(timeline)
}
