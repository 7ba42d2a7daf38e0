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

use crate::model::{MachineIndex, SolverModel, WorkerIndex};
use crate::search::slot;
use crate::state::schedule::Assignment;

/// Produces the initial assignment vector the search starts from. `None`
/// means the backend is unavailable for this model; the engine then falls
/// back to the greedy construction.
pub trait WarmStart {
    fn name(&self) -> &'static str;

    fn warm_start(&self, model: &SolverModel<'_>) -> Option<Vec<Assignment>>;
}

/// Topological greedy construction: jobs are placed in precedence order,
/// each on the compatible machine/worker pair with the earliest
/// capacity-free slot. The result respects precedence and capacity by
/// construction; calendar and mobilisation costs are left to the search.
pub fn greedy_assignments(model: &SolverModel<'_>) -> Vec<Assignment> {
    let nj = model.job_count();
    let mut assignments = vec![Assignment::new(MachineIndex::new(0), WorkerIndex::new(0), 0); nj];
    let mut planned_end = vec![0i64; nj];
    let mut machine_busy: Vec<Vec<(i64, i64)>> = vec![Vec::new(); model.machine_count()];
    let mut worker_busy: Vec<Vec<(i64, i64)>> = vec![Vec::new(); model.worker_count()];

    for &job in model.topo_order() {
        let duration = model.duration(job);
        let lb = model
            .predecessors(job)
            .iter()
            .map(|&p| planned_end[p.get()])
            .max()
            .unwrap_or(0);

        let mut best: Option<(i64, MachineIndex, WorkerIndex)> = None;
        for &m in model.compatible_machines(job) {
            for &w in model.compatible_workers(job) {
                let mut busy: Vec<(i64, i64)> = machine_busy[m.get()]
                    .iter()
                    .chain(worker_busy[w.get()].iter())
                    .copied()
                    .collect();
                busy.sort_unstable();
                let start = slot::earliest_feasible(model, m, &busy, lb, duration);
                let better = match best {
                    None => true,
                    Some((s, bm, bw)) => (start, m.get(), w.get()) < (s, bm.get(), bw.get()),
                };
                if better {
                    best = Some((start, m, w));
                }
            }
        }

        // Compatibility lists are non-empty, SolverModel::build screens
        // for that.
        if let Some((start, m, w)) = best {
            assignments[job.get()] = Assignment::new(m, w, start);
            planned_end[job.get()] = start + duration;
            machine_busy[m.get()].push((start, start + duration));
            worker_busy[w.get()].push((start, start + duration));
        }
    }
    assignments
}

/// The default opening, always available.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyOpening;

impl WarmStart for GreedyOpening {
    fn name(&self) -> &'static str {
        "greedy-opening"
    }

    fn warm_start(&self, model: &SolverModel<'_>) -> Option<Vec<Assignment>> {
        Some(greedy_assignments(model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::ObjectiveWeights;
    use crate::state::schedule::ScheduleState;
    use harvest_sched_model::prelude::*;
    use harvest_sched_model::scenario::{
        HarvestSystem, PrecedenceLink, ScenarioBuilder, ShiftWindow,
    };

    #[inline]
    fn jid(v: u32) -> JobIdentifier {
        JobIdentifier::new(v)
    }

    fn scenario() -> Scenario {
        let cal = ShiftCalendar::new(
            [ShiftWindow::new(TimeWindow::new(Time::new(0), Time::new(10_000)))],
            [],
        )
        .unwrap();
        let mut builder = ScenarioBuilder::new()
            .with_global_calendar(cal)
            .add_block(Block::new(
                BlockIdentifier::new(1),
                (0.0, 0.0),
                5.0,
                5.0,
                TerrainKind::Gentle,
            ))
            .add_system(
                HarvestSystem::new(SystemIdentifier::new(1), SystemKind::GroundBased)
                    .with_link(PrecedenceLink::strict(jid(0), jid(1)))
                    .with_link(PrecedenceLink::strict(jid(1), jid(2))),
            );
        for id in 0..4u32 {
            builder = builder.add_job(
                Job::new(
                    jid(id),
                    BlockIdentifier::new(1),
                    SystemIdentifier::new(1),
                    TimeSpan::new(50),
                    MachineRole::Feller,
                )
                .unwrap(),
            );
        }
        builder
            .add_machine(Machine::new(MachineIdentifier::new(1), MachineRole::Feller))
            .add_machine(Machine::new(MachineIdentifier::new(2), MachineRole::Feller))
            .add_worker(Worker::new(WorkerIdentifier::new(1), [MachineRole::Feller]))
            .add_worker(Worker::new(WorkerIdentifier::new(2), [MachineRole::Feller]))
            .build()
            .unwrap()
    }

    #[test]
    fn test_opening_is_precedence_and_capacity_clean() {
        let s = scenario();
        let model = SolverModel::build(&s).unwrap();
        let assignments = greedy_assignments(&model);
        let state = ScheduleState::new(&model, assignments);
        assert!(state.totals().precedence.is_clean());
        assert!(state.totals().capacity.is_clean());
        assert!(state.totals().calendar.is_clean());
    }

    #[test]
    fn test_opening_orders_the_chain() {
        let s = scenario();
        let model = SolverModel::build(&s).unwrap();
        let assignments = greedy_assignments(&model);
        let end0 = assignments[0].start() + model.duration(crate::model::JobIndex::new(0));
        let end1 = assignments[1].start() + model.duration(crate::model::JobIndex::new(1));
        assert!(assignments[1].start() >= end0);
        assert!(assignments[2].start() >= end1);
    }

    #[test]
    fn test_opening_fitness_is_finite() {
        let s = scenario();
        let model = SolverModel::build(&s).unwrap();
        let state = ScheduleState::new(&model, greedy_assignments(&model));
        let fitness = state.fitness(&ObjectiveWeights::default());
        assert!(fitness.total().is_finite());
    }
}
