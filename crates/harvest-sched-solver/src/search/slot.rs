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

//! Start-tick search for placing one job on a machine and worker pair.
//!
//! Placements returned here never double-book either resource. Calendar and
//! mobilisation feasibility stay soft: the finder snaps to calendar windows
//! when possible and otherwise falls back past the last busy interval.

use crate::model::{JobIndex, MachineIndex, SolverModel, WorkerIndex};
use crate::state::schedule::{Assignment, ScheduleState};
use harvest_sched_model::prelude::{Time, TimeSpan};

/// Earliest start permitted by the strict predecessors of `job`.
pub fn precedence_lower_bound(
    model: &SolverModel<'_>,
    assignments: &[Assignment],
    job: JobIndex,
) -> i64 {
    model
        .predecessors(job)
        .iter()
        .map(|&p| assignments[p.get()].start() + model.duration(p))
        .max()
        .unwrap_or(0)
}

/// Busy intervals of one machine/worker pair, merged and sorted, with every
/// job in `exclude` ignored.
pub fn merged_busy(
    state: &ScheduleState,
    machine: MachineIndex,
    worker: WorkerIndex,
    exclude: &[JobIndex],
) -> Vec<(i64, i64)> {
    let mut busy: Vec<(i64, i64)> = state
        .machine_timeline(machine)
        .entries()
        .iter()
        .chain(state.worker_timeline(worker).entries())
        .filter(|e| !exclude.contains(&e.job()))
        .map(|e| (e.start(), e.end()))
        .collect();
    busy.sort_unstable();
    let mut merged: Vec<(i64, i64)> = Vec::with_capacity(busy.len());
    for (s, e) in busy {
        match merged.last_mut() {
            Some(last) if s <= last.1 => last.1 = last.1.max(e),
            _ => merged.push((s, e)),
        }
    }
    merged
}

/// Earliest start `>= lower_bound` such that `[start, start + duration)`
/// misses every busy interval. Candidates are snapped into the machine
/// calendar when a window fits; if no window can hold the job the raw gap
/// is used and the calendar violation stays soft.
pub fn earliest_feasible(
    model: &SolverModel<'_>,
    machine: MachineIndex,
    busy: &[(i64, i64)],
    lower_bound: i64,
    duration: i64,
) -> i64 {
    let calendar = model.machine_calendar(machine);
    let snap = |candidate: i64| -> i64 {
        calendar
            .earliest_fit(Time::new(candidate), TimeSpan::new(duration))
            .map(|t| t.value())
            .unwrap_or(candidate)
            .max(candidate)
    };

    let mut candidate = snap(lower_bound);
    for _ in 0..busy.len() + 1 {
        match busy
            .iter()
            .find(|&&(s, e)| s < candidate + duration && candidate < e)
        {
            None => return candidate,
            Some(&(_, e)) => candidate = snap(e.max(lower_bound)),
        }
    }
    // Snapping can only move candidates forward, so at worst we land after
    // the last busy interval.
    let tail = busy.last().map(|&(_, e)| e).unwrap_or(0).max(lower_bound);
    snap(tail).max(tail)
}

/// Capacity-free placement of `job` on the given pair, ignoring its own
/// current entries.
pub fn find_start(
    model: &SolverModel<'_>,
    state: &ScheduleState,
    job: JobIndex,
    machine: MachineIndex,
    worker: WorkerIndex,
) -> i64 {
    let lb = precedence_lower_bound(model, state.assignments(), job);
    let busy = merged_busy(state, machine, worker, &[job]);
    earliest_feasible(model, machine, &busy, lb, model.duration(job))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::mv::{Move, MoveBatch};
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
            [ShiftWindow::new(TimeWindow::new(Time::new(0), Time::new(1_000)))],
            [TimeWindow::new(Time::new(100), Time::new(120))],
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
                    .with_link(PrecedenceLink::strict(jid(0), jid(1))),
            );
        for id in 0..3u32 {
            builder = builder.add_job(
                Job::new(
                    jid(id),
                    BlockIdentifier::new(1),
                    SystemIdentifier::new(1),
                    TimeSpan::new(30),
                    MachineRole::Feller,
                )
                .unwrap(),
            );
        }
        builder
            .add_machine(Machine::new(MachineIdentifier::new(1), MachineRole::Feller))
            .add_worker(Worker::new(WorkerIdentifier::new(1), [MachineRole::Feller]))
            .build()
            .unwrap()
    }

    fn state(model: &SolverModel<'_>) -> ScheduleState {
        ScheduleState::new(
            model,
            vec![
                Assignment::new(MachineIndex::new(0), WorkerIndex::new(0), 0),
                Assignment::new(MachineIndex::new(0), WorkerIndex::new(0), 30),
                Assignment::new(MachineIndex::new(0), WorkerIndex::new(0), 200),
            ],
        )
    }

    #[test]
    fn test_lower_bound_follows_predecessor() {
        let s = scenario();
        let model = SolverModel::build(&s).unwrap();
        let st = state(&model);
        assert_eq!(precedence_lower_bound(&model, st.assignments(), JobIndex::new(0)), 0);
        assert_eq!(precedence_lower_bound(&model, st.assignments(), JobIndex::new(1)), 30);
    }

    #[test]
    fn test_find_start_skips_busy_and_blackout() {
        let s = scenario();
        let model = SolverModel::build(&s).unwrap();
        let st = state(&model);
        // Machine busy [0,60) and [200,230); blackout [100,120). First gap
        // fitting 30 ticks inside a calendar segment starts at 60.
        let start = find_start(&model, &st, JobIndex::new(2), MachineIndex::new(0), WorkerIndex::new(0));
        assert_eq!(start, 60);
    }

    #[test]
    fn test_find_start_excludes_own_entry() {
        let s = scenario();
        let model = SolverModel::build(&s).unwrap();
        let mut st = state(&model);
        // Job 1 currently occupies [30, 60); with its own entry ignored the
        // earliest slot after its predecessor is that same tick.
        let start = find_start(&model, &st, JobIndex::new(1), MachineIndex::new(0), WorkerIndex::new(0));
        assert_eq!(start, 30);
        let undo = st.apply(
            &model,
            &MoveBatch::single(Move::Reassign {
                job: JobIndex::new(1),
                machine: MachineIndex::new(0),
                worker: WorkerIndex::new(0),
                start,
            }),
        );
        assert!(st.totals().capacity.is_clean());
        st.rollback(&model, undo);
    }

    #[test]
    fn test_blackout_snaps_forward() {
        let s = scenario();
        let model = SolverModel::build(&s).unwrap();
        let st = state(&model);
        // Ask for a start inside the blackout window: 30 ticks do not fit
        // between 90 and the blackout at 100, so the calendar snaps to 120,
        // which collides with nothing.
        let busy = merged_busy(&st, MachineIndex::new(0), WorkerIndex::new(0), &[
            JobIndex::new(0),
            JobIndex::new(1),
            JobIndex::new(2),
        ]);
        assert!(busy.is_empty());
        let start = earliest_feasible(&model, MachineIndex::new(0), &busy, 90, 30);
        assert_eq!(start, 120);
    }
}
