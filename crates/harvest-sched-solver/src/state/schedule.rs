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

use crate::eval::objective::ObjectiveWeights;
use crate::eval::violations::{self, ClassTotal, Totals};
use crate::model::{JobIndex, MachineIndex, SolverModel, WorkerIndex};
use crate::state::fitness::Fitness;
use crate::state::mv::{Move, MoveBatch};
use harvest_sched_core::prelude::Cost;
use smallvec::SmallVec;

/// Where one job sits: machine, worker, start tick. Every job always has an
/// assignment; search never passes through partially unassigned states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    machine: MachineIndex,
    worker: WorkerIndex,
    start: i64,
}

impl Assignment {
    #[inline]
    pub fn new(machine: MachineIndex, worker: WorkerIndex, start: i64) -> Self {
        Self {
            machine,
            worker,
            start,
        }
    }

    #[inline]
    pub fn machine(&self) -> MachineIndex {
        self.machine
    }

    #[inline]
    pub fn worker(&self) -> WorkerIndex {
        self.worker
    }

    #[inline]
    pub fn start(&self) -> i64 {
        self.start
    }

    #[inline]
    pub fn with_start(mut self, start: i64) -> Self {
        self.start = start;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineEntry {
    start: i64,
    end: i64,
    job: JobIndex,
}

impl TimelineEntry {
    #[inline]
    pub fn new(start: i64, end: i64, job: JobIndex) -> Self {
        Self { start, end, job }
    }

    #[inline]
    pub fn start(&self) -> i64 {
        self.start
    }

    #[inline]
    pub fn end(&self) -> i64 {
        self.end
    }

    #[inline]
    pub fn job(&self) -> JobIndex {
        self.job
    }
}

/// Jobs on one resource, kept sorted by start tick. Overlap is legal here;
/// it surfaces as capacity violation magnitude, not as a failed insert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    entries: Vec<TimelineEntry>,
}

impl Timeline {
    #[inline]
    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn insert(&mut self, entry: TimelineEntry) {
        let pos = self
            .entries
            .partition_point(|e| (e.start, e.job) < (entry.start, entry.job));
        self.entries.insert(pos, entry);
    }

    pub fn remove(&mut self, job: JobIndex) -> Option<TimelineEntry> {
        let pos = self.entries.iter().position(|e| e.job == job)?;
        Some(self.entries.remove(pos))
    }

    /// Latest end over all entries. Entries are sorted by start, not end, so
    /// this scans.
    pub fn max_end(&self) -> Option<i64> {
        self.entries.iter().map(|e| e.end).max()
    }
}

/// Everything needed to undo one applied batch exactly: prior assignments,
/// prior cached contributions of every touched entity, and the prior totals.
#[derive(Debug, Clone)]
pub struct Undo {
    prev: SmallVec<[(JobIndex, Assignment); 4]>,
    jobs: SmallVec<[(JobIndex, ClassTotal, ClassTotal, f64); 8]>,
    machines: SmallVec<[(MachineIndex, ClassTotal, Cost, ClassTotal); 4]>,
    workers: SmallVec<[(WorkerIndex, ClassTotal); 4]>,
    totals: Totals,
}

/// The incremental schedule representation.
///
/// Per-job contributions (precedence, calendar, premium) and per-resource
/// contributions (capacity, mobilisation) are cached; `apply` recomputes
/// only touched entries and `rollback` restores the snapshot, so rollback
/// is exact and carries no float drift.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleState {
    assignments: Vec<Assignment>,
    machine_timelines: Vec<Timeline>,
    worker_timelines: Vec<Timeline>,
    job_precedence: Vec<ClassTotal>,
    job_calendar: Vec<ClassTotal>,
    job_premium: Vec<f64>,
    machine_capacity: Vec<ClassTotal>,
    machine_mob_cost: Vec<Cost>,
    machine_mob_short: Vec<ClassTotal>,
    worker_capacity: Vec<ClassTotal>,
    totals: Totals,
}

impl ScheduleState {
    pub fn new(model: &SolverModel<'_>, assignments: Vec<Assignment>) -> Self {
        debug_assert_eq!(assignments.len(), model.job_count());

        let mut machine_timelines = vec![Timeline::default(); model.machine_count()];
        let mut worker_timelines = vec![Timeline::default(); model.worker_count()];
        for (i, asg) in assignments.iter().enumerate() {
            let job = JobIndex::new(i);
            let entry = TimelineEntry::new(asg.start(), asg.start() + model.duration(job), job);
            machine_timelines[asg.machine().get()].insert(entry);
            worker_timelines[asg.worker().get()].insert(entry);
        }

        let mut state = Self {
            job_precedence: vec![ClassTotal::default(); assignments.len()],
            job_calendar: vec![ClassTotal::default(); assignments.len()],
            job_premium: vec![0.0; assignments.len()],
            machine_capacity: vec![ClassTotal::default(); model.machine_count()],
            machine_mob_cost: vec![0.0; model.machine_count()],
            machine_mob_short: vec![ClassTotal::default(); model.machine_count()],
            worker_capacity: vec![ClassTotal::default(); model.worker_count()],
            assignments,
            machine_timelines,
            worker_timelines,
            totals: Totals::default(),
        };
        state.rebuild_caches(model);
        state
    }

    fn rebuild_caches(&mut self, model: &SolverModel<'_>) {
        let mut totals = Totals::default();
        for i in 0..self.assignments.len() {
            let job = JobIndex::new(i);
            let prec = violations::job_precedence(model, &self.assignments, job);
            let cal = violations::job_calendar(model, job, &self.assignments[i]);
            let prem = violations::job_premium(model, job, &self.assignments[i]);
            self.job_precedence[i] = prec;
            self.job_calendar[i] = cal;
            self.job_premium[i] = prem;
            totals.precedence.add(prec);
            totals.calendar.add(cal);
            totals.premium_ticks += prem;
        }
        for m in 0..self.machine_timelines.len() {
            let cap = violations::timeline_capacity(&self.machine_timelines[m]);
            let (cost, short) = violations::machine_mobilisation(
                model,
                MachineIndex::new(m),
                &self.machine_timelines[m],
            );
            self.machine_capacity[m] = cap;
            self.machine_mob_cost[m] = cost;
            self.machine_mob_short[m] = short;
            totals.capacity.add(cap);
            totals.mobilisation_cost += cost;
            totals.mobilisation.add(short);
        }
        for w in 0..self.worker_timelines.len() {
            let cap = violations::worker_capacity(&self.worker_timelines[w]);
            self.worker_capacity[w] = cap;
            totals.capacity.add(cap);
        }
        self.totals = totals;
    }

    #[inline]
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    #[inline]
    pub fn assignment(&self, job: JobIndex) -> &Assignment {
        &self.assignments[job.get()]
    }

    #[inline]
    pub fn totals(&self) -> &Totals {
        &self.totals
    }

    #[inline]
    pub fn machine_timeline(&self, machine: MachineIndex) -> &Timeline {
        &self.machine_timelines[machine.get()]
    }

    #[inline]
    pub fn worker_timeline(&self, worker: WorkerIndex) -> &Timeline {
        &self.worker_timelines[worker.get()]
    }

    /// Latest finishing tick over all machines, zero for an empty schedule.
    pub fn makespan(&self) -> i64 {
        self.machine_timelines
            .iter()
            .filter_map(Timeline::max_end)
            .max()
            .unwrap_or(0)
    }

    #[inline]
    pub fn fitness(&self, weights: &ObjectiveWeights) -> Fitness {
        Fitness::new(weights.cost(&self.totals, self.makespan()))
    }

    /// Applies a batch and returns the undo token. Contributions of touched
    /// jobs and resources are recomputed with the same functions a full
    /// rebuild uses.
    pub fn apply(&mut self, model: &SolverModel<'_>, batch: &MoveBatch) -> Undo {
        let moved = batch.touched_jobs();

        let mut undo = Undo {
            prev: SmallVec::new(),
            jobs: SmallVec::new(),
            machines: SmallVec::new(),
            workers: SmallVec::new(),
            totals: self.totals,
        };
        for &j in &moved {
            undo.prev.push((j, self.assignments[j.get()]));
        }

        // Precedence changes for the moved jobs and their strict successors.
        let mut prec_jobs: SmallVec<[JobIndex; 8]> = moved.clone();
        for &j in &moved {
            for &s in model.successors(j) {
                if !prec_jobs.contains(&s) {
                    prec_jobs.push(s);
                }
            }
        }
        for &j in &prec_jobs {
            undo.jobs.push((
                j,
                self.job_precedence[j.get()],
                self.job_calendar[j.get()],
                self.job_premium[j.get()],
            ));
        }

        // Resolve the batch into one new assignment per moved job.
        let mut next: SmallVec<[(JobIndex, Assignment); 8]> = moved
            .iter()
            .map(|&j| (j, self.assignments[j.get()]))
            .collect();
        for mv in batch.moves() {
            match *mv {
                Move::Reassign {
                    job,
                    machine,
                    worker,
                    start,
                } => {
                    if let Some(slot) = next.iter_mut().find(|(j, _)| *j == job) {
                        slot.1 = Assignment::new(machine, worker, start);
                    }
                }
                Move::SwapStarts { first, second } => {
                    let a = next.iter().position(|(j, _)| *j == first);
                    let b = next.iter().position(|(j, _)| *j == second);
                    if let (Some(a), Some(b)) = (a, b) {
                        let sa = next[a].1.start();
                        let sb = next[b].1.start();
                        next[a].1 = next[a].1.with_start(sb);
                        next[b].1 = next[b].1.with_start(sa);
                    }
                }
            }
        }

        // Touched resources: old and new machine/worker of each moved job.
        let mut machines: SmallVec<[MachineIndex; 4]> = SmallVec::new();
        let mut workers: SmallVec<[WorkerIndex; 4]> = SmallVec::new();
        for (j, new_asg) in &next {
            let old_asg = self.assignments[j.get()];
            for m in [old_asg.machine(), new_asg.machine()] {
                if !machines.contains(&m) {
                    machines.push(m);
                }
            }
            for w in [old_asg.worker(), new_asg.worker()] {
                if !workers.contains(&w) {
                    workers.push(w);
                }
            }
        }
        for &m in &machines {
            undo.machines.push((
                m,
                self.machine_capacity[m.get()],
                self.machine_mob_cost[m.get()],
                self.machine_mob_short[m.get()],
            ));
        }
        for &w in &workers {
            undo.workers.push((w, self.worker_capacity[w.get()]));
        }

        // Mutate: detach moved jobs, write new assignments, reattach.
        for &j in &moved {
            let cur = self.assignments[j.get()];
            self.machine_timelines[cur.machine().get()].remove(j);
            self.worker_timelines[cur.worker().get()].remove(j);
        }
        for &(j, asg) in &next {
            self.assignments[j.get()] = asg;
            let entry = TimelineEntry::new(asg.start(), asg.start() + model.duration(j), j);
            self.machine_timelines[asg.machine().get()].insert(entry);
            self.worker_timelines[asg.worker().get()].insert(entry);
        }

        // Recompute touched contributions and fold the deltas into totals.
        for &j in &prec_jobs {
            let new = violations::job_precedence(model, &self.assignments, j);
            self.totals.precedence.sub(self.job_precedence[j.get()]);
            self.totals.precedence.add(new);
            self.job_precedence[j.get()] = new;
        }
        for &j in &moved {
            let asg = self.assignments[j.get()];
            let cal = violations::job_calendar(model, j, &asg);
            let prem = violations::job_premium(model, j, &asg);
            self.totals.calendar.sub(self.job_calendar[j.get()]);
            self.totals.calendar.add(cal);
            self.totals.premium_ticks += prem - self.job_premium[j.get()];
            self.job_calendar[j.get()] = cal;
            self.job_premium[j.get()] = prem;
        }
        for &m in &machines {
            let cap = violations::timeline_capacity(&self.machine_timelines[m.get()]);
            let (cost, short) =
                violations::machine_mobilisation(model, m, &self.machine_timelines[m.get()]);
            self.totals.capacity.sub(self.machine_capacity[m.get()]);
            self.totals.capacity.add(cap);
            self.totals.mobilisation_cost += cost - self.machine_mob_cost[m.get()];
            self.totals.mobilisation.sub(self.machine_mob_short[m.get()]);
            self.totals.mobilisation.add(short);
            self.machine_capacity[m.get()] = cap;
            self.machine_mob_cost[m.get()] = cost;
            self.machine_mob_short[m.get()] = short;
        }
        for &w in &workers {
            let cap = violations::worker_capacity(&self.worker_timelines[w.get()]);
            self.totals.capacity.sub(self.worker_capacity[w.get()]);
            self.totals.capacity.add(cap);
            self.worker_capacity[w.get()] = cap;
        }

        undo
    }

    /// Restores the state to exactly what it was before the matching
    /// [`apply`](ScheduleState::apply).
    pub fn rollback(&mut self, model: &SolverModel<'_>, undo: Undo) {
        for &(j, _) in &undo.prev {
            let cur = self.assignments[j.get()];
            self.machine_timelines[cur.machine().get()].remove(j);
            self.worker_timelines[cur.worker().get()].remove(j);
        }
        for &(j, asg) in &undo.prev {
            self.assignments[j.get()] = asg;
            let entry = TimelineEntry::new(asg.start(), asg.start() + model.duration(j), j);
            self.machine_timelines[asg.machine().get()].insert(entry);
            self.worker_timelines[asg.worker().get()].insert(entry);
        }
        for &(j, prec, cal, prem) in &undo.jobs {
            self.job_precedence[j.get()] = prec;
            self.job_calendar[j.get()] = cal;
            self.job_premium[j.get()] = prem;
        }
        for &(m, cap, cost, short) in &undo.machines {
            self.machine_capacity[m.get()] = cap;
            self.machine_mob_cost[m.get()] = cost;
            self.machine_mob_short[m.get()] = short;
        }
        for &(w, cap) in &undo.workers {
            self.worker_capacity[w.get()] = cap;
        }
        self.totals = undo.totals;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use harvest_sched_model::prelude::*;
    use harvest_sched_model::scenario::{
        HarvestSystem, MobilisationTable, PrecedenceLink, ScenarioBuilder, ShiftWindow,
    };
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[inline]
    fn jid(v: u32) -> JobIdentifier {
        JobIdentifier::new(v)
    }

    fn cal(a: i64, b: i64) -> ShiftCalendar {
        ShiftCalendar::new(
            [ShiftWindow::new(TimeWindow::new(Time::new(a), Time::new(b)))],
            [],
        )
        .unwrap()
    }

    fn scenario() -> Scenario {
        let mut builder = ScenarioBuilder::new()
            .with_global_calendar(cal(0, 10_000))
            .add_block(Block::new(
                BlockIdentifier::new(1),
                (0.0, 0.0),
                10.0,
                10.0,
                TerrainKind::Gentle,
            ))
            .add_block(Block::new(
                BlockIdentifier::new(2),
                (6.0, 8.0),
                20.0,
                30.0,
                TerrainKind::Moderate,
            ))
            .add_system(
                HarvestSystem::new(SystemIdentifier::new(1), SystemKind::GroundBased)
                    .with_link(PrecedenceLink::strict(jid(0), jid(1)))
                    .with_link(PrecedenceLink::strict(jid(1), jid(2))),
            )
            .with_mobilisation(MobilisationTable::new(1.0, 1.0));
        for (id, block, dur) in [(0u32, 1u32, 30i64), (1, 1, 40), (2, 2, 20), (3, 2, 25)] {
            builder = builder.add_job(
                Job::new(
                    jid(id),
                    BlockIdentifier::new(block),
                    SystemIdentifier::new(1),
                    TimeSpan::new(dur),
                    MachineRole::Skidder,
                )
                .unwrap(),
            );
        }
        builder
            .add_machine(Machine::new(MachineIdentifier::new(1), MachineRole::Skidder))
            .add_machine(Machine::new(MachineIdentifier::new(2), MachineRole::Skidder))
            .add_worker(Worker::new(WorkerIdentifier::new(1), [MachineRole::Skidder]))
            .add_worker(Worker::new(WorkerIdentifier::new(2), [MachineRole::Skidder]))
            .build()
            .unwrap()
    }

    fn spread_assignments() -> Vec<Assignment> {
        vec![
            Assignment::new(MachineIndex::new(0), WorkerIndex::new(0), 0),
            Assignment::new(MachineIndex::new(0), WorkerIndex::new(0), 40),
            Assignment::new(MachineIndex::new(1), WorkerIndex::new(1), 100),
            Assignment::new(MachineIndex::new(1), WorkerIndex::new(1), 200),
        ]
    }

    #[test]
    fn test_clean_schedule_has_no_violations() {
        let s = scenario();
        let model = SolverModel::build(&s).unwrap();
        let state = ScheduleState::new(&model, spread_assignments());
        assert!(state.totals().precedence.is_clean());
        assert!(state.totals().capacity.is_clean());
        assert!(state.totals().calendar.is_clean());
        assert_eq!(state.makespan(), 225);
    }

    #[test]
    fn test_capacity_overlap_detected() {
        let s = scenario();
        let model = SolverModel::build(&s).unwrap();
        let mut asg = spread_assignments();
        // Jobs 0 and 1 on the same machine with overlapping intervals.
        asg[1] = Assignment::new(MachineIndex::new(0), WorkerIndex::new(1), 10);
        let state = ScheduleState::new(&model, asg);
        // Machine 0 carries both [0,30) and [10,50): 20 ticks of overlap.
        assert_eq!(state.totals().capacity.count, 1);
        assert_eq!(state.totals().capacity.magnitude, 20.0);
    }

    #[test]
    fn test_precedence_violation_detected() {
        let s = scenario();
        let model = SolverModel::build(&s).unwrap();
        let mut asg = spread_assignments();
        // Job 1 starts before job 0 ends (strict link 0 -> 1).
        asg[1] = asg[1].with_start(20);
        let state = ScheduleState::new(&model, asg);
        assert_eq!(state.totals().precedence.count, 1);
        assert_eq!(state.totals().precedence.magnitude, 10.0);
    }

    #[test]
    fn test_apply_then_rollback_is_identity() {
        let s = scenario();
        let model = SolverModel::build(&s).unwrap();
        let mut state = ScheduleState::new(&model, spread_assignments());
        let reference = state.clone();

        let mut batch = MoveBatch::new();
        batch.push(Move::Reassign {
            job: JobIndex::new(0),
            machine: MachineIndex::new(1),
            worker: WorkerIndex::new(1),
            start: 150,
        });
        batch.push(Move::SwapStarts {
            first: JobIndex::new(2),
            second: JobIndex::new(3),
        });
        let undo = state.apply(&model, &batch);
        assert_ne!(state, reference);
        state.rollback(&model, undo);
        assert_eq!(state, reference);
    }

    #[test]
    fn test_incremental_matches_full_rebuild() {
        let s = scenario();
        let model = SolverModel::build(&s).unwrap();
        let mut state = ScheduleState::new(&model, spread_assignments());
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for step in 0..200 {
            let job = JobIndex::new(rng.random_range(0..model.job_count()));
            let batch = if step % 5 == 0 {
                let other = JobIndex::new(rng.random_range(0..model.job_count()));
                MoveBatch::single(Move::SwapStarts {
                    first: job,
                    second: other,
                })
            } else {
                MoveBatch::single(Move::Reassign {
                    job,
                    machine: MachineIndex::new(rng.random_range(0..model.machine_count())),
                    worker: WorkerIndex::new(rng.random_range(0..model.worker_count())),
                    start: rng.random_range(0..500),
                })
            };
            let undo = state.apply(&model, &batch);
            if rng.random::<f64>() < 0.3 {
                state.rollback(&model, undo);
            }

            let rebuilt = ScheduleState::new(&model, state.assignments().to_vec());
            assert_eq!(rebuilt.totals().precedence.count, state.totals().precedence.count);
            assert!(
                (rebuilt.totals().precedence.magnitude - state.totals().precedence.magnitude).abs()
                    < 1e-9
            );
            assert_eq!(rebuilt.totals().capacity.count, state.totals().capacity.count);
            assert!(
                (rebuilt.totals().capacity.magnitude - state.totals().capacity.magnitude).abs()
                    < 1e-9
            );
            assert_eq!(rebuilt.totals().calendar.count, state.totals().calendar.count);
            assert!(
                (rebuilt.totals().mobilisation_cost - state.totals().mobilisation_cost).abs() < 1e-6
            );
            assert!((rebuilt.totals().premium_ticks - state.totals().premium_ticks).abs() < 1e-9);
            assert_eq!(rebuilt.makespan(), state.makespan());
        }
    }
}
