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

use crate::model::err::{
    InfeasibleScenarioError, MissingResource, MissingResourceError, RoleOvercommittedError,
};
use crate::model::index::{BlockIndex, JobIndex, MachineIndex, WorkerIndex};
use harvest_sched_core::prelude::Cost;
use harvest_sched_model::prelude::*;
use harvest_sched_model::scenario::{Block, Job, Machine, ShiftCalendar, Worker};
use std::collections::{BTreeMap, VecDeque};

/// Strict precedence edges in compressed adjacency form.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Adjacency {
    offsets: Vec<usize>,
    targets: Vec<JobIndex>,
}

impl Adjacency {
    fn build(node_count: usize, edges: &[(usize, usize)]) -> Self {
        let mut counts = vec![0usize; node_count];
        for &(from, _) in edges {
            counts[from] += 1;
        }
        let mut offsets = Vec::with_capacity(node_count + 1);
        let mut acc = 0usize;
        offsets.push(0);
        for c in &counts {
            acc += c;
            offsets.push(acc);
        }
        let mut cursor = offsets.clone();
        let mut targets = vec![JobIndex::new(0); edges.len()];
        for &(from, to) in edges {
            targets[cursor[from]] = JobIndex::new(to);
            cursor[from] += 1;
        }
        Self { offsets, targets }
    }

    #[inline]
    fn neighbors(&self, node: usize) -> &[JobIndex] {
        &self.targets[self.offsets[node]..self.offsets[node + 1]]
    }
}

/// Search-friendly view of a [`Scenario`]: dense indices, strict precedence
/// as forward and backward adjacency, per-job compatibility lists, and a
/// dense mobilisation matrix over blocks.
///
/// Building fails with [`InfeasibleScenarioError`] when any job has no
/// machine of its role or no certified worker at all, or when a role's
/// total processing demand exceeds the shift time its resources supply.
#[derive(Debug, Clone)]
pub struct SolverModel<'s> {
    scenario: &'s Scenario,
    jobs: Vec<&'s Job>,
    machines: Vec<&'s Machine>,
    workers: Vec<&'s Worker>,
    blocks: Vec<&'s Block>,
    job_lookup: BTreeMap<JobIdentifier, JobIndex>,
    block_of_job: Vec<BlockIndex>,
    preds: Adjacency,
    succs: Adjacency,
    topo: Vec<JobIndex>,
    compatible_machines: Vec<Vec<MachineIndex>>,
    compatible_workers: Vec<Vec<WorkerIndex>>,
    machine_home: Vec<Option<BlockIndex>>,
    machine_factor: Vec<f64>,
    machine_calendars: Vec<&'s ShiftCalendar>,
    worker_calendars: Vec<&'s ShiftCalendar>,
    mob_cost: Vec<Cost>,
    mob_time: Vec<i64>,
}

impl<'s> SolverModel<'s> {
    pub fn build(scenario: &'s Scenario) -> Result<Self, InfeasibleScenarioError> {
        let jobs: Vec<&Job> = scenario.jobs().iter().collect();
        let machines: Vec<&Machine> = scenario.machines().collect();
        let workers: Vec<&Worker> = scenario.workers().collect();
        let blocks: Vec<&Block> = scenario.blocks().collect();

        let job_lookup: BTreeMap<JobIdentifier, JobIndex> = jobs
            .iter()
            .enumerate()
            .map(|(i, j)| (j.id(), JobIndex::new(i)))
            .collect();
        let block_lookup: BTreeMap<BlockIdentifier, BlockIndex> = blocks
            .iter()
            .enumerate()
            .map(|(i, b)| (b.id(), BlockIndex::new(i)))
            .collect();

        let block_of_job: Vec<BlockIndex> = jobs
            .iter()
            .map(|j| block_lookup.get(&j.block()).copied().unwrap_or(BlockIndex::new(0)))
            .collect();

        // Builder validation guarantees that every link endpoint resolves.
        let mut edges: Vec<(usize, usize)> = Vec::new();
        for system in scenario.systems().iter() {
            for link in system.strict_links() {
                let (Some(&p), Some(&q)) = (
                    job_lookup.get(&link.predecessor()),
                    job_lookup.get(&link.successor()),
                ) else {
                    continue;
                };
                edges.push((p.get(), q.get()));
            }
        }
        let succs = Adjacency::build(jobs.len(), &edges);
        let rev: Vec<(usize, usize)> = edges.iter().map(|&(a, b)| (b, a)).collect();
        let preds = Adjacency::build(jobs.len(), &rev);
        let topo = topological_order(jobs.len(), &succs, &preds);

        let mut compatible_machines = Vec::with_capacity(jobs.len());
        let mut compatible_workers = Vec::with_capacity(jobs.len());
        for job in &jobs {
            let ms: Vec<MachineIndex> = machines
                .iter()
                .enumerate()
                .filter(|(_, m)| m.can_perform(job.role()))
                .map(|(i, _)| MachineIndex::new(i))
                .collect();
            if ms.is_empty() {
                return Err(MissingResourceError::new(
                    job.id(),
                    job.role(),
                    MissingResource::Machine,
                )
                .into());
            }
            let ws: Vec<WorkerIndex> = workers
                .iter()
                .enumerate()
                .filter(|(_, w)| w.can_operate(job.role()))
                .map(|(i, _)| WorkerIndex::new(i))
                .collect();
            if ws.is_empty() {
                return Err(MissingResourceError::new(
                    job.id(),
                    job.role(),
                    MissingResource::Worker,
                )
                .into());
            }
            compatible_machines.push(ms);
            compatible_workers.push(ws);
        }

        let machine_home: Vec<Option<BlockIndex>> = machines
            .iter()
            .map(|m| m.home_block().and_then(|b| block_lookup.get(&b).copied()))
            .collect();
        let table = scenario.mobilisation_table();
        let machine_factor: Vec<f64> = machines.iter().map(|m| table.role_factor(m.role())).collect();

        let machine_calendars: Vec<&ShiftCalendar> = machines
            .iter()
            .map(|m| scenario.machine_calendar(m.id()))
            .collect();
        let worker_calendars: Vec<&ShiftCalendar> = workers
            .iter()
            .map(|w| scenario.worker_calendar(w.id()))
            .collect();

        // Aggregate screen: a role whose total processing time exceeds the
        // shift time its machines (or certified workers) can ever supply is
        // unschedulable no matter where the jobs land. Necessary condition
        // only; a worker certified for several roles counts towards each.
        let mut demand: BTreeMap<MachineRole, i64> = BTreeMap::new();
        for job in &jobs {
            *demand.entry(job.role()).or_default() += job.duration().value();
        }
        for (&role, &need) in &demand {
            let machine_open: i64 = machines
                .iter()
                .enumerate()
                .filter(|(_, m)| m.can_perform(role))
                .map(|(i, _)| machine_calendars[i].total_open().value())
                .sum();
            if machine_open < need {
                return Err(RoleOvercommittedError::new(
                    role,
                    MissingResource::Machine,
                    need,
                    machine_open,
                )
                .into());
            }
            let worker_open: i64 = workers
                .iter()
                .enumerate()
                .filter(|(_, w)| w.can_operate(role))
                .map(|(i, _)| worker_calendars[i].total_open().value())
                .sum();
            if worker_open < need {
                return Err(RoleOvercommittedError::new(
                    role,
                    MissingResource::Worker,
                    need,
                    worker_open,
                )
                .into());
            }
        }

        let nb = blocks.len();
        let mut mob_cost = vec![0.0; nb * nb];
        let mut mob_time = vec![0i64; nb * nb];
        for (i, from) in blocks.iter().enumerate() {
            for (k, to) in blocks.iter().enumerate() {
                let m = table.lookup_base(from, to);
                mob_cost[i * nb + k] = m.cost();
                mob_time[i * nb + k] = m.time().value();
            }
        }

        Ok(Self {
            scenario,
            jobs,
            machines,
            workers,
            blocks,
            job_lookup,
            block_of_job,
            preds,
            succs,
            topo,
            compatible_machines,
            compatible_workers,
            machine_home,
            machine_factor,
            machine_calendars,
            worker_calendars,
            mob_cost,
            mob_time,
        })
    }

    #[inline]
    pub fn scenario(&self) -> &'s Scenario {
        self.scenario
    }

    #[inline]
    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    #[inline]
    pub fn machine_count(&self) -> usize {
        self.machines.len()
    }

    #[inline]
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    #[inline]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    pub fn job(&self, index: JobIndex) -> &'s Job {
        self.jobs[index.get()]
    }

    #[inline]
    pub fn machine(&self, index: MachineIndex) -> &'s Machine {
        self.machines[index.get()]
    }

    #[inline]
    pub fn worker(&self, index: WorkerIndex) -> &'s Worker {
        self.workers[index.get()]
    }

    #[inline]
    pub fn block(&self, index: BlockIndex) -> &'s Block {
        self.blocks[index.get()]
    }

    #[inline]
    pub fn job_index(&self, id: JobIdentifier) -> Option<JobIndex> {
        self.job_lookup.get(&id).copied()
    }

    #[inline]
    pub fn duration(&self, job: JobIndex) -> i64 {
        self.jobs[job.get()].duration().value()
    }

    #[inline]
    pub fn block_of(&self, job: JobIndex) -> BlockIndex {
        self.block_of_job[job.get()]
    }

    /// Strict predecessors of `job`.
    #[inline]
    pub fn predecessors(&self, job: JobIndex) -> &[JobIndex] {
        self.preds.neighbors(job.get())
    }

    /// Strict successors of `job`.
    #[inline]
    pub fn successors(&self, job: JobIndex) -> &[JobIndex] {
        self.succs.neighbors(job.get())
    }

    /// All jobs in an order consistent with strict precedence.
    #[inline]
    pub fn topo_order(&self) -> &[JobIndex] {
        &self.topo
    }

    #[inline]
    pub fn compatible_machines(&self, job: JobIndex) -> &[MachineIndex] {
        &self.compatible_machines[job.get()]
    }

    #[inline]
    pub fn compatible_workers(&self, job: JobIndex) -> &[WorkerIndex] {
        &self.compatible_workers[job.get()]
    }

    #[inline]
    pub fn machine_home(&self, machine: MachineIndex) -> Option<BlockIndex> {
        self.machine_home[machine.get()]
    }

    #[inline]
    pub fn machine_calendar(&self, machine: MachineIndex) -> &'s ShiftCalendar {
        self.machine_calendars[machine.get()]
    }

    #[inline]
    pub fn worker_calendar(&self, worker: WorkerIndex) -> &'s ShiftCalendar {
        self.worker_calendars[worker.get()]
    }

    /// Mobilisation cost for moving `machine` between two blocks, already
    /// scaled by its role factor.
    #[inline]
    pub fn mobilisation_cost(&self, machine: MachineIndex, from: BlockIndex, to: BlockIndex) -> Cost {
        self.mob_cost[from.get() * self.blocks.len() + to.get()] * self.machine_factor[machine.get()]
    }

    /// Role-scaled mobilisation travel time in ticks, rounded up.
    #[inline]
    pub fn mobilisation_time(&self, machine: MachineIndex, from: BlockIndex, to: BlockIndex) -> i64 {
        let base = self.mob_time[from.get() * self.blocks.len() + to.get()];
        (base as f64 * self.machine_factor[machine.get()]).ceil() as i64
    }
}

fn topological_order(node_count: usize, succs: &Adjacency, preds: &Adjacency) -> Vec<JobIndex> {
    let mut indegree: Vec<usize> = (0..node_count).map(|i| preds.neighbors(i).len()).collect();
    let mut queue: VecDeque<usize> = (0..node_count).filter(|&i| indegree[i] == 0).collect();
    let mut order = Vec::with_capacity(node_count);
    while let Some(i) = queue.pop_front() {
        order.push(JobIndex::new(i));
        for &s in succs.neighbors(i) {
            indegree[s.get()] -= 1;
            if indegree[s.get()] == 0 {
                queue.push_back(s.get());
            }
        }
    }
    debug_assert_eq!(order.len(), node_count);
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use harvest_sched_model::scenario::{
        HarvestSystem, MobilisationTable, PrecedenceLink, ScenarioBuilder, ShiftWindow,
    };

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
        ScenarioBuilder::new()
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
                (3.0, 4.0),
                20.0,
                30.0,
                TerrainKind::Moderate,
            ))
            .add_system(
                HarvestSystem::new(SystemIdentifier::new(1), SystemKind::GroundBased)
                    .with_link(PrecedenceLink::strict(jid(1), jid(2)))
                    .with_link(PrecedenceLink::strict(jid(2), jid(3))),
            )
            .add_job(
                Job::new(
                    jid(1),
                    BlockIdentifier::new(1),
                    SystemIdentifier::new(1),
                    TimeSpan::new(30),
                    MachineRole::Feller,
                )
                .unwrap(),
            )
            .add_job(
                Job::new(
                    jid(2),
                    BlockIdentifier::new(1),
                    SystemIdentifier::new(1),
                    TimeSpan::new(40),
                    MachineRole::Skidder,
                )
                .unwrap(),
            )
            .add_job(
                Job::new(
                    jid(3),
                    BlockIdentifier::new(2),
                    SystemIdentifier::new(1),
                    TimeSpan::new(20),
                    MachineRole::Skidder,
                )
                .unwrap(),
            )
            .add_machine(Machine::new(MachineIdentifier::new(1), MachineRole::Feller))
            .add_machine(Machine::new(MachineIdentifier::new(2), MachineRole::Skidder))
            .add_worker(Worker::new(
                WorkerIdentifier::new(1),
                [MachineRole::Feller, MachineRole::Skidder],
            ))
            .with_mobilisation(MobilisationTable::new(2.0, 1.0))
            .build()
            .unwrap()
    }

    #[test]
    fn test_topo_order_respects_strict_links() {
        let s = scenario();
        let model = SolverModel::build(&s).unwrap();
        let pos: Vec<usize> = (0..3)
            .map(|i| {
                model
                    .topo_order()
                    .iter()
                    .position(|&j| j == JobIndex::new(i))
                    .unwrap()
            })
            .collect();
        assert!(pos[0] < pos[1]);
        assert!(pos[1] < pos[2]);
        assert_eq!(model.predecessors(JobIndex::new(2)), &[JobIndex::new(1)]);
        assert_eq!(model.successors(JobIndex::new(0)), &[JobIndex::new(1)]);
    }

    #[test]
    fn test_compatibility_lists() {
        let s = scenario();
        let model = SolverModel::build(&s).unwrap();
        assert_eq!(model.compatible_machines(JobIndex::new(0)), &[MachineIndex::new(0)]);
        assert_eq!(model.compatible_machines(JobIndex::new(1)), &[MachineIndex::new(1)]);
        assert_eq!(model.compatible_workers(JobIndex::new(0)), &[WorkerIndex::new(0)]);
    }

    #[test]
    fn test_missing_machine_role_is_infeasible() {
        let s = ScenarioBuilder::new()
            .with_global_calendar(cal(0, 100))
            .add_block(Block::new(
                BlockIdentifier::new(1),
                (0.0, 0.0),
                1.0,
                1.0,
                TerrainKind::Gentle,
            ))
            .add_system(HarvestSystem::new(SystemIdentifier::new(1), SystemKind::Helicopter))
            .add_job(
                Job::new(
                    jid(1),
                    BlockIdentifier::new(1),
                    SystemIdentifier::new(1),
                    TimeSpan::new(10),
                    MachineRole::Helicopter,
                )
                .unwrap(),
            )
            .add_worker(Worker::new(WorkerIdentifier::new(1), [MachineRole::Helicopter]))
            .build()
            .unwrap();
        let err = SolverModel::build(&s).unwrap_err();
        let InfeasibleScenarioError::MissingResource(e) = err else {
            panic!("expected a missing-resource error, got {err}");
        };
        assert_eq!(e.missing(), MissingResource::Machine);
        assert_eq!(e.job(), jid(1));
    }

    #[test]
    fn test_missing_certified_worker_is_infeasible() {
        let s = ScenarioBuilder::new()
            .with_global_calendar(cal(0, 100))
            .add_block(Block::new(
                BlockIdentifier::new(1),
                (0.0, 0.0),
                1.0,
                1.0,
                TerrainKind::Gentle,
            ))
            .add_system(HarvestSystem::new(SystemIdentifier::new(1), SystemKind::GroundBased))
            .add_job(
                Job::new(
                    jid(1),
                    BlockIdentifier::new(1),
                    SystemIdentifier::new(1),
                    TimeSpan::new(10),
                    MachineRole::Feller,
                )
                .unwrap(),
            )
            .add_machine(Machine::new(MachineIdentifier::new(1), MachineRole::Feller))
            .add_worker(Worker::new(WorkerIdentifier::new(1), [MachineRole::Skidder]))
            .build()
            .unwrap();
        let err = SolverModel::build(&s).unwrap_err();
        let InfeasibleScenarioError::MissingResource(e) = err else {
            panic!("expected a missing-resource error, got {err}");
        };
        assert_eq!(e.missing(), MissingResource::Worker);
    }

    #[test]
    fn test_overcommitted_sole_machine_is_infeasible() {
        // Two 40-tick feller jobs, one feller machine, one 60-tick shift:
        // 80 ticks of demand can never fit, regardless of placement.
        let s = ScenarioBuilder::new()
            .with_global_calendar(cal(0, 60))
            .add_block(Block::new(
                BlockIdentifier::new(1),
                (0.0, 0.0),
                1.0,
                1.0,
                TerrainKind::Gentle,
            ))
            .add_system(HarvestSystem::new(SystemIdentifier::new(1), SystemKind::GroundBased))
            .add_job(
                Job::new(
                    jid(1),
                    BlockIdentifier::new(1),
                    SystemIdentifier::new(1),
                    TimeSpan::new(40),
                    MachineRole::Feller,
                )
                .unwrap(),
            )
            .add_job(
                Job::new(
                    jid(2),
                    BlockIdentifier::new(1),
                    SystemIdentifier::new(1),
                    TimeSpan::new(40),
                    MachineRole::Feller,
                )
                .unwrap(),
            )
            .add_machine(Machine::new(MachineIdentifier::new(1), MachineRole::Feller))
            .add_worker(Worker::new(WorkerIdentifier::new(1), [MachineRole::Feller]))
            .build()
            .unwrap();
        let err = SolverModel::build(&s).unwrap_err();
        let InfeasibleScenarioError::RoleOvercommitted(e) = err else {
            panic!("expected an overcommitment error, got {err}");
        };
        assert_eq!(e.role(), MachineRole::Feller);
        assert_eq!(e.resource(), MissingResource::Machine);
        assert_eq!(e.demand(), 80);
        assert_eq!(e.available(), 60);
    }

    #[test]
    fn test_mobilisation_matrix() {
        let s = scenario();
        let model = SolverModel::build(&s).unwrap();
        let b0 = BlockIndex::new(0);
        let b1 = BlockIndex::new(1);
        let m = MachineIndex::new(0);
        assert_eq!(model.mobilisation_cost(m, b0, b0), 0.0);
        assert_eq!(model.mobilisation_cost(m, b0, b1), 10.0);
        assert_eq!(model.mobilisation_time(m, b0, b1), 5);
    }
}
