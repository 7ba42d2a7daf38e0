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

use crate::common::{
    BlockIdentifier, JobIdentifier, MachineIdentifier, SystemIdentifier, WorkerIdentifier,
};
use crate::scenario::block::Block;
use crate::scenario::calendar::{CalendarError, EmptyCalendarError, ShiftCalendar};
use crate::scenario::err::{
    DuplicateEntityError, PrecedenceCycleError, RoleOutsideSystemError, ScenarioError,
    UnknownBlockError, UnknownJobError, UnknownMachineError, UnknownSystemError,
    UnknownWorkerError,
};
use crate::scenario::job::Job;
use crate::scenario::mobilisation::MobilisationTable;
use crate::scenario::resource::{Machine, Worker};
use crate::scenario::scenario::Scenario;
use crate::scenario::system::{HarvestSystem, SystemRegistry};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// Collects scenario entities and validates them into a [`Scenario`] on
/// [`build`](ScenarioBuilder::build).
#[derive(Debug, Clone, Default)]
pub struct ScenarioBuilder {
    blocks: Vec<Block>,
    jobs: Vec<Job>,
    machines: Vec<Machine>,
    workers: Vec<Worker>,
    systems: Vec<HarvestSystem>,
    global_calendar: Option<ShiftCalendar>,
    machine_calendars: Vec<(MachineIdentifier, ShiftCalendar)>,
    worker_calendars: Vec<(WorkerIdentifier, ShiftCalendar)>,
    mobilisation: MobilisationTable,
}

impl ScenarioBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn add_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    #[inline]
    pub fn add_job(mut self, job: Job) -> Self {
        self.jobs.push(job);
        self
    }

    #[inline]
    pub fn add_machine(mut self, machine: Machine) -> Self {
        self.machines.push(machine);
        self
    }

    #[inline]
    pub fn add_worker(mut self, worker: Worker) -> Self {
        self.workers.push(worker);
        self
    }

    #[inline]
    pub fn add_system(mut self, system: HarvestSystem) -> Self {
        self.systems.push(system);
        self
    }

    #[inline]
    pub fn with_global_calendar(mut self, calendar: ShiftCalendar) -> Self {
        self.global_calendar = Some(calendar);
        self
    }

    /// Overrides the global calendar for one machine. Last write wins.
    #[inline]
    pub fn with_machine_calendar(
        mut self,
        machine: MachineIdentifier,
        calendar: ShiftCalendar,
    ) -> Self {
        self.machine_calendars.push((machine, calendar));
        self
    }

    /// Overrides the global calendar for one worker. Last write wins.
    #[inline]
    pub fn with_worker_calendar(mut self, worker: WorkerIdentifier, calendar: ShiftCalendar) -> Self {
        self.worker_calendars.push((worker, calendar));
        self
    }

    #[inline]
    pub fn with_mobilisation(mut self, table: MobilisationTable) -> Self {
        self.mobilisation = table;
        self
    }

    /// Validates all cross references and returns the immutable scenario.
    pub fn build(self) -> Result<Scenario, ScenarioError> {
        let global_calendar = self
            .global_calendar
            .ok_or(CalendarError::Empty(EmptyCalendarError))?;

        let mut blocks = BTreeMap::new();
        for b in self.blocks {
            if blocks.insert(b.id(), b.clone()).is_some() {
                return Err(DuplicateEntityError::new("block", *b.id().value()).into());
            }
        }

        let mut systems = SystemRegistry::new();
        for s in self.systems {
            let id = s.id();
            if systems.insert(s).is_some() {
                return Err(DuplicateEntityError::new("system", *id.value()).into());
            }
        }

        let mut job_ids: BTreeSet<JobIdentifier> = BTreeSet::new();
        let mut jobs_by_system: BTreeMap<SystemIdentifier, BTreeSet<JobIdentifier>> =
            BTreeMap::new();
        for j in &self.jobs {
            if !job_ids.insert(j.id()) {
                return Err(DuplicateEntityError::new("job", *j.id().value()).into());
            }
            if !blocks.contains_key(&j.block()) {
                return Err(UnknownBlockError::new(j.id(), j.block()).into());
            }
            let Some(system) = systems.get(j.system()) else {
                return Err(UnknownSystemError::new(j.id(), j.system()).into());
            };
            if !system.allows_role(j.role()) {
                return Err(RoleOutsideSystemError::new(system.id(), j.id(), j.role()).into());
            }
            jobs_by_system.entry(j.system()).or_default().insert(j.id());
        }

        for system in systems.iter() {
            let empty = BTreeSet::new();
            let members = jobs_by_system.get(&system.id()).unwrap_or(&empty);
            for link in system.links() {
                for end in [link.predecessor(), link.successor()] {
                    if !members.contains(&end) {
                        return Err(UnknownJobError::new(system.id(), end).into());
                    }
                }
            }
            check_acyclic(system, members)?;
        }

        let mut machines = BTreeMap::new();
        for m in self.machines {
            if machines.insert(m.id(), m.clone()).is_some() {
                return Err(DuplicateEntityError::new("machine", *m.id().value()).into());
            }
        }
        let mut workers = BTreeMap::new();
        for w in self.workers {
            if workers.insert(w.id(), w.clone()).is_some() {
                return Err(DuplicateEntityError::new("worker", *w.id().value()).into());
            }
        }

        let mut machine_calendars = BTreeMap::new();
        for (id, cal) in self.machine_calendars {
            if !machines.contains_key(&id) {
                return Err(UnknownMachineError::new(id).into());
            }
            machine_calendars.insert(id, cal);
        }
        let mut worker_calendars = BTreeMap::new();
        for (id, cal) in self.worker_calendars {
            if !workers.contains_key(&id) {
                return Err(UnknownWorkerError::new(id).into());
            }
            worker_calendars.insert(id, cal);
        }

        Ok(Scenario::new(
            blocks,
            self.jobs,
            machines,
            workers,
            systems,
            global_calendar,
            machine_calendars,
            worker_calendars,
            self.mobilisation,
        ))
    }
}

/// Kahn's algorithm over the strict links of one system.
fn check_acyclic(
    system: &HarvestSystem,
    members: &BTreeSet<JobIdentifier>,
) -> Result<(), PrecedenceCycleError> {
    let mut indegree: BTreeMap<JobIdentifier, usize> =
        members.iter().map(|&j| (j, 0)).collect();
    let mut successors: BTreeMap<JobIdentifier, Vec<JobIdentifier>> = BTreeMap::new();
    for link in system.strict_links() {
        successors
            .entry(link.predecessor())
            .or_default()
            .push(link.successor());
        if let Some(d) = indegree.get_mut(&link.successor()) {
            *d += 1;
        }
    }

    let mut queue: VecDeque<JobIdentifier> = indegree
        .iter()
        .filter(|&(_, &d)| d == 0)
        .map(|(&j, _)| j)
        .collect();
    let mut visited = 0usize;
    while let Some(j) = queue.pop_front() {
        visited += 1;
        if let Some(succs) = successors.get(&j) {
            for &s in succs {
                if let Some(d) = indegree.get_mut(&s) {
                    *d -= 1;
                    if *d == 0 {
                        queue.push_back(s);
                    }
                }
            }
        }
    }
    if visited < members.len() {
        return Err(PrecedenceCycleError::new(system.id()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{MachineRole, SystemKind, TerrainKind, Time, TimeSpan, TimeWindow};
    use crate::scenario::calendar::ShiftWindow;
    use crate::scenario::system::PrecedenceLink;

    #[inline]
    fn bid(v: u32) -> BlockIdentifier {
        BlockIdentifier::new(v)
    }

    #[inline]
    fn jid(v: u32) -> JobIdentifier {
        JobIdentifier::new(v)
    }

    #[inline]
    fn sid(v: u32) -> SystemIdentifier {
        SystemIdentifier::new(v)
    }

    fn cal(a: i64, b: i64) -> ShiftCalendar {
        ShiftCalendar::new(
            [ShiftWindow::new(TimeWindow::new(Time::new(a), Time::new(b)))],
            [],
        )
        .unwrap()
    }

    fn job(id: u32, block: u32, system: u32, role: MachineRole) -> Job {
        Job::new(jid(id), bid(block), sid(system), TimeSpan::new(10), role).unwrap()
    }

    fn base() -> ScenarioBuilder {
        ScenarioBuilder::new()
            .with_global_calendar(cal(0, 1_000))
            .add_block(Block::new(bid(1), (0.0, 0.0), 12.0, 15.0, TerrainKind::Gentle))
            .add_system(
                HarvestSystem::new(sid(1), SystemKind::GroundBased)
                    .with_link(PrecedenceLink::strict(jid(1), jid(2))),
            )
            .add_job(job(1, 1, 1, MachineRole::Feller))
            .add_job(job(2, 1, 1, MachineRole::Skidder))
            .add_machine(Machine::new(MachineIdentifier::new(1), MachineRole::Feller))
            .add_machine(Machine::new(MachineIdentifier::new(2), MachineRole::Skidder))
            .add_worker(Worker::new(
                WorkerIdentifier::new(1),
                [MachineRole::Feller, MachineRole::Skidder],
            ))
    }

    #[test]
    fn test_valid_scenario_builds() {
        let scenario = base().build().unwrap();
        assert_eq!(scenario.job_count(), 2);
        assert_eq!(scenario.machine_count(), 2);
        assert!(scenario.system(sid(1)).is_some());
    }

    #[test]
    fn test_missing_global_calendar_rejected() {
        let res = ScenarioBuilder::new().build();
        assert!(matches!(res, Err(ScenarioError::Calendar(_))));
    }

    #[test]
    fn test_duplicate_job_rejected() {
        let res = base().add_job(job(1, 1, 1, MachineRole::Feller)).build();
        assert!(matches!(res, Err(ScenarioError::Duplicate(_))));
    }

    #[test]
    fn test_unknown_block_rejected() {
        let res = base().add_job(job(3, 99, 1, MachineRole::Feller)).build();
        assert!(matches!(res, Err(ScenarioError::UnknownBlock(_))));
    }

    #[test]
    fn test_unknown_system_rejected() {
        let res = base().add_job(job(3, 1, 9, MachineRole::Feller)).build();
        assert!(matches!(res, Err(ScenarioError::UnknownSystem(_))));
    }

    #[test]
    fn test_link_to_foreign_job_rejected() {
        let res = base()
            .add_system(
                HarvestSystem::new(sid(2), SystemKind::CableYarding)
                    .with_link(PrecedenceLink::strict(jid(1), jid(1))),
            )
            .build();
        assert!(matches!(res, Err(ScenarioError::UnknownJob(_))));
    }

    #[test]
    fn test_strict_cycle_rejected() {
        let res = ScenarioBuilder::new()
            .with_global_calendar(cal(0, 1_000))
            .add_block(Block::new(bid(1), (0.0, 0.0), 12.0, 15.0, TerrainKind::Gentle))
            .add_system(
                HarvestSystem::new(sid(1), SystemKind::GroundBased)
                    .with_link(PrecedenceLink::strict(jid(1), jid(2)))
                    .with_link(PrecedenceLink::strict(jid(2), jid(1))),
            )
            .add_job(job(1, 1, 1, MachineRole::Feller))
            .add_job(job(2, 1, 1, MachineRole::Skidder))
            .build();
        assert!(matches!(res, Err(ScenarioError::PrecedenceCycle(_))));
    }

    #[test]
    fn test_parallel_links_do_not_cycle() {
        let scenario = ScenarioBuilder::new()
            .with_global_calendar(cal(0, 1_000))
            .add_block(Block::new(bid(1), (0.0, 0.0), 12.0, 15.0, TerrainKind::Gentle))
            .add_system(
                HarvestSystem::new(sid(1), SystemKind::GroundBased)
                    .with_link(PrecedenceLink::parallel_ok(jid(1), jid(2)))
                    .with_link(PrecedenceLink::parallel_ok(jid(2), jid(1))),
            )
            .add_job(job(1, 1, 1, MachineRole::Feller))
            .add_job(job(2, 1, 1, MachineRole::Skidder))
            .build();
        assert!(scenario.is_ok());
    }

    #[test]
    fn test_role_outside_sequence_rejected() {
        let res = ScenarioBuilder::new()
            .with_global_calendar(cal(0, 1_000))
            .add_block(Block::new(bid(1), (0.0, 0.0), 12.0, 15.0, TerrainKind::Gentle))
            .add_system(
                HarvestSystem::new(sid(1), SystemKind::GroundBased)
                    .with_role_sequence([MachineRole::Feller]),
            )
            .add_job(job(1, 1, 1, MachineRole::Yarder))
            .build();
        assert!(matches!(res, Err(ScenarioError::RoleOutsideSystem(_))));
    }

    #[test]
    fn test_calendar_for_unknown_machine_rejected() {
        let res = base()
            .with_machine_calendar(MachineIdentifier::new(42), cal(0, 100))
            .build();
        assert!(matches!(res, Err(ScenarioError::UnknownMachine(_))));
    }

    #[test]
    fn test_calendar_for_unknown_worker_rejected() {
        let res = base()
            .with_worker_calendar(WorkerIdentifier::new(42), cal(0, 100))
            .build();
        assert!(matches!(res, Err(ScenarioError::UnknownWorker(_))));
    }

    #[test]
    fn test_calendar_fallback() {
        let scenario = base()
            .with_machine_calendar(MachineIdentifier::new(1), cal(0, 50))
            .build()
            .unwrap();
        let dedicated = scenario.machine_calendar(MachineIdentifier::new(1));
        assert_eq!(dedicated.total_open(), TimeSpan::new(50));
        let fallback = scenario.machine_calendar(MachineIdentifier::new(2));
        assert_eq!(fallback.total_open(), TimeSpan::new(1_000));
    }
}
