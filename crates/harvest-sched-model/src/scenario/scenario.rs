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
    BlockIdentifier, JobIdentifier, MachineIdentifier, MachineRole, SystemIdentifier,
    WorkerIdentifier,
};
use crate::scenario::block::Block;
use crate::scenario::calendar::ShiftCalendar;
use crate::scenario::job::Job;
use crate::scenario::mobilisation::{Mobilisation, MobilisationTable};
use crate::scenario::resource::{Machine, Worker};
use crate::scenario::system::{HarvestSystem, SystemRegistry};
use std::collections::BTreeMap;

/// A validated, immutable planning instance. Built through
/// [`ScenarioBuilder`](crate::scenario::ScenarioBuilder), which guarantees
/// that every cross reference resolves and strict precedence is acyclic.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    blocks: BTreeMap<BlockIdentifier, Block>,
    jobs: Vec<Job>,
    machines: BTreeMap<MachineIdentifier, Machine>,
    workers: BTreeMap<WorkerIdentifier, Worker>,
    systems: SystemRegistry,
    global_calendar: ShiftCalendar,
    machine_calendars: BTreeMap<MachineIdentifier, ShiftCalendar>,
    worker_calendars: BTreeMap<WorkerIdentifier, ShiftCalendar>,
    mobilisation: MobilisationTable,
}

impl Scenario {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        blocks: BTreeMap<BlockIdentifier, Block>,
        jobs: Vec<Job>,
        machines: BTreeMap<MachineIdentifier, Machine>,
        workers: BTreeMap<WorkerIdentifier, Worker>,
        systems: SystemRegistry,
        global_calendar: ShiftCalendar,
        machine_calendars: BTreeMap<MachineIdentifier, ShiftCalendar>,
        worker_calendars: BTreeMap<WorkerIdentifier, ShiftCalendar>,
        mobilisation: MobilisationTable,
    ) -> Self {
        Self {
            blocks,
            jobs,
            machines,
            workers,
            systems,
            global_calendar,
            machine_calendars,
            worker_calendars,
            mobilisation,
        }
    }

    /// Jobs in insertion order. The order is stable and serves as the dense
    /// index space for solvers.
    #[inline]
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    #[inline]
    pub fn job(&self, id: JobIdentifier) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id() == id)
    }

    #[inline]
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.values()
    }

    #[inline]
    pub fn block(&self, id: BlockIdentifier) -> Option<&Block> {
        self.blocks.get(&id)
    }

    #[inline]
    pub fn machines(&self) -> impl Iterator<Item = &Machine> {
        self.machines.values()
    }

    #[inline]
    pub fn machine(&self, id: MachineIdentifier) -> Option<&Machine> {
        self.machines.get(&id)
    }

    #[inline]
    pub fn workers(&self) -> impl Iterator<Item = &Worker> {
        self.workers.values()
    }

    #[inline]
    pub fn worker(&self, id: WorkerIdentifier) -> Option<&Worker> {
        self.workers.get(&id)
    }

    #[inline]
    pub fn systems(&self) -> &SystemRegistry {
        &self.systems
    }

    #[inline]
    pub fn system(&self, id: SystemIdentifier) -> Option<&HarvestSystem> {
        self.systems.get(id)
    }

    #[inline]
    pub fn global_calendar(&self) -> &ShiftCalendar {
        &self.global_calendar
    }

    /// Machine working calendar, falling back to the global one.
    #[inline]
    pub fn machine_calendar(&self, id: MachineIdentifier) -> &ShiftCalendar {
        self.machine_calendars.get(&id).unwrap_or(&self.global_calendar)
    }

    /// Worker working calendar, falling back to the global one.
    #[inline]
    pub fn worker_calendar(&self, id: WorkerIdentifier) -> &ShiftCalendar {
        self.worker_calendars.get(&id).unwrap_or(&self.global_calendar)
    }

    #[inline]
    pub fn mobilisation_table(&self) -> &MobilisationTable {
        &self.mobilisation
    }

    /// Role-scaled mobilisation between two blocks. Returns `None` only if a
    /// block id does not belong to this scenario.
    pub fn mobilisation(
        &self,
        role: MachineRole,
        from: BlockIdentifier,
        to: BlockIdentifier,
    ) -> Option<Mobilisation> {
        let from = self.blocks.get(&from)?;
        let to = self.blocks.get(&to)?;
        Some(self.mobilisation.lookup(role, from, to))
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
}
