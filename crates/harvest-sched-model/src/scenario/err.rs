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
use crate::scenario::calendar::CalendarError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidDurationError {
    job: JobIdentifier,
}

impl InvalidDurationError {
    pub fn new(job: JobIdentifier) -> Self {
        Self { job }
    }

    pub fn job(&self) -> JobIdentifier {
        self.job
    }
}

impl std::fmt::Display for InvalidDurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} has a non-positive processing duration", self.job)
    }
}

impl std::error::Error for InvalidDurationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBlockError {
    job: JobIdentifier,
    block: BlockIdentifier,
}

impl UnknownBlockError {
    pub fn new(job: JobIdentifier, block: BlockIdentifier) -> Self {
        Self { job, block }
    }

    pub fn job(&self) -> JobIdentifier {
        self.job
    }

    pub fn block(&self) -> BlockIdentifier {
        self.block
    }
}

impl std::fmt::Display for UnknownBlockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} references unknown {}", self.job, self.block)
    }
}

impl std::error::Error for UnknownBlockError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSystemError {
    job: JobIdentifier,
    system: SystemIdentifier,
}

impl UnknownSystemError {
    pub fn new(job: JobIdentifier, system: SystemIdentifier) -> Self {
        Self { job, system }
    }

    pub fn job(&self) -> JobIdentifier {
        self.job
    }

    pub fn system(&self) -> SystemIdentifier {
        self.system
    }
}

impl std::fmt::Display for UnknownSystemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} references unknown {}", self.job, self.system)
    }
}

impl std::error::Error for UnknownSystemError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownJobError {
    system: SystemIdentifier,
    job: JobIdentifier,
}

impl UnknownJobError {
    pub fn new(system: SystemIdentifier, job: JobIdentifier) -> Self {
        Self { system, job }
    }

    pub fn system(&self) -> SystemIdentifier {
        self.system
    }

    pub fn job(&self) -> JobIdentifier {
        self.job
    }
}

impl std::fmt::Display for UnknownJobError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "precedence link in {} references unknown or foreign {}",
            self.system, self.job
        )
    }
}

impl std::error::Error for UnknownJobError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecedenceCycleError {
    system: SystemIdentifier,
}

impl PrecedenceCycleError {
    pub fn new(system: SystemIdentifier) -> Self {
        Self { system }
    }

    pub fn system(&self) -> SystemIdentifier {
        self.system
    }
}

impl std::fmt::Display for PrecedenceCycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "strict precedence links of {} form a cycle", self.system)
    }
}

impl std::error::Error for PrecedenceCycleError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateEntityError {
    entity: &'static str,
    id: u32,
}

impl DuplicateEntityError {
    pub fn new(entity: &'static str, id: u32) -> Self {
        Self { entity, id }
    }

    pub fn entity(&self) -> &'static str {
        self.entity
    }

    pub fn id(&self) -> u32 {
        self.id
    }
}

impl std::fmt::Display for DuplicateEntityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "duplicate {} identifier {}", self.entity, self.id)
    }
}

impl std::error::Error for DuplicateEntityError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMachineError {
    machine: MachineIdentifier,
}

impl UnknownMachineError {
    pub fn new(machine: MachineIdentifier) -> Self {
        Self { machine }
    }

    pub fn machine(&self) -> MachineIdentifier {
        self.machine
    }
}

impl std::fmt::Display for UnknownMachineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "calendar attached to unknown {}", self.machine)
    }
}

impl std::error::Error for UnknownMachineError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownWorkerError {
    worker: WorkerIdentifier,
}

impl UnknownWorkerError {
    pub fn new(worker: WorkerIdentifier) -> Self {
        Self { worker }
    }

    pub fn worker(&self) -> WorkerIdentifier {
        self.worker
    }
}

impl std::fmt::Display for UnknownWorkerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "calendar attached to unknown {}", self.worker)
    }
}

impl std::error::Error for UnknownWorkerError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleOutsideSystemError {
    system: SystemIdentifier,
    job: JobIdentifier,
    role: MachineRole,
}

impl RoleOutsideSystemError {
    pub fn new(system: SystemIdentifier, job: JobIdentifier, role: MachineRole) -> Self {
        Self { system, job, role }
    }

    pub fn system(&self) -> SystemIdentifier {
        self.system
    }

    pub fn job(&self) -> JobIdentifier {
        self.job
    }

    pub fn role(&self) -> MachineRole {
        self.role
    }
}

impl std::fmt::Display for RoleOutsideSystemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} requires role {} which is not part of the role sequence of {}",
            self.job, self.role, self.system
        )
    }
}

impl std::error::Error for RoleOutsideSystemError {}

/// Umbrella error for scenario construction and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioError {
    InvalidDuration(InvalidDurationError),
    UnknownBlock(UnknownBlockError),
    UnknownSystem(UnknownSystemError),
    UnknownJob(UnknownJobError),
    PrecedenceCycle(PrecedenceCycleError),
    Duplicate(DuplicateEntityError),
    Calendar(CalendarError),
    UnknownMachine(UnknownMachineError),
    UnknownWorker(UnknownWorkerError),
    RoleOutsideSystem(RoleOutsideSystemError),
}

impl std::fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScenarioError::InvalidDuration(e) => write!(f, "{e}"),
            ScenarioError::UnknownBlock(e) => write!(f, "{e}"),
            ScenarioError::UnknownSystem(e) => write!(f, "{e}"),
            ScenarioError::UnknownJob(e) => write!(f, "{e}"),
            ScenarioError::PrecedenceCycle(e) => write!(f, "{e}"),
            ScenarioError::Duplicate(e) => write!(f, "{e}"),
            ScenarioError::Calendar(e) => write!(f, "{e}"),
            ScenarioError::UnknownMachine(e) => write!(f, "{e}"),
            ScenarioError::UnknownWorker(e) => write!(f, "{e}"),
            ScenarioError::RoleOutsideSystem(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ScenarioError {}

macro_rules! from_variant {
    ($err:ty, $variant:ident) => {
        impl From<$err> for ScenarioError {
            #[inline]
            fn from(err: $err) -> Self {
                ScenarioError::$variant(err)
            }
        }
    };
}

from_variant!(InvalidDurationError, InvalidDuration);
from_variant!(UnknownBlockError, UnknownBlock);
from_variant!(UnknownSystemError, UnknownSystem);
from_variant!(UnknownJobError, UnknownJob);
from_variant!(PrecedenceCycleError, PrecedenceCycle);
from_variant!(DuplicateEntityError, Duplicate);
from_variant!(CalendarError, Calendar);
from_variant!(UnknownMachineError, UnknownMachine);
from_variant!(UnknownWorkerError, UnknownWorker);
from_variant!(RoleOutsideSystemError, RoleOutsideSystem);
