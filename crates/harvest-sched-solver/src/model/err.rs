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

use harvest_sched_model::prelude::{JobIdentifier, MachineRole};

/// Which resource class a job cannot be served by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingResource {
    Machine,
    Worker,
}

impl std::fmt::Display for MissingResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingResource::Machine => write!(f, "machine"),
            MissingResource::Worker => write!(f, "worker"),
        }
    }
}

/// A job that can never be assigned: no machine of its role exists, or no
/// worker is certified for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingResourceError {
    job: JobIdentifier,
    role: MachineRole,
    missing: MissingResource,
}

impl MissingResourceError {
    pub fn new(job: JobIdentifier, role: MachineRole, missing: MissingResource) -> Self {
        Self { job, role, missing }
    }

    pub fn job(&self) -> JobIdentifier {
        self.job
    }

    pub fn role(&self) -> MachineRole {
        self.role
    }

    pub fn missing(&self) -> MissingResource {
        self.missing
    }
}

impl std::fmt::Display for MissingResourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} requires role {} but no compatible {} exists",
            self.job, self.role, self.missing
        )
    }
}

impl std::error::Error for MissingResourceError {}

/// A role whose total processing demand exceeds the shift time its
/// machines (or certified workers) can ever provide, so some overlap is
/// unavoidable no matter how jobs are placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleOvercommittedError {
    role: MachineRole,
    resource: MissingResource,
    demand: i64,
    available: i64,
}

impl RoleOvercommittedError {
    pub fn new(role: MachineRole, resource: MissingResource, demand: i64, available: i64) -> Self {
        Self {
            role,
            resource,
            demand,
            available,
        }
    }

    pub fn role(&self) -> MachineRole {
        self.role
    }

    pub fn resource(&self) -> MissingResource {
        self.resource
    }

    pub fn demand(&self) -> i64 {
        self.demand
    }

    pub fn available(&self) -> i64 {
        self.available
    }
}

impl std::fmt::Display for RoleOvercommittedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "role {} needs {} ticks but its {}s have only {} ticks of shift time",
            self.role, self.demand, self.resource, self.available
        )
    }
}

impl std::error::Error for RoleOvercommittedError {}

/// Raised before search starts when no assignment can be feasible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InfeasibleScenarioError {
    MissingResource(MissingResourceError),
    RoleOvercommitted(RoleOvercommittedError),
}

impl std::fmt::Display for InfeasibleScenarioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InfeasibleScenarioError::MissingResource(e) => write!(f, "{e}"),
            InfeasibleScenarioError::RoleOvercommitted(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for InfeasibleScenarioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InfeasibleScenarioError::MissingResource(e) => Some(e),
            InfeasibleScenarioError::RoleOvercommitted(e) => Some(e),
        }
    }
}

impl From<MissingResourceError> for InfeasibleScenarioError {
    fn from(value: MissingResourceError) -> Self {
        InfeasibleScenarioError::MissingResource(value)
    }
}

impl From<RoleOvercommittedError> for InfeasibleScenarioError {
    fn from(value: RoleOvercommittedError) -> Self {
        InfeasibleScenarioError::RoleOvercommitted(value)
    }
}
