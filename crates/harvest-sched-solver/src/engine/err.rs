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

use crate::model::InfeasibleScenarioError;

/// The strategy never produced a single candidate batch; the neighborhood
/// is empty for this scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineStalledError {
    iterations: u64,
}

impl EngineStalledError {
    pub fn new(iterations: u64) -> Self {
        Self { iterations }
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }
}

impl std::fmt::Display for EngineStalledError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "no candidate batch was ever proposed after {} iterations",
            self.iterations
        )
    }
}

impl std::error::Error for EngineStalledError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    Infeasible(InfeasibleScenarioError),
    Stalled(EngineStalledError),
}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverError::Infeasible(e) => write!(f, "{e}"),
            SolverError::Stalled(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SolverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SolverError::Infeasible(e) => Some(e),
            SolverError::Stalled(e) => Some(e),
        }
    }
}

impl From<InfeasibleScenarioError> for SolverError {
    fn from(value: InfeasibleScenarioError) -> Self {
        SolverError::Infeasible(value)
    }
}

impl From<EngineStalledError> for SolverError {
    fn from(value: EngineStalledError) -> Self {
        SolverError::Stalled(value)
    }
}
