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

use crate::common::{BlockIdentifier, JobIdentifier, MachineRole, SystemIdentifier, TimeSpan};
use crate::scenario::err::InvalidDurationError;

/// An atomic unit of work on a block, owned by exactly one harvest system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    id: JobIdentifier,
    block: BlockIdentifier,
    system: SystemIdentifier,
    duration: TimeSpan,
    role: MachineRole,
}

impl Job {
    /// Creates a job. The processing duration must be strictly positive.
    #[inline]
    pub fn new(
        id: JobIdentifier,
        block: BlockIdentifier,
        system: SystemIdentifier,
        duration: TimeSpan,
        role: MachineRole,
    ) -> Result<Self, InvalidDurationError> {
        if duration.value() <= 0 {
            return Err(InvalidDurationError::new(id));
        }
        Ok(Self {
            id,
            block,
            system,
            duration,
            role,
        })
    }

    #[inline]
    pub fn id(&self) -> JobIdentifier {
        self.id
    }

    #[inline]
    pub fn block(&self) -> BlockIdentifier {
        self.block
    }

    #[inline]
    pub fn system(&self) -> SystemIdentifier {
        self.system
    }

    #[inline]
    pub fn duration(&self) -> TimeSpan {
        self.duration
    }

    #[inline]
    pub fn role(&self) -> MachineRole {
        self.role
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[inline]
    fn td(v: i64) -> TimeSpan {
        TimeSpan::new(v)
    }

    #[test]
    fn test_positive_duration_required() {
        let mk = |d: i64| {
            Job::new(
                JobIdentifier::new(1),
                BlockIdentifier::new(1),
                SystemIdentifier::new(1),
                td(d),
                MachineRole::Feller,
            )
        };
        assert!(mk(0).is_err());
        assert!(mk(-5).is_err());
        let job = mk(30).unwrap();
        assert_eq!(job.duration(), td(30));
        assert_eq!(job.role(), MachineRole::Feller);
    }
}
