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

use crate::common::{BlockIdentifier, MachineIdentifier, MachineRole, WorkerIdentifier};
use std::collections::BTreeSet;

/// A machine fills exactly one role and serves at most one job at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Machine {
    id: MachineIdentifier,
    role: MachineRole,
    home_block: Option<BlockIdentifier>,
}

impl Machine {
    #[inline]
    pub fn new(id: MachineIdentifier, role: MachineRole) -> Self {
        Self {
            id,
            role,
            home_block: None,
        }
    }

    #[inline]
    pub fn with_home_block(mut self, block: BlockIdentifier) -> Self {
        self.home_block = Some(block);
        self
    }

    #[inline]
    pub fn id(&self) -> MachineIdentifier {
        self.id
    }

    #[inline]
    pub fn role(&self) -> MachineRole {
        self.role
    }

    #[inline]
    pub fn home_block(&self) -> Option<BlockIdentifier> {
        self.home_block
    }

    #[inline]
    pub fn can_perform(&self, role: MachineRole) -> bool {
        self.role == role
    }
}

/// A worker holds a set of role certifications and serves at most one job
/// at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worker {
    id: WorkerIdentifier,
    certifications: BTreeSet<MachineRole>,
}

impl Worker {
    #[inline]
    pub fn new<I>(id: WorkerIdentifier, certifications: I) -> Self
    where
        I: IntoIterator<Item = MachineRole>,
    {
        Self {
            id,
            certifications: certifications.into_iter().collect(),
        }
    }

    #[inline]
    pub fn id(&self) -> WorkerIdentifier {
        self.id
    }

    #[inline]
    pub fn certifications(&self) -> &BTreeSet<MachineRole> {
        &self.certifications
    }

    #[inline]
    pub fn can_operate(&self, role: MachineRole) -> bool {
        self.certifications.contains(&role)
    }

    /// Certifications packed as a bitmask, one bit per [`MachineRole`].
    #[inline]
    pub fn certification_mask(&self) -> u16 {
        self.certifications.iter().fold(0u16, |m, r| m | r.bit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_machine_role_check() {
        let m = Machine::new(MachineIdentifier::new(1), MachineRole::Skidder)
            .with_home_block(BlockIdentifier::new(3));
        assert!(m.can_perform(MachineRole::Skidder));
        assert!(!m.can_perform(MachineRole::Yarder));
        assert_eq!(m.home_block(), Some(BlockIdentifier::new(3)));
    }

    #[test]
    fn test_worker_certifications() {
        let w = Worker::new(
            WorkerIdentifier::new(1),
            [MachineRole::Feller, MachineRole::Skidder],
        );
        assert!(w.can_operate(MachineRole::Feller));
        assert!(!w.can_operate(MachineRole::Yarder));
        let mask = w.certification_mask();
        assert_ne!(mask & MachineRole::Feller.bit(), 0);
        assert_eq!(mask & MachineRole::Yarder.bit(), 0);
    }
}
