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

use crate::common::{JobIdentifier, MachineRole, SystemIdentifier, SystemKind};
use std::collections::BTreeMap;

/// Strict links order the successor after the predecessor finishes.
/// ParallelOk links document a workflow edge that may legally overlap, for
/// example a forwarder trailing a harvester on the same block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Strict,
    ParallelOk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrecedenceLink {
    predecessor: JobIdentifier,
    successor: JobIdentifier,
    kind: LinkKind,
}

impl PrecedenceLink {
    #[inline]
    pub fn strict(predecessor: JobIdentifier, successor: JobIdentifier) -> Self {
        Self {
            predecessor,
            successor,
            kind: LinkKind::Strict,
        }
    }

    #[inline]
    pub fn parallel_ok(predecessor: JobIdentifier, successor: JobIdentifier) -> Self {
        Self {
            predecessor,
            successor,
            kind: LinkKind::ParallelOk,
        }
    }

    #[inline]
    pub fn predecessor(&self) -> JobIdentifier {
        self.predecessor
    }

    #[inline]
    pub fn successor(&self) -> JobIdentifier {
        self.successor
    }

    #[inline]
    pub fn kind(&self) -> LinkKind {
        self.kind
    }

    #[inline]
    pub fn is_strict(&self) -> bool {
        self.kind == LinkKind::Strict
    }
}

/// A harvest system: the equipment chain working one or more blocks, with
/// the workflow ordering between its jobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestSystem {
    id: SystemIdentifier,
    kind: SystemKind,
    role_sequence: Vec<MachineRole>,
    links: Vec<PrecedenceLink>,
}

impl HarvestSystem {
    #[inline]
    pub fn new(id: SystemIdentifier, kind: SystemKind) -> Self {
        Self {
            id,
            kind,
            role_sequence: Vec::new(),
            links: Vec::new(),
        }
    }

    /// Declares the roles this system fields, in workflow order. An empty
    /// sequence places no restriction on job roles.
    #[inline]
    pub fn with_role_sequence<I>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = MachineRole>,
    {
        self.role_sequence = roles.into_iter().collect();
        self
    }

    #[inline]
    pub fn with_link(mut self, link: PrecedenceLink) -> Self {
        self.links.push(link);
        self
    }

    #[inline]
    pub fn id(&self) -> SystemIdentifier {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> SystemKind {
        self.kind
    }

    #[inline]
    pub fn role_sequence(&self) -> &[MachineRole] {
        &self.role_sequence
    }

    #[inline]
    pub fn links(&self) -> &[PrecedenceLink] {
        &self.links
    }

    #[inline]
    pub fn strict_links(&self) -> impl Iterator<Item = &PrecedenceLink> {
        self.links.iter().filter(|l| l.is_strict())
    }

    #[inline]
    pub fn allows_role(&self, role: MachineRole) -> bool {
        self.role_sequence.is_empty() || self.role_sequence.contains(&role)
    }
}

/// Systems keyed by identifier, in identifier order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemRegistry {
    systems: BTreeMap<SystemIdentifier, HarvestSystem>,
}

impl SystemRegistry {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a system, returning the previous one under the same id.
    #[inline]
    pub fn insert(&mut self, system: HarvestSystem) -> Option<HarvestSystem> {
        self.systems.insert(system.id(), system)
    }

    #[inline]
    pub fn get(&self, id: SystemIdentifier) -> Option<&HarvestSystem> {
        self.systems.get(&id)
    }

    #[inline]
    pub fn contains(&self, id: SystemIdentifier) -> bool {
        self.systems.contains_key(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &HarvestSystem> {
        self.systems.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[inline]
    fn jid(v: u32) -> JobIdentifier {
        JobIdentifier::new(v)
    }

    #[test]
    fn test_strict_links_filters_parallel_edges() {
        let sys = HarvestSystem::new(SystemIdentifier::new(1), SystemKind::GroundBased)
            .with_link(PrecedenceLink::strict(jid(1), jid(2)))
            .with_link(PrecedenceLink::parallel_ok(jid(2), jid(3)))
            .with_link(PrecedenceLink::strict(jid(2), jid(4)));
        let strict: Vec<_> = sys.strict_links().map(|l| l.successor()).collect();
        assert_eq!(strict, vec![jid(2), jid(4)]);
        assert_eq!(sys.links().len(), 3);
    }

    #[test]
    fn test_role_sequence_gates_roles() {
        let open = HarvestSystem::new(SystemIdentifier::new(1), SystemKind::CableYarding);
        assert!(open.allows_role(MachineRole::Loader));

        let gated = HarvestSystem::new(SystemIdentifier::new(2), SystemKind::GroundBased)
            .with_role_sequence([MachineRole::Feller, MachineRole::Skidder]);
        assert!(gated.allows_role(MachineRole::Skidder));
        assert!(!gated.allows_role(MachineRole::Yarder));
    }

    #[test]
    fn test_registry_ordered_iteration() {
        let mut reg = SystemRegistry::new();
        reg.insert(HarvestSystem::new(SystemIdentifier::new(3), SystemKind::Helicopter));
        reg.insert(HarvestSystem::new(SystemIdentifier::new(1), SystemKind::GroundBased));
        let ids: Vec<_> = reg.iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec![SystemIdentifier::new(1), SystemIdentifier::new(3)]);
        assert!(reg.contains(SystemIdentifier::new(3)));
        assert_eq!(reg.len(), 2);
    }
}
