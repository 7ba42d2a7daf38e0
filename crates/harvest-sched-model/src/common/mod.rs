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

use harvest_sched_core::prelude::{TimeDelta, TimeInterval, TimePoint};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Scheduling time is measured in integral ticks (minutes).
pub type Time = TimePoint<i64>;
pub type TimeSpan = TimeDelta<i64>;
pub type TimeWindow = TimeInterval<i64>;

pub trait IdentifierMarkerName: Copy {
    const NAME: &'static str;
}

/// A phantom-marked identifier newtype, one marker per entity family.
#[repr(transparent)]
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier<I, U>(I, core::marker::PhantomData<U>);

impl<I, U> Identifier<I, U> {
    #[inline]
    pub const fn new(id: I) -> Self {
        Self(id, core::marker::PhantomData)
    }

    #[inline]
    pub fn value(&self) -> &I {
        &self.0
    }

    #[inline]
    pub fn into_inner(self) -> I {
        self.0
    }
}

impl<I, U> std::fmt::Display for Identifier<I, U>
where
    I: std::fmt::Display,
    U: IdentifierMarkerName,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", U::NAME, self.0)
    }
}

// Identifiers serialize transparently as their inner value so reports stay
// readable for offline tooling.
impl<I: Serialize, U> Serialize for Identifier<I, U> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de, I: Deserialize<'de>, U> Deserialize<'de> for Identifier<I, U> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        I::deserialize(deserializer).map(Identifier::new)
    }
}

macro_rules! identifier_marker {
    ($marker:ident, $alias:ident, $name:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $marker;

        impl IdentifierMarkerName for $marker {
            const NAME: &'static str = $name;
        }

        pub type $alias = Identifier<u32, $marker>;
    };
}

identifier_marker!(BlockMarker, BlockIdentifier, "Block");
identifier_marker!(JobMarker, JobIdentifier, "Job");
identifier_marker!(MachineMarker, MachineIdentifier, "Machine");
identifier_marker!(WorkerMarker, WorkerIdentifier, "Worker");
identifier_marker!(SystemMarker, SystemIdentifier, "System");

/// Machine roles a job can require. Worker capability is modeled as
/// certification for the same roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MachineRole {
    Feller,
    Harvester,
    Skidder,
    Forwarder,
    Yarder,
    Processor,
    Loader,
    Helicopter,
}

impl MachineRole {
    pub const ALL: [MachineRole; 8] = [
        MachineRole::Feller,
        MachineRole::Harvester,
        MachineRole::Skidder,
        MachineRole::Forwarder,
        MachineRole::Yarder,
        MachineRole::Processor,
        MachineRole::Loader,
        MachineRole::Helicopter,
    ];

    /// Stable small index, usable as a bitmask position.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn bit(self) -> u16 {
        1 << self.index()
    }
}

impl std::fmt::Display for MachineRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MachineRole::Feller => "Feller",
            MachineRole::Harvester => "Harvester",
            MachineRole::Skidder => "Skidder",
            MachineRole::Forwarder => "Forwarder",
            MachineRole::Yarder => "Yarder",
            MachineRole::Processor => "Processor",
            MachineRole::Loader => "Loader",
            MachineRole::Helicopter => "Helicopter",
        };
        write!(f, "{name}")
    }
}

/// Harvest system families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SystemKind {
    GroundBased,
    CableYarding,
    Helicopter,
}

impl std::fmt::Display for SystemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SystemKind::GroundBased => "GroundBased",
            SystemKind::CableYarding => "CableYarding",
            SystemKind::Helicopter => "Helicopter",
        };
        write!(f, "{name}")
    }
}

/// Coarse terrain classification of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainKind {
    Gentle,
    Moderate,
    Steep,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_display_and_value() {
        let id = JobIdentifier::new(7);
        assert_eq!(format!("{id}"), "Job(7)");
        assert_eq!(*id.value(), 7);
        assert_eq!(id.into_inner(), 7);
    }

    #[test]
    fn test_identifier_ordering() {
        assert!(BlockIdentifier::new(1) < BlockIdentifier::new(2));
        assert_eq!(MachineIdentifier::new(3), MachineIdentifier::new(3));
    }

    #[test]
    fn test_identifier_serde_is_transparent() {
        let id = WorkerIdentifier::new(42);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "42");
        let back: WorkerIdentifier = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_role_bits_are_distinct() {
        let mut mask = 0u16;
        for role in MachineRole::ALL {
            assert_eq!(mask & role.bit(), 0);
            mask |= role.bit();
        }
        assert_eq!(mask.count_ones() as usize, MachineRole::ALL.len());
    }
}
