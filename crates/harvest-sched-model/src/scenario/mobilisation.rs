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

use crate::common::{BlockIdentifier, MachineRole, TimeSpan};
use crate::scenario::block::Block;
use harvest_sched_core::prelude::Cost;
use std::collections::BTreeMap;

/// Cost and travel time for relocating a machine between two blocks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mobilisation {
    cost: Cost,
    time: TimeSpan,
}

impl Mobilisation {
    #[inline]
    pub fn new(cost: Cost, time: TimeSpan) -> Self {
        Self { cost, time }
    }

    #[inline]
    pub fn zero() -> Self {
        Self {
            cost: 0.0,
            time: TimeSpan::zero(),
        }
    }

    #[inline]
    pub fn cost(&self) -> Cost {
        self.cost
    }

    #[inline]
    pub fn time(&self) -> TimeSpan {
        self.time
    }

    #[inline]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            cost: self.cost * factor,
            time: TimeSpan::new((self.time.value() as f64 * factor).ceil() as i64),
        }
    }
}

/// Pairwise mobilisation lookup with a distance-based fallback.
///
/// Explicit entries are directional. For pairs without an entry the cost is
/// `distance_km * cost_per_km` and the travel time is `distance_km / speed`
/// rounded up to whole ticks. Per-role factors scale the result, so heavy
/// gear (yarders, processors) moves slower and dearer than a skidder.
#[derive(Debug, Clone, PartialEq)]
pub struct MobilisationTable {
    entries: BTreeMap<(BlockIdentifier, BlockIdentifier), Mobilisation>,
    cost_per_km: Cost,
    speed_km_per_tick: f64,
    role_factors: BTreeMap<MachineRole, f64>,
}

impl MobilisationTable {
    #[inline]
    pub fn new(cost_per_km: Cost, speed_km_per_tick: f64) -> Self {
        debug_assert!(speed_km_per_tick > 0.0);
        Self {
            entries: BTreeMap::new(),
            cost_per_km,
            speed_km_per_tick,
            role_factors: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn with_entry(
        mut self,
        from: BlockIdentifier,
        to: BlockIdentifier,
        mobilisation: Mobilisation,
    ) -> Self {
        self.entries.insert((from, to), mobilisation);
        self
    }

    #[inline]
    pub fn with_role_factor(mut self, role: MachineRole, factor: f64) -> Self {
        self.role_factors.insert(role, factor);
        self
    }

    #[inline]
    pub fn cost_per_km(&self) -> Cost {
        self.cost_per_km
    }

    #[inline]
    pub fn role_factor(&self, role: MachineRole) -> f64 {
        self.role_factors.get(&role).copied().unwrap_or(1.0)
    }

    /// Mobilisation between two blocks before role scaling. Moving within a
    /// block is free.
    pub fn lookup_base(&self, from: &Block, to: &Block) -> Mobilisation {
        if from.id() == to.id() {
            return Mobilisation::zero();
        }
        if let Some(m) = self.entries.get(&(from.id(), to.id())) {
            return *m;
        }
        let dist = from.distance_to(to);
        let time = (dist / self.speed_km_per_tick).ceil() as i64;
        Mobilisation::new(dist * self.cost_per_km, TimeSpan::new(time))
    }

    /// Role-scaled mobilisation between two blocks.
    #[inline]
    pub fn lookup(&self, role: MachineRole, from: &Block, to: &Block) -> Mobilisation {
        self.lookup_base(from, to).scaled(self.role_factor(role))
    }
}

impl Default for MobilisationTable {
    /// Unit cost per km at one km per tick, no explicit entries.
    #[inline]
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::TerrainKind;

    fn block(id: u32, x: f64, y: f64) -> Block {
        Block::new(BlockIdentifier::new(id), (x, y), 10.0, 20.0, TerrainKind::Gentle)
    }

    #[test]
    fn test_same_block_is_free() {
        let table = MobilisationTable::default();
        let a = block(1, 0.0, 0.0);
        let m = table.lookup_base(&a, &a);
        assert_eq!(m.cost(), 0.0);
        assert_eq!(m.time(), TimeSpan::zero());
    }

    #[test]
    fn test_explicit_entry_wins_over_fallback() {
        let a = block(1, 0.0, 0.0);
        let b = block(2, 3.0, 4.0);
        let table = MobilisationTable::new(10.0, 2.0).with_entry(
            a.id(),
            b.id(),
            Mobilisation::new(7.5, TimeSpan::new(9)),
        );
        let m = table.lookup_base(&a, &b);
        assert_eq!(m.cost(), 7.5);
        assert_eq!(m.time(), TimeSpan::new(9));
        // The reverse direction has no entry and falls back to distance.
        let r = table.lookup_base(&b, &a);
        assert_eq!(r.cost(), 50.0);
        assert_eq!(r.time(), TimeSpan::new(3));
    }

    #[test]
    fn test_distance_fallback_rounds_time_up() {
        let a = block(1, 0.0, 0.0);
        let b = block(2, 3.0, 4.0);
        let table = MobilisationTable::new(2.0, 2.0);
        let m = table.lookup_base(&a, &b);
        assert_eq!(m.cost(), 10.0);
        // 5 km at 2 km/tick is 2.5 ticks, rounded up to 3.
        assert_eq!(m.time(), TimeSpan::new(3));
    }

    #[test]
    fn test_role_factor_scales_cost_and_time() {
        let a = block(1, 0.0, 0.0);
        let b = block(2, 3.0, 4.0);
        let table = MobilisationTable::new(2.0, 1.0).with_role_factor(MachineRole::Yarder, 2.0);
        assert_eq!(table.role_factor(MachineRole::Skidder), 1.0);
        let m = table.lookup(MachineRole::Yarder, &a, &b);
        assert_eq!(m.cost(), 20.0);
        assert_eq!(m.time(), TimeSpan::new(10));
    }
}
