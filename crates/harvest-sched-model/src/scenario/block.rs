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

use crate::common::{BlockIdentifier, TerrainKind};

/// A harvestable land unit. The landing coordinates (km, in some planar
/// projection) feed the mobilisation distance fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    id: BlockIdentifier,
    landing: (f64, f64),
    area_ha: f64,
    mean_slope_pct: f64,
    terrain: TerrainKind,
}

impl Block {
    #[inline]
    pub fn new(
        id: BlockIdentifier,
        landing: (f64, f64),
        area_ha: f64,
        mean_slope_pct: f64,
        terrain: TerrainKind,
    ) -> Self {
        Self {
            id,
            landing,
            area_ha,
            mean_slope_pct,
            terrain,
        }
    }

    #[inline]
    pub fn id(&self) -> BlockIdentifier {
        self.id
    }

    #[inline]
    pub fn landing(&self) -> (f64, f64) {
        self.landing
    }

    #[inline]
    pub fn area_ha(&self) -> f64 {
        self.area_ha
    }

    #[inline]
    pub fn mean_slope_pct(&self) -> f64 {
        self.mean_slope_pct
    }

    #[inline]
    pub fn terrain(&self) -> TerrainKind {
        self.terrain
    }

    /// Planar landing-to-landing distance in km.
    #[inline]
    pub fn distance_to(&self, other: &Block) -> f64 {
        let dx = self.landing.0 - other.landing.0;
        let dy = self.landing.1 - other.landing.1;
        (dx * dx + dy * dy).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_is_symmetric() {
        let a = Block::new(BlockIdentifier::new(1), (0.0, 0.0), 12.0, 18.0, TerrainKind::Gentle);
        let b = Block::new(BlockIdentifier::new(2), (3.0, 4.0), 8.0, 45.0, TerrainKind::Steep);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-12);
        assert_eq!(a.distance_to(&b), b.distance_to(&a));
        assert_eq!(a.distance_to(&a), 0.0);
    }
}
