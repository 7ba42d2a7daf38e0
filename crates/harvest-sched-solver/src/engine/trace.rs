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

use harvest_sched_core::prelude::Cost;
use harvest_sched_model::prelude::TracePoint;

/// Samples the convergence curve every `interval` iterations. Points are
/// keyed on the iteration counter, never the wall clock, so traces from
/// equal seeds compare byte for byte.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceRecorder {
    interval: u64,
    points: Vec<TracePoint>,
}

impl TraceRecorder {
    pub fn new(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
            points: Vec::new(),
        }
    }

    /// Records when the iteration lands on the sampling grid.
    #[inline]
    pub fn record(&mut self, iteration: u64, best: Cost, current: Cost) {
        if iteration % self.interval == 0 {
            self.points.push(TracePoint::new(iteration, best, current));
        }
    }

    /// Records unconditionally, used for the final point of a run.
    #[inline]
    pub fn force(&mut self, iteration: u64, best: Cost, current: Cost) {
        self.points.push(TracePoint::new(iteration, best, current));
    }

    #[inline]
    pub fn points(&self) -> &[TracePoint] {
        &self.points
    }

    #[inline]
    pub fn into_points(self) -> Vec<TracePoint> {
        self.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sampling_grid() {
        let mut recorder = TraceRecorder::new(10);
        for i in 0..25 {
            recorder.record(i, 5.0, 6.0);
        }
        let iterations: Vec<u64> = recorder.points().iter().map(|p| p.iteration()).collect();
        assert_eq!(iterations, vec![0, 10, 20]);
    }

    #[test]
    fn test_force_ignores_grid() {
        let mut recorder = TraceRecorder::new(10);
        recorder.force(7, 5.0, 6.0);
        assert_eq!(recorder.points().len(), 1);
        assert_eq!(recorder.points()[0].iteration(), 7);
    }

    #[test]
    fn test_zero_interval_clamps() {
        let mut recorder = TraceRecorder::new(0);
        recorder.record(3, 1.0, 1.0);
        assert_eq!(recorder.points().len(), 1);
    }
}
