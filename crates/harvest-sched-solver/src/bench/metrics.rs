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

use harvest_sched_model::prelude::TracePoint;
use serde::Serialize;

/// Outcome of one trial in a benchmark suite. Failed trials keep their row
/// so a suite run never hides an infeasible or stalled scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsRow {
    scenario: String,
    strategy: String,
    seed: u64,
    status: TrialStatus,
    total_cost: Option<f64>,
    iterations: u64,
    wall_ms: u64,
    violations: u64,
    checkpoints: Vec<TracePoint>,
    termination: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrialStatus {
    Solved,
    Infeasible,
    Stalled,
}

impl MetricsRow {
    #[allow(clippy::too_many_arguments)]
    pub fn solved(
        scenario: String,
        strategy: String,
        seed: u64,
        total_cost: f64,
        iterations: u64,
        wall_ms: u64,
        violations: u64,
        checkpoints: Vec<TracePoint>,
        termination: String,
    ) -> Self {
        Self {
            scenario,
            strategy,
            seed,
            status: TrialStatus::Solved,
            total_cost: Some(total_cost),
            iterations,
            wall_ms,
            violations,
            checkpoints,
            termination: Some(termination),
        }
    }

    pub fn failed(
        scenario: String,
        strategy: String,
        seed: u64,
        status: TrialStatus,
        wall_ms: u64,
    ) -> Self {
        Self {
            scenario,
            strategy,
            seed,
            status,
            total_cost: None,
            iterations: 0,
            wall_ms,
            violations: 0,
            checkpoints: Vec::new(),
            termination: None,
        }
    }

    #[inline]
    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    #[inline]
    pub fn strategy(&self) -> &str {
        &self.strategy
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    pub fn status(&self) -> TrialStatus {
        self.status
    }

    #[inline]
    pub fn total_cost(&self) -> Option<f64> {
        self.total_cost
    }

    #[inline]
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    #[inline]
    pub fn wall_ms(&self) -> u64 {
        self.wall_ms
    }

    #[inline]
    pub fn violations(&self) -> u64 {
        self.violations
    }

    #[inline]
    pub fn checkpoints(&self) -> &[TracePoint] {
        &self.checkpoints
    }

    #[inline]
    pub(crate) fn sort_key(&self) -> (&str, &str, u64) {
        (&self.scenario, &self.strategy, self.seed)
    }
}

/// Rows across a whole suite, sorted by (scenario, strategy, seed) so equal
/// suites serialize identically regardless of thread interleaving.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsTable {
    rows: Vec<MetricsRow>,
}

impl MetricsTable {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn from_rows(mut rows: Vec<MetricsRow>) -> Self {
        rows.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        Self { rows }
    }

    #[inline]
    pub fn rows(&self) -> &[MetricsRow] {
        &self.rows
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Share of trials that produced a report.
    pub fn solve_rate(&self) -> f64 {
        if self.rows.is_empty() {
            return 0.0;
        }
        let solved = self
            .rows
            .iter()
            .filter(|r| r.status() == TrialStatus::Solved)
            .count();
        solved as f64 / self.rows.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_sort_deterministically() {
        let table = MetricsTable::from_rows(vec![
            MetricsRow::solved("b".into(), "sa".into(), 2, 1.0, 10, 5, 0, Vec::new(), "x".into()),
            MetricsRow::solved("a".into(), "sa".into(), 1, 1.0, 10, 5, 0, Vec::new(), "x".into()),
            MetricsRow::solved("a".into(), "sa".into(), 0, 1.0, 10, 5, 0, Vec::new(), "x".into()),
        ]);
        let keys: Vec<(&str, u64)> = table
            .rows()
            .iter()
            .map(|r| (r.scenario(), r.seed()))
            .collect();
        assert_eq!(keys, vec![("a", 0), ("a", 1), ("b", 2)]);
    }

    #[test]
    fn test_solve_rate() {
        let table = MetricsTable::from_rows(vec![
            MetricsRow::solved("a".into(), "sa".into(), 0, 1.0, 10, 5, 0, Vec::new(), "x".into()),
            MetricsRow::failed("a".into(), "sa".into(), 1, TrialStatus::Infeasible, 5),
        ]);
        assert_eq!(table.solve_rate(), 0.5);
        assert_eq!(MetricsTable::new().solve_rate(), 0.0);
    }
}
