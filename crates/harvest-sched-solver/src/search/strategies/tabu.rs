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

use crate::model::{JobIndex, SolverModel};
use crate::search::registry::OperatorRegistry;
use crate::search::strategy::{IterationOutcome, SearchStrategy};
use crate::state::fitness::Fitness;
use crate::state::mv::MoveBatch;
use crate::state::schedule::ScheduleState;
use smallvec::SmallVec;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabuConfig {
    tenure: u64,
    proposal_attempts: usize,
    patience: u64,
}

impl TabuConfig {
    #[inline]
    pub fn with_tenure(mut self, tenure: u64) -> Self {
        self.tenure = tenure;
        self
    }

    #[inline]
    pub fn with_proposal_attempts(mut self, attempts: usize) -> Self {
        self.proposal_attempts = attempts;
        self
    }

    #[inline]
    pub fn with_patience(mut self, patience: u64) -> Self {
        self.patience = patience;
        self
    }

    #[inline]
    pub fn tenure(&self) -> u64 {
        self.tenure
    }

    #[inline]
    pub fn patience(&self) -> u64 {
        self.patience
    }
}

impl Default for TabuConfig {
    fn default() -> Self {
        Self {
            tenure: 20,
            proposal_attempts: 8,
            patience: 50,
        }
    }
}

impl std::fmt::Display for TabuConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "tenure={}, attempts={}, patience={}",
            self.tenure, self.proposal_attempts, self.patience
        )
    }
}

/// Tabu search keyed on job indices: jobs moved by an accepted batch are
/// frozen for `tenure` iterations. A tabu candidate still passes when it
/// beats the incumbent (aspiration), and after `patience` non-improving
/// iterations worsening candidates pass to force the search off a plateau.
pub struct TabuSearch<R: rand::Rng> {
    config: TabuConfig,
    registry: OperatorRegistry<R>,
    expiry: BTreeMap<JobIndex, u64>,
    iteration: u64,
    non_improving: u64,
    pending: SmallVec<[JobIndex; 8]>,
    pending_tabu: bool,
}

impl<R: rand::Rng> TabuSearch<R> {
    pub fn new(config: TabuConfig, registry: OperatorRegistry<R>) -> Self {
        Self {
            config,
            registry,
            expiry: BTreeMap::new(),
            iteration: 0,
            non_improving: 0,
            pending: SmallVec::new(),
            pending_tabu: false,
        }
    }

    #[inline]
    fn is_tabu(&self, job: JobIndex) -> bool {
        self.expiry.get(&job).map(|&e| e > self.iteration).unwrap_or(false)
    }

    #[cfg(test)]
    fn force_tabu(&mut self, job: JobIndex, until: u64) {
        self.expiry.insert(job, until);
    }
}

impl<R: rand::Rng + Send> SearchStrategy<R> for TabuSearch<R> {
    fn name(&self) -> &'static str {
        "tabu-search"
    }

    fn propose(
        &mut self,
        model: &SolverModel<'_>,
        state: &ScheduleState,
        rng: &mut R,
    ) -> Option<MoveBatch> {
        let mut fallback: Option<MoveBatch> = None;
        for _ in 0..self.config.proposal_attempts {
            let Some((_, batch)) = self.registry.propose_uniform(model, state, rng) else {
                break;
            };
            let jobs = batch.touched_jobs();
            if jobs.iter().any(|&j| self.is_tabu(j)) {
                fallback = Some(batch);
                continue;
            }
            self.pending = jobs;
            self.pending_tabu = false;
            return Some(batch);
        }
        // Everything sampled was tabu; surface the last candidate and let
        // aspiration decide.
        let batch = fallback?;
        self.pending = batch.touched_jobs();
        self.pending_tabu = true;
        Some(batch)
    }

    fn accept(&mut self, current: Fitness, candidate: Fitness, best: Fitness, _rng: &mut R) -> bool {
        if candidate.is_better_than(&best) {
            return true;
        }
        if self.pending_tabu {
            return false;
        }
        if candidate.is_better_than(&current) {
            return true;
        }
        self.non_improving >= self.config.patience()
    }

    fn observe(&mut self, outcome: &IterationOutcome) {
        self.iteration += 1;
        if outcome.accepted {
            let until = self.iteration + self.config.tenure();
            for &j in &self.pending {
                self.expiry.insert(j, until);
            }
        }
        if outcome.new_best {
            self.non_improving = 0;
        } else {
            self.non_improving += 1;
        }
        if self.non_improving > 2 * self.config.patience() {
            // Long stall: drop the list so the search can revisit anything.
            self.expiry.clear();
            self.non_improving = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn strategy() -> TabuSearch<ChaCha8Rng> {
        TabuSearch::new(TabuConfig::default().with_tenure(5), OperatorRegistry::standard())
    }

    #[test]
    fn test_tenure_expires() {
        let mut tabu = strategy();
        tabu.force_tabu(JobIndex::new(3), 5);
        assert!(tabu.is_tabu(JobIndex::new(3)));
        let outcome = IterationOutcome {
            accepted: false,
            new_best: false,
            rejected_hard: false,
            delta: 0.0,
        };
        for _ in 0..5 {
            tabu.observe(&outcome);
        }
        assert!(!tabu.is_tabu(JobIndex::new(3)));
    }

    #[test]
    fn test_aspiration_overrides_tabu() {
        let mut tabu = strategy();
        tabu.pending_tabu = true;
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        // Beats the incumbent: accepted despite tabu.
        assert!(tabu.accept(Fitness::new(10.0), Fitness::new(4.0), Fitness::new(5.0), &mut rng));
        // Merely better than current: rejected while tabu.
        assert!(!tabu.accept(Fitness::new(10.0), Fitness::new(6.0), Fitness::new(5.0), &mut rng));
    }

    #[test]
    fn test_patience_allows_worsening() {
        let mut tabu = TabuSearch::<ChaCha8Rng>::new(
            TabuConfig::default().with_patience(3),
            OperatorRegistry::standard(),
        );
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(!tabu.accept(Fitness::new(10.0), Fitness::new(12.0), Fitness::new(5.0), &mut rng));
        let outcome = IterationOutcome {
            accepted: false,
            new_best: false,
            rejected_hard: false,
            delta: 2.0,
        };
        for _ in 0..3 {
            tabu.observe(&outcome);
        }
        assert!(tabu.accept(Fitness::new(10.0), Fitness::new(12.0), Fitness::new(5.0), &mut rng));
    }

    #[test]
    fn test_accepted_batch_becomes_tabu() {
        let mut tabu = strategy();
        tabu.pending = SmallVec::from_slice(&[JobIndex::new(1), JobIndex::new(2)]);
        tabu.observe(&IterationOutcome {
            accepted: true,
            new_best: true,
            rejected_hard: false,
            delta: -1.0,
        });
        assert!(tabu.is_tabu(JobIndex::new(1)));
        assert!(tabu.is_tabu(JobIndex::new(2)));
        assert!(!tabu.is_tabu(JobIndex::new(0)));
    }
}
