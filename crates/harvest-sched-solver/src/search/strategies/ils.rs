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

use crate::model::SolverModel;
use crate::search::operator::MoveOperator;
use crate::search::operator_library::RuinRecreate;
use crate::search::registry::OperatorRegistry;
use crate::search::strategy::{IterationOutcome, SearchStrategy};
use crate::state::fitness::Fitness;
use crate::state::mv::MoveBatch;
use crate::state::schedule::ScheduleState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IlsConfig {
    stagnation_limit: u64,
    kick_size: usize,
}

impl IlsConfig {
    #[inline]
    pub fn with_stagnation_limit(mut self, limit: u64) -> Self {
        self.stagnation_limit = limit;
        self
    }

    #[inline]
    pub fn with_kick_size(mut self, size: usize) -> Self {
        self.kick_size = size;
        self
    }

    #[inline]
    pub fn stagnation_limit(&self) -> u64 {
        self.stagnation_limit
    }

    #[inline]
    pub fn kick_size(&self) -> usize {
        self.kick_size
    }
}

impl Default for IlsConfig {
    fn default() -> Self {
        Self {
            stagnation_limit: 200,
            kick_size: 4,
        }
    }
}

impl std::fmt::Display for IlsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "stagnation_limit={}, kick_size={}",
            self.stagnation_limit, self.kick_size
        )
    }
}

/// Iterated local search: plain hill climbing until the incumbent stops
/// improving, then a forced ruin-recreate kick that is accepted regardless
/// of its delta. The kick perturbation is larger than the regular
/// ruin-recreate operator in the registry.
pub struct IteratedLocalSearch<R: rand::Rng> {
    config: IlsConfig,
    registry: OperatorRegistry<R>,
    kick: RuinRecreate,
    stagnation: u64,
    kick_pending: bool,
}

impl<R: rand::Rng> IteratedLocalSearch<R> {
    pub fn new(config: IlsConfig, registry: OperatorRegistry<R>) -> Self {
        Self {
            kick: RuinRecreate::new(config.kick_size()),
            config,
            registry,
            stagnation: 0,
            kick_pending: false,
        }
    }

    #[inline]
    pub fn stagnation(&self) -> u64 {
        self.stagnation
    }
}

impl<R: rand::Rng + Send> SearchStrategy<R> for IteratedLocalSearch<R> {
    fn name(&self) -> &'static str {
        "iterated-local-search"
    }

    fn propose(
        &mut self,
        model: &SolverModel<'_>,
        state: &ScheduleState,
        rng: &mut R,
    ) -> Option<MoveBatch> {
        if self.stagnation >= self.config.stagnation_limit() {
            if let Some(batch) = self.kick.propose(model, state, rng) {
                self.kick_pending = true;
                self.stagnation = 0;
                return Some(batch);
            }
            // Kick found no cluster to ruin; fall through to the local step.
            self.stagnation = 0;
        }
        self.kick_pending = false;
        self.registry.propose_uniform(model, state, rng).map(|(_, b)| b)
    }

    fn accept(&mut self, current: Fitness, candidate: Fitness, _best: Fitness, _rng: &mut R) -> bool {
        if self.kick_pending {
            self.kick_pending = false;
            return true;
        }
        candidate.is_better_than(&current)
    }

    fn observe(&mut self, outcome: &IterationOutcome) {
        if outcome.new_best {
            self.stagnation = 0;
        } else {
            self.stagnation += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn strategy(config: IlsConfig) -> IteratedLocalSearch<ChaCha8Rng> {
        IteratedLocalSearch::new(config, OperatorRegistry::standard())
    }

    #[test]
    fn test_hill_climb_rejects_worsening() {
        let mut ils = strategy(IlsConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(ils.accept(Fitness::new(10.0), Fitness::new(9.0), Fitness::new(5.0), &mut rng));
        assert!(!ils.accept(Fitness::new(10.0), Fitness::new(11.0), Fitness::new(5.0), &mut rng));
        assert!(!ils.accept(Fitness::new(10.0), Fitness::new(10.0), Fitness::new(5.0), &mut rng));
    }

    #[test]
    fn test_kick_is_force_accepted() {
        let mut ils = strategy(IlsConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        ils.kick_pending = true;
        assert!(ils.accept(Fitness::new(10.0), Fitness::new(15.0), Fitness::new(5.0), &mut rng));
        // The flag is consumed; the next decision is a plain hill climb.
        assert!(!ils.accept(Fitness::new(10.0), Fitness::new(15.0), Fitness::new(5.0), &mut rng));
    }

    #[test]
    fn test_stagnation_counter_tracks_best() {
        let mut ils = strategy(IlsConfig::default().with_stagnation_limit(3));
        let flat = IterationOutcome {
            accepted: false,
            new_best: false,
            rejected_hard: false,
            delta: 0.5,
        };
        for _ in 0..3 {
            ils.observe(&flat);
        }
        assert_eq!(ils.stagnation(), 3);
        ils.observe(&IterationOutcome {
            accepted: true,
            new_best: true,
            rejected_hard: false,
            delta: -1.0,
        });
        assert_eq!(ils.stagnation(), 0);
    }
}
