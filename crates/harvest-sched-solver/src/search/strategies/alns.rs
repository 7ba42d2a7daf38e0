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
use crate::search::registry::OperatorRegistry;
use crate::search::strategy::{IterationOutcome, SearchStrategy};
use crate::state::fitness::Fitness;
use crate::state::mv::MoveBatch;
use crate::state::schedule::ScheduleState;
use harvest_sched_core::math::ewma::{Ewma, InvalidAlphaError};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlnsConfig {
    score_alpha: f64,
    initial_score: f64,
    temperature: f64,
    reward_new_best: f64,
    reward_improved: f64,
    reward_accepted: f64,
}

impl AlnsConfig {
    #[inline]
    pub fn with_score_alpha(mut self, alpha: f64) -> Self {
        self.score_alpha = alpha;
        self
    }

    #[inline]
    pub fn with_initial_score(mut self, score: f64) -> Self {
        self.initial_score = score;
        self
    }

    #[inline]
    pub fn with_temperature(mut self, t: f64) -> Self {
        self.temperature = t;
        self
    }

    #[inline]
    pub fn score_alpha(&self) -> f64 {
        self.score_alpha
    }

    #[inline]
    pub fn initial_score(&self) -> f64 {
        self.initial_score
    }

    #[inline]
    pub fn temperature(&self) -> f64 {
        self.temperature
    }
}

impl Default for AlnsConfig {
    fn default() -> Self {
        Self {
            score_alpha: 0.1,
            initial_score: 1.0,
            temperature: 10.0,
            reward_new_best: 3.0,
            reward_improved: 2.0,
            reward_accepted: 1.0,
        }
    }
}

impl std::fmt::Display for AlnsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "alpha={}, initial_score={}, temperature={}",
            self.score_alpha, self.initial_score, self.temperature
        )
    }
}

/// Adaptive large neighborhood search: operators are drawn by roulette
/// wheel over smoothed reward scores. An operator earns a reward each time
/// its batch is kept, larger when it improves the incumbent or sets a new
/// best, and the score decays towards recent performance via an EWMA.
/// Acceptance is Metropolis at a fixed temperature.
pub struct AdaptiveLargeNeighborhood<R: rand::Rng> {
    config: AlnsConfig,
    registry: OperatorRegistry<R>,
    scores: Vec<Ewma>,
    last_operator: Option<usize>,
}

impl<R: rand::Rng> AdaptiveLargeNeighborhood<R> {
    pub fn new(
        config: AlnsConfig,
        registry: OperatorRegistry<R>,
    ) -> Result<Self, InvalidAlphaError> {
        let mut scores = Vec::with_capacity(registry.len());
        for _ in 0..registry.len() {
            scores.push(Ewma::new(config.score_alpha())?);
        }
        Ok(Self {
            config,
            registry,
            scores,
            last_operator: None,
        })
    }

    #[inline]
    fn score(&self, index: usize) -> f64 {
        self.scores[index].value_or(self.config.initial_score())
    }

    fn weights(&self) -> Vec<f64> {
        (0..self.scores.len()).map(|i| self.score(i)).collect()
    }
}

impl<R: rand::Rng + Send> SearchStrategy<R> for AdaptiveLargeNeighborhood<R> {
    fn name(&self) -> &'static str {
        "adaptive-large-neighborhood"
    }

    fn propose(
        &mut self,
        model: &SolverModel<'_>,
        state: &ScheduleState,
        rng: &mut R,
    ) -> Option<MoveBatch> {
        let weights = self.weights();
        let (index, batch) = self.registry.propose_weighted(&weights, model, state, rng)?;
        self.last_operator = Some(index);
        Some(batch)
    }

    fn accept(&mut self, current: Fitness, candidate: Fitness, _best: Fitness, rng: &mut R) -> bool {
        let delta = candidate.delta_from(&current);
        if delta < 0.0 {
            return true;
        }
        rng.random::<f64>() < (-delta / self.config.temperature()).exp()
    }

    fn observe(&mut self, outcome: &IterationOutcome) {
        let Some(index) = self.last_operator.take() else {
            return;
        };
        let reward = if outcome.new_best {
            self.config.reward_new_best
        } else if outcome.improved() {
            self.config.reward_improved
        } else if outcome.accepted {
            self.config.reward_accepted
        } else {
            0.0
        };
        self.scores[index].observe(reward);
    }
}
