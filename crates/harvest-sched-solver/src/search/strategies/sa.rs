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

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaConfig {
    initial_temperature: f64,
    cooling: f64,
    floor: f64,
}

impl SaConfig {
    #[inline]
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    #[inline]
    pub fn with_cooling(mut self, c: f64) -> Self {
        debug_assert!(c > 0.0 && c < 1.0);
        self.cooling = c;
        self
    }

    #[inline]
    pub fn with_floor(mut self, f: f64) -> Self {
        self.floor = f;
        self
    }

    #[inline]
    pub fn initial_temperature(&self) -> f64 {
        self.initial_temperature
    }

    #[inline]
    pub fn cooling(&self) -> f64 {
        self.cooling
    }

    #[inline]
    pub fn floor(&self) -> f64 {
        self.floor
    }
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 100.0,
            cooling: 0.999,
            floor: 1e-3,
        }
    }
}

impl std::fmt::Display for SaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "T0={}, cooling={}, floor={}",
            self.initial_temperature, self.cooling, self.floor
        )
    }
}

/// Classic simulated annealing over the shared operator mix: non-worsening
/// candidates always pass, worsening ones pass with probability
/// `exp(-delta / T)`, and the temperature decays geometrically. Once the
/// temperature reaches the floor the strategy proposes nothing more and the
/// engine winds down.
pub struct SimulatedAnnealing<R: rand::Rng> {
    config: SaConfig,
    registry: OperatorRegistry<R>,
    temperature: f64,
}

impl<R: rand::Rng> SimulatedAnnealing<R> {
    pub fn new(config: SaConfig, registry: OperatorRegistry<R>) -> Self {
        Self {
            temperature: config.initial_temperature(),
            config,
            registry,
        }
    }

    #[inline]
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Resets the temperature, used after an engine restart to best.
    #[inline]
    pub fn reheat(&mut self) {
        self.temperature = self.config.initial_temperature();
    }
}

impl<R: rand::Rng + Send> SearchStrategy<R> for SimulatedAnnealing<R> {
    fn name(&self) -> &'static str {
        "simulated-annealing"
    }

    fn propose(
        &mut self,
        model: &SolverModel<'_>,
        state: &ScheduleState,
        rng: &mut R,
    ) -> Option<MoveBatch> {
        // Cooled out: nothing worsening can pass anymore, so stop proposing
        // and let the engine terminate by exhaustion.
        if self.temperature <= self.config.floor() {
            return None;
        }
        self.registry.propose_uniform(model, state, rng).map(|(_, b)| b)
    }

    fn accept(&mut self, current: Fitness, candidate: Fitness, _best: Fitness, rng: &mut R) -> bool {
        let delta = candidate.delta_from(&current);
        if delta <= 0.0 {
            return true;
        }
        if self.temperature <= self.config.floor() {
            return false;
        }
        rng.random::<f64>() < (-delta / self.temperature).exp()
    }

    fn observe(&mut self, _outcome: &IterationOutcome) {
        self.temperature = (self.temperature * self.config.cooling()).max(self.config.floor());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn strategy(config: SaConfig) -> SimulatedAnnealing<ChaCha8Rng> {
        SimulatedAnnealing::new(config, OperatorRegistry::standard())
    }

    #[test]
    fn test_improving_always_accepted() {
        let mut sa = strategy(SaConfig::default().with_initial_temperature(1e-9));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(sa.accept(Fitness::new(10.0), Fitness::new(9.0), Fitness::new(5.0), &mut rng));
    }

    #[test]
    fn test_worsening_rejected_when_cold() {
        let mut sa = strategy(SaConfig::default().with_initial_temperature(1e-6).with_floor(1e-3));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..100 {
            assert!(!sa.accept(Fitness::new(10.0), Fitness::new(11.0), Fitness::new(5.0), &mut rng));
        }
    }

    #[test]
    fn test_sideways_accepted_even_when_cold() {
        let mut sa = strategy(SaConfig::default().with_initial_temperature(1e-6).with_floor(1e-3));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(sa.accept(Fitness::new(10.0), Fitness::new(10.0), Fitness::new(5.0), &mut rng));
    }

    #[test]
    fn test_worsening_mostly_accepted_when_hot() {
        let mut sa = strategy(SaConfig::default().with_initial_temperature(1e9));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let accepted = (0..100)
            .filter(|_| sa.accept(Fitness::new(10.0), Fitness::new(11.0), Fitness::new(5.0), &mut rng))
            .count();
        assert!(accepted > 90);
    }

    #[test]
    fn test_cooling_reaches_floor_and_reheats() {
        let mut sa = strategy(
            SaConfig::default()
                .with_initial_temperature(1.0)
                .with_cooling(0.5)
                .with_floor(0.1),
        );
        let outcome = IterationOutcome {
            accepted: false,
            new_best: false,
            rejected_hard: false,
            delta: 0.0,
        };
        for _ in 0..10 {
            sa.observe(&outcome);
        }
        assert_eq!(sa.temperature(), 0.1);
        sa.reheat();
        assert_eq!(sa.temperature(), 1.0);
    }
}
