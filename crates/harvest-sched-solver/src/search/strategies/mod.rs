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

pub mod alns;
pub mod ils;
pub mod sa;
pub mod tabu;

pub use alns::{AdaptiveLargeNeighborhood, AlnsConfig};
pub use ils::{IlsConfig, IteratedLocalSearch};
pub use sa::{SaConfig, SimulatedAnnealing};
pub use tabu::{TabuConfig, TabuSearch};

use crate::search::registry::OperatorRegistry;
use crate::search::strategy::SearchStrategy;
use harvest_sched_core::math::ewma::InvalidAlphaError;

/// Strategy selection by configuration, for callers that pick the
/// metaheuristic at runtime rather than at the type level.
#[derive(Debug, Clone, PartialEq)]
pub enum StrategyConfig {
    Sa(SaConfig),
    Tabu(TabuConfig),
    Ils(IlsConfig),
    Alns(AlnsConfig),
}

impl StrategyConfig {
    pub fn build<R>(
        self,
        registry: OperatorRegistry<R>,
    ) -> Result<Box<dyn SearchStrategy<R>>, InvalidAlphaError>
    where
        R: rand::Rng + Send + 'static,
    {
        Ok(match self {
            StrategyConfig::Sa(c) => Box::new(SimulatedAnnealing::new(c, registry)),
            StrategyConfig::Tabu(c) => Box::new(TabuSearch::new(c, registry)),
            StrategyConfig::Ils(c) => Box::new(IteratedLocalSearch::new(c, registry)),
            StrategyConfig::Alns(c) => Box::new(AdaptiveLargeNeighborhood::new(c, registry)?),
        })
    }
}

impl std::fmt::Display for StrategyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyConfig::Sa(c) => write!(f, "sa({c})"),
            StrategyConfig::Tabu(c) => write!(f, "tabu({c})"),
            StrategyConfig::Ils(c) => write!(f, "ils({c})"),
            StrategyConfig::Alns(c) => write!(f, "alns({c})"),
        }
    }
}
