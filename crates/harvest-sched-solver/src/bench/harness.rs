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

use crate::bench::metrics::{MetricsRow, MetricsTable, TrialStatus};
use crate::engine::{MetaheuristicEngine, SolverConfig, SolverError};
use crate::search::strategy::SearchStrategy;
use harvest_sched_model::prelude::Scenario;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

/// Runs every (scenario, seed) trial of a suite, one fresh strategy per
/// trial, trials in parallel. A trial failure becomes a row, never a panic,
/// so one bad scenario cannot sink the suite.
pub fn run_suite<S, F>(
    config: &SolverConfig,
    scenarios: &[(String, Scenario)],
    seeds: &[u64],
    make_strategy: F,
) -> MetricsTable
where
    S: SearchStrategy<ChaCha8Rng>,
    F: Fn() -> S + Sync,
{
    let trials: Vec<(&(String, Scenario), u64)> = scenarios
        .iter()
        .flat_map(|sc| seeds.iter().map(move |&seed| (sc, seed)))
        .collect();

    let rows: Vec<MetricsRow> = trials
        .par_iter()
        .map(|&((name, scenario), seed)| {
            let engine = MetaheuristicEngine::new(config.clone().with_seed(seed));
            let mut strategy = make_strategy();
            let strategy_name = strategy.name().to_string();
            let started = std::time::Instant::now();
            let outcome = engine.run(scenario, &mut strategy);
            let wall_ms = started.elapsed().as_millis() as u64;
            match outcome {
                Ok(report) => {
                    let v = report.violations();
                    let violation_count = v.precedence().count()
                        + v.calendar().count()
                        + v.capacity().count()
                        + v.mobilisation().count();
                    MetricsRow::solved(
                        name.clone(),
                        strategy_name,
                        seed,
                        report.objective().total(),
                        report.iterations(),
                        wall_ms,
                        violation_count,
                        report.trace().to_vec(),
                        report.termination().to_string(),
                    )
                }
                Err(SolverError::Infeasible(_)) => MetricsRow::failed(
                    name.clone(),
                    strategy_name,
                    seed,
                    TrialStatus::Infeasible,
                    wall_ms,
                ),
                Err(SolverError::Stalled(_)) => MetricsRow::failed(
                    name.clone(),
                    strategy_name,
                    seed,
                    TrialStatus::Stalled,
                    wall_ms,
                ),
            }
        })
        .collect();

    MetricsTable::from_rows(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::registry::OperatorRegistry;
    use crate::search::strategies::{SaConfig, SimulatedAnnealing};
    use harvest_sched_model::prelude::*;
    use harvest_sched_model::scenario::{HarvestSystem, ScenarioBuilder, ShiftWindow};

    fn tiny_scenario() -> Scenario {
        let cal = ShiftCalendar::new(
            [ShiftWindow::new(TimeWindow::new(Time::new(0), Time::new(1_000)))],
            [],
        )
        .unwrap();
        ScenarioBuilder::new()
            .with_global_calendar(cal)
            .add_block(Block::new(
                BlockIdentifier::new(1),
                (0.0, 0.0),
                5.0,
                5.0,
                TerrainKind::Gentle,
            ))
            .add_system(HarvestSystem::new(
                SystemIdentifier::new(1),
                SystemKind::GroundBased,
            ))
            .add_job(
                Job::new(
                    JobIdentifier::new(0),
                    BlockIdentifier::new(1),
                    SystemIdentifier::new(1),
                    TimeSpan::new(40),
                    MachineRole::Feller,
                )
                .unwrap(),
            )
            .add_machine(Machine::new(MachineIdentifier::new(1), MachineRole::Feller))
            .add_worker(Worker::new(WorkerIdentifier::new(1), [MachineRole::Feller]))
            .build()
            .unwrap()
    }

    #[test]
    fn test_suite_runs_all_trials() {
        let scenarios = vec![("tiny".to_string(), tiny_scenario())];
        let seeds = [1u64, 2, 3];
        let config = SolverConfig::default().with_max_iterations(50);
        let table = run_suite(&config, &scenarios, &seeds, || {
            SimulatedAnnealing::new(SaConfig::default(), OperatorRegistry::standard())
        });
        assert_eq!(table.len(), 3);
        assert_eq!(table.solve_rate(), 1.0);
        let seeds_seen: Vec<u64> = table.rows().iter().map(|r| r.seed()).collect();
        assert_eq!(seeds_seen, vec![1, 2, 3]);
    }
}
