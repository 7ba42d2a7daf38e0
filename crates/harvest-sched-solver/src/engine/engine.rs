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

use crate::engine::config::SolverConfig;
use crate::engine::err::{EngineStalledError, SolverError};
use crate::engine::opening::{greedy_assignments, GreedyOpening, WarmStart};
use crate::engine::termination::TerminationCriteria;
use crate::engine::trace::TraceRecorder;
use crate::eval::{summarize, Totals, ViolationClass, ViolationPolicy};
use crate::model::SolverModel;
use crate::search::strategy::{IterationOutcome, SearchStrategy};
use crate::state::schedule::ScheduleState;
use harvest_sched_model::prelude::{
    Scenario, ScheduledJob, SolutionReport, TerminationReason,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

/// Total magnitude across the classes the policy treats as hard.
#[inline]
fn hard_magnitude(policy: &ViolationPolicy, totals: &Totals) -> f64 {
    ViolationClass::ALL
        .iter()
        .filter(|&&c| policy.is_hard(c))
        .map(|&c| match c {
            ViolationClass::Precedence => totals.precedence.magnitude,
            ViolationClass::Calendar => totals.calendar.magnitude,
            ViolationClass::Capacity => totals.capacity.magnitude,
            ViolationClass::Mobilisation => totals.mobilisation.magnitude,
        })
        .sum()
}

/// The outer search loop: greedy opening, then propose/apply/accept with
/// exact rollback, best tracking, optional restarts to the incumbent, and a
/// deterministic convergence trace. The strategy decides acceptance; the
/// engine owns state, budgets, and the hard-constraint gate.
#[derive(Debug, Clone)]
pub struct MetaheuristicEngine {
    config: SolverConfig,
}

impl MetaheuristicEngine {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn run<S>(
        &self,
        scenario: &Scenario,
        strategy: &mut S,
    ) -> Result<SolutionReport, SolverError>
    where
        S: SearchStrategy<ChaCha8Rng>,
    {
        self.run_with_warm_start(scenario, strategy, &GreedyOpening)
    }

    /// Like [`run`](Self::run), but seeds the search from an external warm
    /// start (a MIP backend, a previous run). When the backend declines the
    /// greedy construction takes over.
    pub fn run_with_warm_start<S, W>(
        &self,
        scenario: &Scenario,
        strategy: &mut S,
        warm: &W,
    ) -> Result<SolutionReport, SolverError>
    where
        S: SearchStrategy<ChaCha8Rng>,
        W: WarmStart + ?Sized,
    {
        let model = SolverModel::build(scenario)?;
        let weights = self.config.weights();
        let criteria = TerminationCriteria::from_config(&self.config);
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed());
        let mut recorder = TraceRecorder::new(self.config.trace_interval());
        let started = std::time::Instant::now();

        // An external opening is only adopted when it is well-formed and
        // passes the same hard gate as any proposed candidate; otherwise the
        // greedy construction takes over.
        let mut state = match warm.warm_start(&model) {
            Some(assignments)
                if assignments.len() == model.job_count()
                    && assignments.iter().all(|a| {
                        a.machine().get() < model.machine_count()
                            && a.worker().get() < model.worker_count()
                    }) =>
            {
                let state = ScheduleState::new(&model, assignments);
                if hard_magnitude(weights.policy(), state.totals()) > 0.0 {
                    warn!("warm start violates hard constraints, using greedy opening");
                    ScheduleState::new(&model, greedy_assignments(&model))
                } else {
                    state
                }
            }
            _ => ScheduleState::new(&model, greedy_assignments(&model)),
        };
        let mut current = state.fitness(weights);
        let mut best = current;
        let mut best_assignments = state.assignments().to_vec();

        info!(
            strategy = strategy.name(),
            seed = self.config.seed(),
            jobs = model.job_count(),
            opening_cost = current.total(),
            "search started"
        );

        let mut iterations: u64 = 0;
        let mut since_best: u64 = 0;
        let mut stalled: u64 = 0;
        let mut invalid: u64 = 0;
        let mut proposed_any = false;

        let reason = loop {
            if let Some(reason) = criteria.check(iterations, since_best, started.elapsed()) {
                break reason;
            }
            recorder.record(iterations, best.total(), current.total());
            iterations += 1;

            let Some(batch) = strategy.propose(&model, &state, &mut rng) else {
                stalled += 1;
                if stalled >= self.config.stall_limit() {
                    if !proposed_any {
                        return Err(EngineStalledError::new(iterations).into());
                    }
                    break TerminationReason::Stalled;
                }
                continue;
            };
            // A structurally invalid batch discards the iteration; repeats
            // beyond the stall limit abort the run.
            if let Err(e) = batch.validate(&model) {
                warn!(iteration = iterations, error = %e, "discarding invalid batch");
                invalid += 1;
                if invalid >= self.config.stall_limit() {
                    return Err(EngineStalledError::new(iterations).into());
                }
                continue;
            }
            proposed_any = true;
            stalled = 0;
            invalid = 0;

            let undo = state.apply(&model, &batch);
            let candidate = state.fitness(weights);
            let delta = candidate.delta_from(&current);

            let rejected_hard = hard_magnitude(weights.policy(), state.totals()) > 0.0;
            let accepted = if rejected_hard {
                false
            } else {
                strategy.accept(current, candidate, best, &mut rng)
            };

            let mut new_best = false;
            if accepted {
                current = candidate;
                if candidate.is_better_than(&best) {
                    best = candidate;
                    best_assignments.clear();
                    best_assignments.extend_from_slice(state.assignments());
                    new_best = true;
                    since_best = 0;
                    debug!(iteration = iterations, cost = best.total(), "new best");
                }
            } else {
                state.rollback(&model, undo);
            }
            if !new_best {
                since_best += 1;
            }

            strategy.observe(&IterationOutcome {
                accepted,
                new_best,
                rejected_hard,
                delta,
            });

            if let Some(restart) = self.config.restart_after() {
                if since_best > 0 && since_best % restart == 0 {
                    state = ScheduleState::new(&model, best_assignments.clone());
                    current = best;
                }
            }
        };

        // Rebuild from the incumbent so the report never reflects a
        // worse-than-best working state.
        let final_state = ScheduleState::new(&model, best_assignments);
        let breakdown = weights.breakdown(final_state.totals(), final_state.makespan());
        let violations = summarize(final_state.totals());
        recorder.force(iterations, best.total(), current.total());

        let reason = if reason == TerminationReason::NoImprovement && violations.is_clean() {
            TerminationReason::Converged
        } else {
            reason
        };

        let schedule: Vec<ScheduledJob> = final_state
            .assignments()
            .iter()
            .enumerate()
            .map(|(i, asg)| {
                let job = crate::model::JobIndex::new(i);
                ScheduledJob::new(
                    model.job(job).id(),
                    model.machine(asg.machine()).id(),
                    model.worker(asg.worker()).id(),
                    asg.start(),
                    asg.start() + model.duration(job),
                )
            })
            .collect();

        info!(
            iterations,
            cost = breakdown.total(),
            termination = %reason,
            "search finished"
        );

        Ok(SolutionReport::new(
            schedule,
            breakdown,
            violations,
            recorder.into_points(),
            reason,
            iterations,
            self.config.seed(),
        ))
    }
}

impl Default for MetaheuristicEngine {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}
