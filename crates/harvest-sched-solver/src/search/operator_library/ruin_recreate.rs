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
use crate::search::operator::MoveOperator;
use crate::search::slot;
use crate::state::mv::{Move, MoveBatch};
use crate::state::schedule::ScheduleState;
use smallvec::SmallVec;

/// Large-neighborhood operator: rips a cluster of jobs sharing a block out
/// of the schedule and greedily reinserts them in precedence order. The
/// whole rebuild is emitted as one batch, so the engine evaluates it
/// atomically and the state never holds unplaced jobs.
#[derive(Debug, Clone, Copy)]
pub struct RuinRecreate {
    ruin_size: usize,
}

impl RuinRecreate {
    #[inline]
    pub fn new(ruin_size: usize) -> Self {
        debug_assert!(ruin_size >= 1);
        Self { ruin_size }
    }
}

impl Default for RuinRecreate {
    #[inline]
    fn default() -> Self {
        Self::new(3)
    }
}

impl<R: rand::Rng> MoveOperator<R> for RuinRecreate {
    fn name(&self) -> &'static str {
        "ruin-recreate"
    }

    fn propose(
        &self,
        model: &SolverModel<'_>,
        state: &ScheduleState,
        rng: &mut R,
    ) -> Option<MoveBatch> {
        if model.job_count() < 2 {
            return None;
        }
        let seed = JobIndex::new(rng.random_range(0..model.job_count()));
        let block = model.block_of(seed);

        // Cluster: the seed plus other jobs on the same block, topo order.
        let mut ruined: SmallVec<[JobIndex; 8]> = SmallVec::new();
        for &j in model.topo_order() {
            if ruined.len() >= self.ruin_size {
                break;
            }
            if j == seed || model.block_of(j) == block {
                ruined.push(j);
            }
        }
        if ruined.len() < 2 {
            return None;
        }

        // Busy views with the ruined jobs detached.
        let mut machine_busy: Vec<Vec<(i64, i64)>> = (0..model.machine_count())
            .map(|m| {
                state
                    .machine_timeline(crate::model::MachineIndex::new(m))
                    .entries()
                    .iter()
                    .filter(|e| !ruined.contains(&e.job()))
                    .map(|e| (e.start(), e.end()))
                    .collect()
            })
            .collect();
        let mut worker_busy: Vec<Vec<(i64, i64)>> = (0..model.worker_count())
            .map(|w| {
                state
                    .worker_timeline(crate::model::WorkerIndex::new(w))
                    .entries()
                    .iter()
                    .filter(|e| !ruined.contains(&e.job()))
                    .map(|e| (e.start(), e.end()))
                    .collect()
            })
            .collect();

        // Ends of already replanned jobs, for precedence lower bounds.
        let mut planned_end: SmallVec<[(JobIndex, i64); 8]> = SmallVec::new();
        let mut batch = MoveBatch::new();

        for &job in &ruined {
            let duration = model.duration(job);
            let lb = model
                .predecessors(job)
                .iter()
                .map(|&p| {
                    planned_end
                        .iter()
                        .find(|(j, _)| *j == p)
                        .map(|&(_, end)| end)
                        .unwrap_or_else(|| state.assignment(p).start() + model.duration(p))
                })
                .max()
                .unwrap_or(0);

            let mut best: Option<(i64, crate::model::MachineIndex, crate::model::WorkerIndex)> =
                None;
            for &m in model.compatible_machines(job) {
                for &w in model.compatible_workers(job) {
                    let mut busy = machine_busy[m.get()].clone();
                    busy.extend_from_slice(&worker_busy[w.get()]);
                    busy.sort_unstable();
                    let start = slot::earliest_feasible(model, m, &busy, lb, duration);
                    if best.map(|(s, _, _)| start < s).unwrap_or(true) {
                        best = Some((start, m, w));
                    }
                }
            }
            let (start, machine, worker) = best?;

            machine_busy[machine.get()].push((start, start + duration));
            machine_busy[machine.get()].sort_unstable();
            worker_busy[worker.get()].push((start, start + duration));
            worker_busy[worker.get()].sort_unstable();
            planned_end.push((job, start + duration));
            batch.push(Move::Reassign {
                job,
                machine,
                worker,
                start,
            });
        }
        Some(batch)
    }
}
