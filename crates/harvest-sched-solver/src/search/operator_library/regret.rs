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

use crate::model::{JobIndex, MachineIndex, SolverModel, WorkerIndex};
use crate::search::operator::MoveOperator;
use crate::search::slot;
use crate::state::mv::{Move, MoveBatch};
use crate::state::schedule::ScheduleState;
use smallvec::SmallVec;

/// Ruin plus regret-2 repair: rips a random job subset out and reinserts the
/// job whose best placement would degrade the most if postponed (largest gap
/// between its best and second-best start) first. Reinsertion only considers
/// jobs whose ruined predecessors are already replanned, so the emitted batch
/// stays precedence-ordered.
#[derive(Debug, Clone, Copy)]
pub struct RegretRecreate {
    ruin_size: usize,
}

impl RegretRecreate {
    #[inline]
    pub fn new(ruin_size: usize) -> Self {
        debug_assert!(ruin_size >= 2);
        Self { ruin_size }
    }
}

impl Default for RegretRecreate {
    #[inline]
    fn default() -> Self {
        Self::new(3)
    }
}

struct Placement {
    start: i64,
    machine: MachineIndex,
    worker: WorkerIndex,
    regret: i64,
}

fn best_placement(
    model: &SolverModel<'_>,
    machine_busy: &[Vec<(i64, i64)>],
    worker_busy: &[Vec<(i64, i64)>],
    job: JobIndex,
    lb: i64,
) -> Option<Placement> {
    let duration = model.duration(job);
    let mut best: Option<(i64, MachineIndex, WorkerIndex)> = None;
    let mut second: Option<i64> = None;
    for &m in model.compatible_machines(job) {
        for &w in model.compatible_workers(job) {
            let mut busy = machine_busy[m.get()].clone();
            busy.extend_from_slice(&worker_busy[w.get()]);
            busy.sort_unstable();
            let start = slot::earliest_feasible(model, m, &busy, lb, duration);
            match best {
                Some((s, _, _)) if start >= s => {
                    second = Some(second.map(|x| x.min(start)).unwrap_or(start));
                }
                _ => {
                    if let Some((s, _, _)) = best {
                        second = Some(second.map(|x| x.min(s)).unwrap_or(s));
                    }
                    best = Some((start, m, w));
                }
            }
        }
    }
    let (start, machine, worker) = best?;
    Some(Placement {
        start,
        machine,
        worker,
        regret: second.map(|s| s - start).unwrap_or(0),
    })
}

impl<R: rand::Rng> MoveOperator<R> for RegretRecreate {
    fn name(&self) -> &'static str {
        "regret-recreate"
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

        // Random subset, de-duplicated.
        let mut ruined: SmallVec<[JobIndex; 8]> = SmallVec::new();
        for _ in 0..self.ruin_size * 2 {
            if ruined.len() >= self.ruin_size {
                break;
            }
            let j = JobIndex::new(rng.random_range(0..model.job_count()));
            if !ruined.contains(&j) {
                ruined.push(j);
            }
        }
        if ruined.len() < 2 {
            return None;
        }

        let mut machine_busy: Vec<Vec<(i64, i64)>> = (0..model.machine_count())
            .map(|m| {
                state
                    .machine_timeline(MachineIndex::new(m))
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
                    .worker_timeline(WorkerIndex::new(w))
                    .entries()
                    .iter()
                    .filter(|e| !ruined.contains(&e.job()))
                    .map(|e| (e.start(), e.end()))
                    .collect()
            })
            .collect();

        let mut planned_end: SmallVec<[(JobIndex, i64); 8]> = SmallVec::new();
        let mut pending: SmallVec<[JobIndex; 8]> = ruined.clone();
        let mut batch = MoveBatch::new();

        while !pending.is_empty() {
            // Insertable: no pending predecessor.
            let mut chosen: Option<(usize, Placement)> = None;
            for (i, &job) in pending.iter().enumerate() {
                if model.predecessors(job).iter().any(|p| pending.contains(p)) {
                    continue;
                }
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
                let Some(p) = best_placement(model, &machine_busy, &worker_busy, job, lb) else {
                    continue;
                };
                let better = chosen
                    .as_ref()
                    .map(|(_, c)| p.regret > c.regret)
                    .unwrap_or(true);
                if better {
                    chosen = Some((i, p));
                }
            }
            let (index, placement) = chosen?;
            let job = pending.remove(index);
            let end = placement.start + model.duration(job);

            machine_busy[placement.machine.get()].push((placement.start, end));
            machine_busy[placement.machine.get()].sort_unstable();
            worker_busy[placement.worker.get()].push((placement.start, end));
            worker_busy[placement.worker.get()].sort_unstable();
            planned_end.push((job, end));
            batch.push(Move::Reassign {
                job,
                machine: placement.machine,
                worker: placement.worker,
                start: placement.start,
            });
        }
        Some(batch)
    }
}
