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

/// Moves one random job to a random compatible machine/worker pair at the
/// earliest capacity-free start there.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomReassign;

impl<R: rand::Rng> MoveOperator<R> for RandomReassign {
    fn name(&self) -> &'static str {
        "random-reassign"
    }

    fn propose(
        &self,
        model: &SolverModel<'_>,
        state: &ScheduleState,
        rng: &mut R,
    ) -> Option<MoveBatch> {
        if model.job_count() == 0 {
            return None;
        }
        let job = JobIndex::new(rng.random_range(0..model.job_count()));
        let machines = model.compatible_machines(job);
        let workers = model.compatible_workers(job);
        let machine = machines[rng.random_range(0..machines.len())];
        let worker = workers[rng.random_range(0..workers.len())];
        let start = slot::find_start(model, state, job, machine, worker);

        let current = state.assignment(job);
        if current.machine() == machine && current.worker() == worker && current.start() == start {
            return None;
        }
        Some(MoveBatch::single(Move::Reassign {
            job,
            machine,
            worker,
            start,
        }))
    }
}
