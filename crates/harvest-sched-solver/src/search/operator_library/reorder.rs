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

use crate::model::{MachineIndex, SolverModel};
use crate::search::operator::MoveOperator;
use crate::state::mv::{Move, MoveBatch};
use crate::state::schedule::ScheduleState;

/// Swaps the start ticks of two adjacent jobs on one machine timeline.
/// Useful when both jobs fit either order but precedence or mobilisation
/// prefers the other one.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwapAdjacent;

impl<R: rand::Rng> MoveOperator<R> for SwapAdjacent {
    fn name(&self) -> &'static str {
        "swap-adjacent"
    }

    fn propose(
        &self,
        model: &SolverModel<'_>,
        state: &ScheduleState,
        rng: &mut R,
    ) -> Option<MoveBatch> {
        if model.machine_count() == 0 {
            return None;
        }
        // Random probe, then first machine with at least two jobs.
        let offset = rng.random_range(0..model.machine_count());
        for i in 0..model.machine_count() {
            let machine = MachineIndex::new((offset + i) % model.machine_count());
            let timeline = state.machine_timeline(machine);
            if timeline.len() < 2 {
                continue;
            }
            let pos = rng.random_range(0..timeline.len() - 1);
            let first = timeline.entries()[pos].job();
            let second = timeline.entries()[pos + 1].job();
            // Equal durations would make the swap a no-op on the timeline.
            if model.duration(first) == model.duration(second)
                && timeline.entries()[pos].start() == timeline.entries()[pos + 1].start()
            {
                continue;
            }
            return Some(MoveBatch::single(Move::SwapStarts { first, second }));
        }
        None
    }
}
