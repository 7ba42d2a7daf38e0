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
use crate::state::mv::MoveBatch;
use crate::state::schedule::ScheduleState;

/// A neighborhood move generator. Operators only read the state; mutation
/// happens when the engine applies the returned batch.
pub trait MoveOperator<R: rand::Rng>: Send {
    fn name(&self) -> &'static str;

    /// Proposes one batch, or `None` when the operator has nothing to offer
    /// on this state.
    fn propose(
        &self,
        model: &SolverModel<'_>,
        state: &ScheduleState,
        rng: &mut R,
    ) -> Option<MoveBatch>;
}

impl<R: rand::Rng> std::fmt::Debug for dyn MoveOperator<R> + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MoveOperator {{ name: {} }}", self.name())
    }
}
