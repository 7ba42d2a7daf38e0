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
use smallvec::SmallVec;

/// A move referencing a job or resource outside the model. Such a batch is
/// discarded without ever touching the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidMoveError {
    mv: String,
}

impl InvalidMoveError {
    pub fn new(mv: &Move) -> Self {
        Self { mv: mv.to_string() }
    }
}

impl std::fmt::Display for InvalidMoveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "move references an unknown entity: {}", self.mv)
    }
}

impl std::error::Error for InvalidMoveError {}

/// One elementary schedule mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Place `job` on a machine and worker at a start tick.
    Reassign {
        job: JobIndex,
        machine: MachineIndex,
        worker: WorkerIndex,
        start: i64,
    },
    /// Exchange the start ticks of two jobs, both keeping their resources.
    SwapStarts { first: JobIndex, second: JobIndex },
}

impl Move {
    /// Jobs this move touches.
    #[inline]
    pub fn jobs(&self) -> SmallVec<[JobIndex; 2]> {
        match *self {
            Move::Reassign { job, .. } => SmallVec::from_slice(&[job]),
            Move::SwapStarts { first, second } => SmallVec::from_slice(&[first, second]),
        }
    }

    /// Structural check: every referenced index must exist in the model.
    pub fn validate(&self, model: &SolverModel<'_>) -> Result<(), InvalidMoveError> {
        let ok = match *self {
            Move::Reassign {
                job,
                machine,
                worker,
                ..
            } => {
                job.get() < model.job_count()
                    && machine.get() < model.machine_count()
                    && worker.get() < model.worker_count()
            }
            Move::SwapStarts { first, second } => {
                first.get() < model.job_count()
                    && second.get() < model.job_count()
                    && first != second
            }
        };
        if ok {
            Ok(())
        } else {
            Err(InvalidMoveError::new(self))
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Move::Reassign {
                job,
                machine,
                worker,
                start,
            } => write!(f, "reassign {job} -> ({machine}, {worker}) @ {start}"),
            Move::SwapStarts { first, second } => write!(f, "swap starts {first} <-> {second}"),
        }
    }
}

/// A batch of moves applied and evaluated atomically. Rollback undoes the
/// whole batch; there is no partially applied state visible to search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveBatch {
    moves: SmallVec<[Move; 4]>,
}

impl MoveBatch {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn single(mv: Move) -> Self {
        let mut batch = Self::new();
        batch.push(mv);
        batch
    }

    #[inline]
    pub fn push(&mut self, mv: Move) {
        self.moves.push(mv);
    }

    #[inline]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Structural check over all member moves; the first offender wins.
    pub fn validate(&self, model: &SolverModel<'_>) -> Result<(), InvalidMoveError> {
        for mv in &self.moves {
            mv.validate(model)?;
        }
        Ok(())
    }

    /// All jobs touched by the batch, deduplicated, in first-touch order.
    pub fn touched_jobs(&self) -> SmallVec<[JobIndex; 8]> {
        let mut jobs: SmallVec<[JobIndex; 8]> = SmallVec::new();
        for mv in &self.moves {
            for j in mv.jobs() {
                if !jobs.contains(&j) {
                    jobs.push(j);
                }
            }
        }
        jobs
    }
}

impl FromIterator<Move> for MoveBatch {
    fn from_iter<I: IntoIterator<Item = Move>>(iter: I) -> Self {
        Self {
            moves: iter.into_iter().collect(),
        }
    }
}

impl std::fmt::Display for MoveBatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, mv) in self.moves.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{mv}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touched_jobs_deduplicates() {
        let mut batch = MoveBatch::new();
        batch.push(Move::Reassign {
            job: JobIndex::new(1),
            machine: MachineIndex::new(0),
            worker: WorkerIndex::new(0),
            start: 5,
        });
        batch.push(Move::SwapStarts {
            first: JobIndex::new(1),
            second: JobIndex::new(2),
        });
        let jobs = batch.touched_jobs();
        assert_eq!(jobs.as_slice(), &[JobIndex::new(1), JobIndex::new(2)]);
    }

    #[test]
    fn test_batch_display() {
        let batch = MoveBatch::single(Move::SwapStarts {
            first: JobIndex::new(0),
            second: JobIndex::new(3),
        });
        assert_eq!(
            format!("{batch}"),
            "[swap starts JobIndex(0) <-> JobIndex(3)]"
        );
    }
}
