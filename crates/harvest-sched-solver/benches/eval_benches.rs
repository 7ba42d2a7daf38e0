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

use criterion::{criterion_group, criterion_main, Criterion};
use harvest_sched_model::prelude::*;
use harvest_sched_model::scenario::{
    HarvestSystem, Mobilisation, MobilisationTable, PrecedenceLink, ScenarioBuilder, ShiftWindow,
};
use harvest_sched_solver::engine::opening::greedy_assignments;
use harvest_sched_solver::model::{JobIndex, MachineIndex, SolverModel, WorkerIndex};
use harvest_sched_solver::state::mv::{Move, MoveBatch};
use harvest_sched_solver::state::schedule::ScheduleState;

/// A few dozen jobs over several blocks with per-block strict chains, two
/// machines per role, and a populated mobilisation table.
fn scenario(blocks: u32, jobs_per_block: u32) -> Scenario {
    let cal = ShiftCalendar::new(
        [ShiftWindow::new(TimeWindow::new(Time::new(0), Time::new(100_000)))],
        [TimeWindow::new(Time::new(500), Time::new(560))],
    )
    .unwrap();
    let mut table = MobilisationTable::new(2.0, 1.0);
    for from in 1..=blocks {
        for to in 1..=blocks {
            if from != to {
                table = table.with_entry(
                    BlockIdentifier::new(from),
                    BlockIdentifier::new(to),
                    Mobilisation::new(15.0, TimeSpan::new(10)),
                );
            }
        }
    }

    let mut builder = ScenarioBuilder::new()
        .with_global_calendar(cal)
        .with_mobilisation(table);
    let mut job_id = 0u32;
    for b in 1..=blocks {
        builder = builder.add_block(Block::new(
            BlockIdentifier::new(b),
            (b as f64 * 3.0, 0.0),
            8.0,
            10.0,
            TerrainKind::Gentle,
        ));
        let mut system = HarvestSystem::new(SystemIdentifier::new(b), SystemKind::GroundBased);
        for j in 0..jobs_per_block.saturating_sub(1) {
            system = system.with_link(PrecedenceLink::strict(
                JobIdentifier::new(job_id + j),
                JobIdentifier::new(job_id + j + 1),
            ));
        }
        builder = builder.add_system(system);
        for _ in 0..jobs_per_block {
            builder = builder.add_job(
                Job::new(
                    JobIdentifier::new(job_id),
                    BlockIdentifier::new(b),
                    SystemIdentifier::new(b),
                    TimeSpan::new(45),
                    MachineRole::Feller,
                )
                .unwrap(),
            );
            job_id += 1;
        }
    }
    for m in 1..=2u32 {
        builder = builder
            .add_machine(Machine::new(MachineIdentifier::new(m), MachineRole::Feller))
            .add_worker(Worker::new(WorkerIdentifier::new(m), [MachineRole::Feller]));
    }
    builder.build().unwrap()
}

fn bench_full_rebuild(c: &mut Criterion) {
    let s = scenario(4, 12);
    let model = SolverModel::build(&s).unwrap();
    let assignments = greedy_assignments(&model);
    c.bench_function("full_rebuild_48_jobs", |b| {
        b.iter(|| ScheduleState::new(&model, std::hint::black_box(assignments.clone())))
    });
}

fn bench_apply_rollback(c: &mut Criterion) {
    let s = scenario(4, 12);
    let model = SolverModel::build(&s).unwrap();
    let mut state = ScheduleState::new(&model, greedy_assignments(&model));
    let batch = MoveBatch::single(Move::Reassign {
        job: JobIndex::new(5),
        machine: MachineIndex::new(1),
        worker: WorkerIndex::new(1),
        start: 2_000,
    });
    c.bench_function("apply_rollback_single_move", |b| {
        b.iter(|| {
            let undo = state.apply(&model, std::hint::black_box(&batch));
            state.rollback(&model, undo);
        })
    });
}

criterion_group!(benches, bench_full_rebuild, bench_apply_rollback);
criterion_main!(benches);
