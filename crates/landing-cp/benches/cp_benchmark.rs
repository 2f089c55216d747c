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

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use landing_cp::{
    branching::strategy::{BranchingRule, SearchStrategy, ValueRule},
    monitor::no_op::NoOperationMonitor,
    solver::CpSolver,
};
use landing_model::{
    index::{AircraftIndex, ClassIndex},
    model::{Model, ModelBuilder},
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::hint::black_box;

/// Builds an instance with staggered windows and three separation classes,
/// roughly shaped like the OR-Library airland files.
fn build_instance(seed: u64, num_runways: usize, num_aircraft: usize) -> Model<i64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut builder = ModelBuilder::<i64>::new(num_runways, num_aircraft, 3);

    for i in 0..num_aircraft {
        let a = AircraftIndex::new(i);
        let earliest = (i as i64) * 6 + rng.random_range(0..6);
        let target = earliest + rng.random_range(2..10);
        let latest = target + rng.random_range(10..30);
        builder
            .set_landing_window(a, earliest, target, latest)
            .set_penalties(a, rng.random_range(1..5), rng.random_range(2..8))
            .set_aircraft_class(a, ClassIndex::new(rng.random_range(0..3)));
    }

    let table = [[3, 4, 5], [2, 3, 4], [2, 2, 3]];
    for (leading, row) in table.iter().enumerate() {
        for (trailing, &gap) in row.iter().enumerate() {
            builder.set_separation(ClassIndex::new(leading), ClassIndex::new(trailing), gap);
        }
    }

    builder
        .build()
        .unwrap_or_else(|e| panic!("benchmark instance is invalid: {}", e))
}

fn bench_strategies(c: &mut Criterion) {
    let strategies = [
        SearchStrategy::new(BranchingRule::MostConstrained, ValueRule::EarliestFeasible),
        SearchStrategy::new(BranchingRule::EarliestDeadline, ValueRule::TargetClosest),
        SearchStrategy::new(BranchingRule::HighestPenaltyImpact, ValueRule::Randomized)
            .with_seed(1),
    ];

    let mut group = c.benchmark_group("cp_benchmark");
    for (num_runways, num_aircraft) in [(1, 8), (2, 8), (2, 10)] {
        let model = build_instance(42, num_runways, num_aircraft);
        let mut solver = CpSolver::preallocated(num_runways, num_aircraft);
        group.throughput(Throughput::Elements(num_aircraft as u64));

        for strategy in strategies {
            let label = format!("{}r{}a", num_runways, num_aircraft);
            group.bench_with_input(
                BenchmarkId::new(label, strategy),
                &strategy,
                |b, &strategy| {
                    b.iter(|| {
                        let outcome = solver.solve(
                            black_box(&model),
                            strategy,
                            NoOperationMonitor::new(),
                        );
                        black_box(outcome.status())
                    })
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_strategies);
criterion_main!(benches);
