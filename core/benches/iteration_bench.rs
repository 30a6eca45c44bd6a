use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;
use tinybench_core::{
    fixture::{DEFAULT_FIXTURE_LEN, DEFAULT_FIXTURE_SEED, Fixture},
    iteration::{visit_by_element, visit_by_index},
    perf::scenarios::prepare_loop_scenarios,
};

// Same fixture the `loops` command uses: one million uniform values.
fn bench_loop_scenarios(c: &mut Criterion) {
    let fixture = Arc::new(Fixture::random(DEFAULT_FIXTURE_LEN, DEFAULT_FIXTURE_SEED));
    let scenarios = prepare_loop_scenarios(Arc::clone(&fixture));

    let mut group = c.benchmark_group("loops");
    for scenario in &scenarios {
        group.bench_function(scenario.bench_case_name(), |b| {
            b.iter(|| black_box(scenario.run_checked().unwrap()))
        });
    }
    group.finish();
}

// Summing keeps the element read on the hot path.
fn bench_loop_sum(c: &mut Criterion) {
    let fixture = Fixture::random(DEFAULT_FIXTURE_LEN, DEFAULT_FIXTURE_SEED);

    c.bench_function("sum_by_index", |b| {
        b.iter(|| {
            let mut total = 0.0;
            visit_by_index(fixture.as_slice(), |v| total += *v);
            black_box(total)
        })
    });

    c.bench_function("sum_by_element", |b| {
        b.iter(|| {
            let mut total = 0.0;
            visit_by_element(fixture.as_slice(), |v| total += *v);
            black_box(total)
        })
    });
}

criterion_group!(benches, bench_loop_scenarios, bench_loop_sum);
criterion_main!(benches);
