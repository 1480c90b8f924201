use criterion::{black_box, criterion_group, criterion_main, Criterion};
use specx_core::rng::RngHandle;
use specx_core::types::Mode;
use specx_graph::degseq::generate_fixed_sum;
use specx_graph::realize::greedy;
use specx_meta::{hill_climb, simulated_annealing};

fn hillclimb_bench(c: &mut Criterion) {
    let mut rng = RngHandle::from_seed(5);
    let deg = generate_fixed_sum(80, 200, &mut rng, 2000).unwrap();
    let start = greedy(deg.as_slice()).unwrap();

    c.bench_function("hill_climb_n80_2000it", |b| {
        b.iter(|| black_box(hill_climb(&start, Some(1), 2000, Mode::Min, false)));
    });

    c.bench_function("simulated_annealing_n80_2000it", |b| {
        b.iter(|| {
            black_box(simulated_annealing(&start, Some(1), 2000, 1.0, 0.001, Mode::Min, false))
        });
    });
}

criterion_group!(benches, hillclimb_bench);
criterion_main!(benches);
