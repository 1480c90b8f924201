use specx_core::rng::RngHandle;
use specx_graph::degseq::generate_fixed_sum;
use specx_graph::realize::{backtracking, greedy, random_greedy};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn realize_bench(c: &mut Criterion) {
    let mut rng = RngHandle::from_seed(42);
    let deg = generate_fixed_sum(200, 600, &mut rng, 2000).unwrap();

    c.bench_function("realize_greedy_n200", |b| {
        b.iter(|| {
            black_box(greedy(deg.as_slice()).unwrap());
        });
    });

    c.bench_function("realize_random_greedy_n200", |b| {
        let mut rng = RngHandle::from_seed(7);
        b.iter(|| {
            black_box(random_greedy(deg.as_slice(), &mut rng).unwrap());
        });
    });

    let small_deg = generate_fixed_sum(16, 24, &mut rng, 2000).unwrap();
    c.bench_function("realize_backtracking_n16", |b| {
        let mut rng = RngHandle::from_seed(1);
        b.iter(|| {
            black_box(backtracking(small_deg.as_slice(), &mut rng, 2_000_000).ok());
        });
    });
}

criterion_group!(benches, realize_bench);
criterion_main!(benches);
