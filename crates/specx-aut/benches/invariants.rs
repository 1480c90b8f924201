use criterion::{black_box, criterion_group, criterion_main, Criterion};
use specx_aut::{avg_clustering, count_triangles, spectral_radius};
use specx_core::rng::RngHandle;
use specx_graph::degseq::generate_fixed_sum;
use specx_graph::realize::greedy;

fn invariants_bench(c: &mut Criterion) {
    let mut rng = RngHandle::from_seed(99);
    let deg = generate_fixed_sum(150, 450, &mut rng, 2000).unwrap();
    let edges = greedy(deg.as_slice()).unwrap();
    let n = edges.n();
    let raw = edges.edges().to_vec();

    c.bench_function("spectral_radius_n150", |b| {
        b.iter(|| black_box(spectral_radius(n, &raw)));
    });

    c.bench_function("count_triangles_n150", |b| {
        b.iter(|| black_box(count_triangles(n, &raw)));
    });

    c.bench_function("avg_clustering_n150", |b| {
        b.iter(|| black_box(avg_clustering(n, &raw)));
    });
}

criterion_group!(benches, invariants_bench);
criterion_main!(benches);
