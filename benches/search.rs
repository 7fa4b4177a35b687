use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use dev_utils::get_example_scenario;

fn find_routes_benchmark(c: &mut Criterion) {
    let (router, origin, destinations, profile, departure) = get_example_scenario();
    c.bench_function("find_routes", |b| {
        b.iter(|| router.find_routes(black_box(origin), black_box(&destinations), black_box(departure), black_box(profile), black_box(Some(8))))
    });
}

criterion_group!(benches, find_routes_benchmark);
criterion_main!(benches);
