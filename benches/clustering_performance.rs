//! Benchmarks for density clustering and the full grouping pipeline.
//!
//! The distance matrix makes both quadratic in the number of items, so the
//! sizes stay near the recommended maximum.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use densegroup::{ClusterNamer, ClusteringParams, DensityClusterer, GroupingPipeline, Item};
use std::hint::black_box;

const DIMENSIONS: usize = 32;
const TITLES: [&str; 6] = [
    "Clinic Nurse",
    "Payroll Clerk",
    "Pipe Welder",
    "Legal Counsel",
    "Software Engineer",
    "Warehouse Picker",
];

/// Deterministic points scattered around one center per title.
fn generate_items(count: usize) -> Vec<Item> {
    let mut state = 0x9e37_79b9_7f4a_7c15u64;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state >> 11) as f64 / (1u64 << 53) as f64
    };

    (0..count)
        .map(|i| {
            let group = i % TITLES.len();
            let embedding = (0..DIMENSIONS)
                .map(|d| {
                    let center = if d % TITLES.len() == group { 4.0 } else { 0.0 };
                    center + next() - 0.5
                })
                .collect();
            Item::new(format!("item-{i}"), TITLES[group], embedding)
        })
        .collect()
}

fn benchmark_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("density_fit");
    group.sample_size(10);

    for size in [250, 500, 1000] {
        let items = generate_items(size);
        let embeddings: Vec<&[f64]> = items.iter().map(|item| item.embedding.as_slice()).collect();
        let clusterer = DensityClusterer::new(ClusteringParams::default());

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &embeddings, |b, embeddings| {
            b.iter(|| black_box(clusterer.fit(black_box(embeddings))))
        });
    }

    group.finish();
}

fn benchmark_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("grouping_pipeline");
    group.sample_size(10);

    let pipeline = GroupingPipeline::new(ClusteringParams::default(), ClusterNamer::default());
    for size in [500, 2000] {
        let items = generate_items(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &items, |b, items| {
            b.iter(|| black_box(pipeline.run(black_box(items))))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_fit, benchmark_pipeline);
criterion_main!(benches);
