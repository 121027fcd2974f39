//! Staged bulk import benchmarks.
//!
//! Measures insert and endpoint-keyed upsert imports into the in-memory
//! store across dataset sizes, isolating the stage-then-merge pipeline from
//! dataset parsing.
#![allow(missing_docs, reason = "Criterion macros generate undocumented items")]
#![allow(
    clippy::expect_used,
    reason = "benchmark setup is infallible for valid constants"
)]

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use grafbench_benches::{
    params::ImportBenchParams,
    stream::{EdgeStreamConfig, SyntheticEdgeStream},
};
use grafbench_core::{EdgeRecord, MergeKey, StagedBulkWriter};
use grafbench_providers_memory::MemoryStore;

/// Seed used for all synthetic data generation in this benchmark.
const SEED: u64 = 42;

/// Node range for synthetic datasets.
const NODE_COUNT: u64 = 100_000;

/// Dataset sizes to benchmark.
const EDGE_COUNTS: &[usize] = &[1_000, 10_000, 50_000];

/// Staged batch ceiling applied to every run.
const BATCH_SIZE: usize = 4_096;

fn dataset(edge_count: usize) -> Vec<EdgeRecord> {
    SyntheticEdgeStream::collect_records(&EdgeStreamConfig {
        edge_count,
        node_count: NODE_COUNT,
        seed: SEED,
    })
    .expect("dataset generation must succeed")
}

fn staged_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("staged_insert");

    for &edge_count in EDGE_COUNTS {
        let records = dataset(edge_count);
        let bench_params = ImportBenchParams {
            edge_count,
            batch_size: BATCH_SIZE,
        };
        group.throughput(Throughput::Elements(edge_count as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(&bench_params),
            &records,
            |b, records| {
                b.iter_batched(
                    || records.clone(),
                    |records| {
                        let mut store = MemoryStore::with_max_batch_size(BATCH_SIZE);
                        let mut stream = records.into_iter().map(Ok);
                        StagedBulkWriter::new(&mut store)
                            .insert_edges(&mut stream)
                            .expect("fresh import must succeed")
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

fn staged_upsert_over_populated_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("staged_upsert");

    for &edge_count in EDGE_COUNTS {
        let records = dataset(edge_count);
        let mut seeded = MemoryStore::with_max_batch_size(BATCH_SIZE);
        let mut seed_stream = records.clone().into_iter().map(Ok);
        StagedBulkWriter::new(&mut seeded)
            .insert_edges(&mut seed_stream)
            .expect("seed import must succeed");

        let bench_params = ImportBenchParams {
            edge_count,
            batch_size: BATCH_SIZE,
        };
        group.throughput(Throughput::Elements(edge_count as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(&bench_params),
            &(records, seeded),
            |b, (records, seeded)| {
                b.iter_batched(
                    || (records.clone(), seeded.clone()),
                    |(records, mut store)| {
                        let mut stream = records.into_iter().map(Ok);
                        StagedBulkWriter::new(&mut store)
                            .upsert_edges(&mut stream, MergeKey::Endpoints)
                            .expect("idempotent upsert must succeed")
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

criterion_group!(benches, staged_insert, staged_upsert_over_populated_store);
criterion_main!(benches);
