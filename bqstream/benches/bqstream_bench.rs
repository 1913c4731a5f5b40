//! Benchmark tests for bqstream.
//!
//! Run with: cargo bench -p giztoy-bqstream

use std::thread;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use giztoy_bqstream::BufferQueueStream;

/// Benchmark: write followed by a single fast-path read_all.
fn bench_write_read_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_read_all");

    for size in [64, 256, 1024, 4096].iter() {
        let payload = vec![0u8; *size];
        let stream = BufferQueueStream::non_blocking();

        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                stream.write(&payload).unwrap();
                stream.read_all().unwrap()
            });
        });
    }

    group.finish();
}

/// Benchmark: several chunks spliced by one read.
fn bench_cross_chunk_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("cross_chunk_read");

    for chunks in [2usize, 8, 32].iter() {
        let payload = vec![0u8; 128];
        let stream = BufferQueueStream::non_blocking();
        let mut buf = vec![0u8; 128 * chunks];

        group.throughput(Throughput::Bytes(buf.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(chunks), chunks, |b, &chunks| {
            b.iter(|| {
                for _ in 0..chunks {
                    stream.write(&payload).unwrap();
                }
                stream.read(&mut buf).unwrap()
            });
        });
    }

    group.finish();
}

/// Benchmark: producer thread and blocking consumer.
fn bench_producer_consumer(c: &mut Criterion) {
    const CHUNKS: usize = 1000;
    const CHUNK_SIZE: usize = 256;

    let mut group = c.benchmark_group("producer_consumer");
    group.throughput(Throughput::Bytes((CHUNKS * CHUNK_SIZE) as u64));

    group.bench_function("blocking_1000x256", |b| {
        b.iter(|| {
            let stream = BufferQueueStream::blocking();
            let writer = stream.clone();
            let producer = thread::spawn(move || {
                let payload = [1u8; CHUNK_SIZE];
                for _ in 0..CHUNKS {
                    writer.write(&payload).unwrap();
                }
            });

            let mut buf = [0u8; 4096];
            let mut remaining = CHUNKS * CHUNK_SIZE;
            while remaining > 0 {
                let want = std::cmp::min(buf.len(), remaining);
                remaining -= stream.read_range(&mut buf, 0, want).unwrap();
            }
            producer.join().unwrap();
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_write_read_all,
    bench_cross_chunk_read,
    bench_producer_consumer
);
criterion_main!(benches);
