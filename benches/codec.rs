//! Benchmarks for container compression and decompression.
//!
//! Run with: `cargo bench --bench codec`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use huffpack::{compress_bytes, decompress_bytes, FrequencyTable, HuffmanTree};

/// Text-like data: a few phrases with a sprinkling of other bytes.
fn generate_test_data(size: usize) -> Vec<u8> {
    let phrases: &[&[u8]] = &[
        b"The quick brown fox jumps over the lazy dog. ",
        b"Pack my box with five dozen liquor jugs! ",
        b"How vexingly quick daft zebras jump!! ",
    ];
    let mut data = Vec::with_capacity(size);
    let mut i = 0usize;
    while data.len() < size {
        data.extend_from_slice(phrases[i % phrases.len()]);
        data.push((i * 37 % 256) as u8);
        i += 1;
    }
    data.truncate(size);
    data
}

fn bench_compress(c: &mut Criterion) {
    let mut group = c.benchmark_group("compress");
    for size in [1024usize, 64 * 1024, 1024 * 1024] {
        let data = generate_test_data(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| compress_bytes(black_box(data)).unwrap())
        });
    }
    group.finish();
}

fn bench_decompress(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompress");
    for size in [1024usize, 64 * 1024, 1024 * 1024] {
        let packed = compress_bytes(&generate_test_data(size)).unwrap();
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &packed, |b, packed| {
            b.iter(|| decompress_bytes(black_box(packed)).unwrap())
        });
    }
    group.finish();
}

fn bench_tree_build(c: &mut Criterion) {
    let all: Vec<u8> = (0..=255u8).cycle().take(64 * 1024).collect();
    let freqs = FrequencyTable::from_bytes(&all);
    c.bench_function("tree_build_256_symbols", |b| {
        b.iter(|| HuffmanTree::from_frequencies(black_box(&freqs)))
    });
}

criterion_group!(benches, bench_compress, bench_decompress, bench_tree_build);
criterion_main!(benches);
