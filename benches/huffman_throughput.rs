//! Compression and decompression throughput.
//!
//! Run with: `cargo bench --bench huffman_throughput`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use huffpack::{compress, decompress, HuffmanCodec};

/// Text-like data with a skewed byte distribution.
fn generate_text(size: usize) -> Vec<u8> {
    let phrases: &[&[u8]] = &[
        b"The quick brown fox jumps over the lazy dog. ",
        b"Pack my box with five dozen liquor jugs! ",
        b"How vexingly quick daft zebras jump!! ",
    ];
    let mut data = Vec::with_capacity(size);
    let mut i = 0;
    while data.len() < size {
        data.extend_from_slice(phrases[i % phrases.len()]);
        i += 1;
    }
    data.truncate(size);
    data
}

fn bench_compress(c: &mut Criterion) {
    let mut group = c.benchmark_group("compress");
    for size in [1024, 64 * 1024, 1024 * 1024] {
        let data = generate_text(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| compress(black_box(data)))
        });
    }
    group.finish();
}

fn bench_decompress(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompress");
    for size in [1024, 64 * 1024, 1024 * 1024] {
        let artifact = compress(&generate_text(size)).unwrap();
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &artifact, |b, artifact| {
            b.iter(|| decompress(black_box(artifact)))
        });
    }
    group.finish();
}

fn bench_tree_build(c: &mut Criterion) {
    let data: Vec<u8> = (0..=255u8).flat_map(|b| vec![b; 1 + b as usize]).collect();
    c.bench_function("build codec 256 symbols", |b| {
        b.iter(|| HuffmanCodec::from_bytes(black_box(&data)))
    });
}

criterion_group!(benches, bench_compress, bench_decompress, bench_tree_build);
criterion_main!(benches);
