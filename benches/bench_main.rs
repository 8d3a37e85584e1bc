use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use lzf::{decode, encode};
use std::hint::black_box;

/// Generates pseudo-random bytes from a deterministic Linear Congruential
/// Generator so runs are reproducible. High-entropy data is the worst case
/// for the encoder: every chunk falls back to verbatim storage.
fn generate_random(size: usize) -> Vec<u8> {
    let mut vec = Vec::with_capacity(size);
    let mut seed: u64 = 0xDEAD_BEEF;
    for _ in 0..size {
        seed = (seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223)) & 0xFFFF_FFFF;
        vec.push((seed >> 24) as u8);
    }
    vec
}

/// Generates repeated English text, representative of logs and JSON.
fn generate_text(size: usize) -> Vec<u8> {
    let text = b"The quick brown fox jumps over the lazy dog. ";
    let mut vec = Vec::with_capacity(size);
    while vec.len() < size {
        vec.extend_from_slice(text);
    }
    vec.truncate(size);
    vec
}

/// Generates all zeroes, the best case: long overlapping back-references.
fn generate_zeroes(size: usize) -> Vec<u8> {
    vec![0u8; size]
}

/// Encoder throughput over the three corpus shapes at a 64KB block size.
fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("LZF Encode");

    let size = 64 * 1024;

    let scenarios = [
        ("Zeroes", generate_zeroes(size)),
        ("Random", generate_random(size)),
        ("Text", generate_text(size)),
    ];

    for (name, input_data) in &scenarios {
        let bench_name = format!("{name} 64KB");

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_function(&bench_name, |b| {
            b.iter(|| encode(black_box(input_data)).unwrap());
        });
    }

    group.finish();
}

/// Decoder throughput, measured against the uncompressed size so the rate
/// reflects data restored rather than wire bytes read.
fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("LZF Decode");
    let size = 64 * 1024;

    let scenarios = [
        ("Zeroes", generate_zeroes(size)),
        ("Random", generate_random(size)),
        ("Text", generate_text(size)),
    ];

    for (name, source_data) in &scenarios {
        let framed = encode(source_data).unwrap();

        let bench_name = format!("{name} 64KB");

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_function(&bench_name, |b| {
            b.iter(|| decode(black_box(&framed)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
