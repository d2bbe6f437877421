//! Benchmarks for the feed-forward compressor.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tonegraph::dsp::compressor::{Compressor, CompressorSettings};

use crate::BLOCK_SIZES;

pub fn bench_compressor(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/compressor");
    let settings = CompressorSettings::default();

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.02).sin()).collect();
        let mut output = vec![0.0f32; size];
        let mut compressor = Compressor::new();

        group.bench_with_input(BenchmarkId::new("default", size), &size, |b, _| {
            b.iter(|| {
                for (out, &sample) in output.iter_mut().zip(&input) {
                    *out = compressor.next_sample(black_box(sample), &settings, 48_000.0);
                }
            })
        });
    }

    group.finish();
}
