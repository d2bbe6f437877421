//! Benchmarks for the wave shaper and curve generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tonegraph::dsp::distortion::{distortion_curve, WaveShaper, DEFAULT_CURVE_SIZE};

use crate::BLOCK_SIZES;

pub fn bench_distortion(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/distortion");

    group.bench_function("curve", |b| {
        b.iter(|| distortion_curve(black_box(50.0), DEFAULT_CURVE_SIZE))
    });

    let shaper = WaveShaper::new(distortion_curve(50.0, DEFAULT_CURVE_SIZE).into());
    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 * 0.05).sin() * 1.5)
            .collect();
        let mut output = vec![0.0f32; size];

        group.bench_with_input(BenchmarkId::new("shape", size), &size, |b, _| {
            b.iter(|| shaper.process(black_box(&input), &mut output))
        });
    }

    group.finish();
}
