//! Benchmarks for the biquad-equivalent state-variable filter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tonegraph::dsp::filter::{FilterType, SVFilter};

use crate::BLOCK_SIZES;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        // Sawtooth-like ramp
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        for (name, kind) in [
            ("lowpass", FilterType::LowPass),
            ("highpass", FilterType::HighPass),
            ("bandpass", FilterType::BandPass),
            ("peaking", FilterType::Peaking),
        ] {
            let mut filter = SVFilter::new(kind);
            let mut buffer = input.clone();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    filter.render(black_box(&mut buffer), 1000.0, 1.0, 6.0, 48_000.0);
                })
            });
        }
    }

    group.finish();
}
