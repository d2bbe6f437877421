//! Benchmarks for oscillators: band-limited basics and wavetables.

use std::{hint::black_box, sync::Arc};

use criterion::{BenchmarkId, Criterion};
use tonegraph::dsp::oscillator::{Oscillator, PeriodicWave, Waveform};

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    let custom = Waveform::Custom(Arc::new(PeriodicWave::new(
        vec![0.0; 32],
        (0..32).map(|n| if n == 0 { 0.0 } else { 1.0 / n as f32 }).collect(),
    )));
    let waveforms = [
        ("sine", Waveform::Sine),
        ("square", Waveform::Square),
        ("sawtooth", Waveform::Sawtooth),
        ("triangle", Waveform::Triangle),
        ("custom", custom),
    ];

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for (name, waveform) in &waveforms {
            let mut osc = Oscillator::new(waveform);
            group.bench_with_input(BenchmarkId::new(*name, size), &size, |b, _| {
                b.iter(|| {
                    for sample in buffer.iter_mut() {
                        *sample = osc.next_sample(black_box(440.0), 48_000.0);
                    }
                    black_box(&buffer);
                })
            });
        }
    }

    group.finish();
}
