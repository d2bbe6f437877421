//! Benchmarks for building and recording catalogue tones.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tonegraph::{io::record::TRACKER_SAMPLE_RATE, voices, Synth};

pub fn bench_tones(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/tones");
    group.sample_size(10);

    for name in ["click", "cowbell", "peyow", "reese", "pad"] {
        let Some(tone) = voices::find(name) else {
            continue;
        };

        group.bench_with_input(BenchmarkId::new("build", name), &tone, |b, tone| {
            b.iter(|| {
                let mut synth = Synth::offline(TRACKER_SAMPLE_RATE);
                black_box((tone.build)(&mut synth))
            })
        });

        group.bench_with_input(BenchmarkId::new("record", name), &tone, |b, tone| {
            b.iter(|| black_box(tone.record(TRACKER_SAMPLE_RATE)))
        });
    }

    group.finish();
}
