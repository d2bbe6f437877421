//! Benchmarks for parameter automation: filling a block from an envelope's
//! worth of events.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tonegraph::engine::automation::{Automation, ParamEvent};

use crate::BLOCK_SIZES;

pub fn bench_automation(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/automation");

    let mut envelope = Automation::new(0.0);
    envelope.insert(ParamEvent::SetValue { value: 0.0, time: 0.0 });
    envelope.insert(ParamEvent::SetTarget { target: 1.0, start_time: 0.0, time_constant: 0.01 });
    envelope.insert(ParamEvent::SetTarget { target: 0.5, start_time: 0.03, time_constant: 0.05 });
    envelope.insert(ParamEvent::LinearRamp { value: 0.2, end_time: 0.5 });
    envelope.insert(ParamEvent::ExponentialRamp { value: 0.01, end_time: 1.0 });

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];
        group.bench_with_input(BenchmarkId::new("fill", size), &size, |b, _| {
            let mut frame = 0u64;
            b.iter(|| {
                envelope.fill(black_box(frame), 48_000.0, &mut buffer);
                frame = (frame + size as u64) % 48_000;
            })
        });
    }

    group.finish();
}
