//! Benchmarks for partitioned convolution and impulse response generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use rand::{rngs::StdRng, SeedableRng};
use tonegraph::{
    dsp::{
        convolver::Convolver,
        reverb::{impulse_response, ReverbParams},
    },
    RENDER_QUANTUM,
};

pub fn bench_convolver(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/convolver");
    let params = ReverbParams {
        fade_in: 0.1,
        decay: 1.0,
        subsample: 0.95,
        ..Default::default()
    };

    group.bench_function("impulse_response", |b| {
        let mut rng = StdRng::seed_from_u64(0);
        b.iter(|| impulse_response(&mut rng, black_box(&params), 16_574.0))
    });

    for decay in [0.25f32, 1.0] {
        let mut rng = StdRng::seed_from_u64(0);
        let ir = impulse_response(&mut rng, &ReverbParams { decay, ..params }, 16_574.0);
        let mut convolver = Convolver::new(&ir, true, RENDER_QUANTUM);
        let input: Vec<f32> = (0..RENDER_QUANTUM).map(|i| (i as f32 * 0.1).sin()).collect();
        let mut output = vec![0.0f32; RENDER_QUANTUM];

        group.bench_with_input(BenchmarkId::new("block", decay), &decay, |b, _| {
            b.iter(|| convolver.process(black_box(&input), &mut output))
        });
    }

    group.finish();
}
