//! Benchmarks for rendering kernels and whole-tone renders.
//!
//! Run with: cargo bench
//!
//! Everything here renders offline, so the numbers matter for bake times
//! rather than real-time deadlines. For reference, one second of tracker
//! audio is 16574 samples; a full bake renders around twenty seconds.
//!
//! Benchmark groups:
//!   - dsp/*        Kernels (oscillator, filter, wave shaper, convolver, ...)
//!   - scenarios/*  Catalogue tones and module bakes

use criterion::{criterion_group, criterion_main};

mod dsp;
mod scenarios;

/// Block sizes; the renderer always runs 128.
pub const BLOCK_SIZES: &[usize] = &[128, 512, 2048];

criterion_group!(
    benches,
    dsp::bench_oscillator,
    dsp::bench_filter,
    dsp::bench_distortion,
    dsp::bench_compressor,
    dsp::bench_convolver,
    dsp::bench_automation,
    scenarios::bench_tones,
    scenarios::bench_bake,
);
criterion_main!(benches);
