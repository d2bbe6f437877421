//! Benchmarks for rendering kernels.

mod automation;
mod compressor;
mod convolver;
mod distortion;
mod filter;
mod oscillator;

pub use automation::bench_automation;
pub use compressor::bench_compressor;
pub use convolver::bench_convolver;
pub use distortion::bench_distortion;
pub use filter::bench_filter;
pub use oscillator::bench_oscillator;
