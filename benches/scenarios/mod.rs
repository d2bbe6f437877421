//! Whole-tone benchmarks: the work a recording or a bake actually does.

mod bake;
mod tones;

pub use bake::bench_bake;
pub use tones::bench_tones;
