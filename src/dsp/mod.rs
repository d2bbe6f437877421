//! Low-level DSP: the buffer synthesizers and the kernels the offline
//! renderer runs.
//!
//! The buffer synthesizers (`noise`, `pulse`, `spectrum`, `reverb`,
//! `distortion::distortion_curve`) are pure functions producing sample
//! arrays. The kernels keep only the state their math needs and are driven
//! one sample or one block at a time.

/// Sample buffers and the variable-rate buffer player.
pub mod buffer;
/// Feed-forward soft-knee compressor.
pub mod compressor;
/// Partitioned FFT convolution.
pub mod convolver;
/// Warming curve and the wave shaper that applies it.
pub mod distortion;
/// State-variable filter implementation with multiple responses.
pub mod filter;
/// Uniform white noise fill.
pub mod noise;
/// Oscillator waveforms and custom periodic waves.
pub mod oscillator;
/// DC-free pulse tables.
pub mod pulse;
/// Exponentially decaying noise impulse responses.
pub mod reverb;
/// Additive spectral tables for custom oscillators.
pub mod spectrum;

pub use buffer::AudioBuffer;
pub use oscillator::{PeriodicWave, Waveform};
