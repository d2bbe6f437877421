//! Convolution Reverb - Uniformly Partitioned FFT Convolution
//!
//! Direct convolution with a multi-second impulse response costs one
//! multiply per IR sample per output sample. Splitting the IR into blocks
//! and convolving each block in the frequency domain brings that down to a
//! handful of FFTs per block.
//!
//! ```text
//!   IR:     [ h0 | h1 | h2 | ... | hP ]        P partitions of B samples
//!   input:  ... x(m-2) | x(m-1) | x(m)         one block per call
//!
//!   Y(m) = X(m)·H0 + X(m-1)·H1 + ... + X(m-P)·HP   (spectra, 2B points)
//!   y(m) = first half of IFFT(Y(m)) + second half carried from y(m-1)
//! ```
//!
//! Every product `X·H` is zero-padded to 2B points, so the circular FFT
//! convolution equals the linear one and the overlap-add is exact.
//!
//! # Normalisation
//!
//! With `normalize` on, the response is scaled so that its loudness does not
//! depend on how the IR was generated: `0.00125 / rms(ir)` (floored at
//! an RMS of 0.000125), corrected for the IR's sample rate relative to
//! 44.1 kHz.

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::dsp::buffer::AudioBuffer;

const GAIN_CALIBRATION: f32 = 0.00125;
const MIN_POWER: f32 = 0.000125;
const REFERENCE_RATE: f32 = 44_100.0;

/// Scale factor applied to an IR when normalisation is requested.
pub fn normalization_scale(ir: &[f32], ir_sample_rate: f32) -> f32 {
    if ir.is_empty() {
        return 1.0;
    }
    let power = (ir.iter().map(|&s| s * s).sum::<f32>() / ir.len() as f32).sqrt();
    let mut scale = GAIN_CALIBRATION / power.max(MIN_POWER);
    if ir_sample_rate > 0.0 {
        scale *= REFERENCE_RATE / ir_sample_rate;
    }
    scale
}

pub struct Convolver {
    block: usize,
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
    partitions: Vec<Vec<Complex<f32>>>,
    /// Input spectra, most recent first.
    history: Vec<Vec<Complex<f32>>>,
    accumulator: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    overlap: Vec<f32>,
}

impl Convolver {
    /// Prepare a convolver for `ir` processing `block` samples per call.
    pub fn new(ir: &AudioBuffer, normalize: bool, block: usize) -> Self {
        let block = block.max(1);
        let size = 2 * block;
        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(size);
        let inverse = planner.plan_fft_inverse(size);

        let mut response = ir.mixdown();
        if normalize {
            let scale = normalization_scale(&response, ir.sample_rate());
            for sample in response.iter_mut() {
                *sample *= scale;
            }
        }

        let partitions: Vec<Vec<Complex<f32>>> = response
            .chunks(block)
            .map(|chunk| {
                let mut spectrum = vec![Complex::new(0.0, 0.0); size];
                for (bin, &sample) in spectrum.iter_mut().zip(chunk) {
                    bin.re = sample;
                }
                forward.process(&mut spectrum);
                spectrum
            })
            .collect();

        let history = vec![vec![Complex::new(0.0, 0.0); size]; partitions.len()];

        Self {
            block,
            forward,
            inverse,
            partitions,
            history,
            accumulator: vec![Complex::new(0.0, 0.0); size],
            scratch: vec![Complex::new(0.0, 0.0); size],
            overlap: vec![0.0; block],
        }
    }

    pub fn block_size(&self) -> usize {
        self.block
    }

    /// Convolve `input` into `output`, one block at a time.
    ///
    /// A trailing partial block is zero-padded.
    pub fn process(&mut self, input: &[f32], output: &mut [f32]) {
        for (inp, out) in input.chunks(self.block).zip(output.chunks_mut(self.block)) {
            self.process_block(inp, out);
        }
    }

    fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        if self.partitions.is_empty() {
            output.fill(0.0);
            return;
        }
        let size = 2 * self.block;

        // Oldest spectrum buffer is recycled for the newest input.
        self.history.rotate_right(1);
        let newest = &mut self.history[0];
        newest.fill(Complex::new(0.0, 0.0));
        for (bin, &sample) in newest.iter_mut().zip(input) {
            bin.re = sample;
        }
        self.forward.process(newest);

        self.accumulator.fill(Complex::new(0.0, 0.0));
        for (x, h) in self.history.iter().zip(&self.partitions) {
            for ((acc, &a), &b) in self.accumulator.iter_mut().zip(x).zip(h) {
                *acc += a * b;
            }
        }

        self.scratch.copy_from_slice(&self.accumulator);
        self.inverse.process(&mut self.scratch);

        let norm = 1.0 / size as f32;
        for (i, out) in output.iter_mut().enumerate() {
            *out = self.scratch[i].re * norm + self.overlap[i];
        }
        for (i, carry) in self.overlap.iter_mut().enumerate() {
            *carry = self.scratch[self.block + i].re * norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn direct(input: &[f32], ir: &[f32]) -> Vec<f32> {
        (0..input.len())
            .map(|n| {
                ir.iter()
                    .enumerate()
                    .filter(|(k, _)| *k <= n)
                    .map(|(k, &h)| h * input[n - k])
                    .sum()
            })
            .collect()
    }

    #[test]
    fn test_matches_direct_convolution() {
        let ir: Vec<f32> = (0..300).map(|i| ((i * 7) % 13) as f32 / 13.0 - 0.5).collect();
        let input: Vec<f32> = (0..1024).map(|i| ((i * 5) % 11) as f32 / 11.0 - 0.5).collect();

        let buffer = AudioBuffer::mono(48_000.0, ir.clone());
        let mut convolver = Convolver::new(&buffer, false, 128);
        let mut output = vec![0.0; input.len()];
        convolver.process(&input, &mut output);

        let expected = direct(&input, &ir);
        for (i, (got, want)) in output.iter().zip(&expected).enumerate() {
            assert!((got - want).abs() < 1e-3, "sample {i}: {got} vs {want}");
        }
    }

    #[test]
    fn test_unit_impulse_is_identity() {
        let buffer = AudioBuffer::mono(48_000.0, vec![1.0]);
        let mut convolver = Convolver::new(&buffer, false, 64);
        let input: Vec<f32> = (0..256).map(|i| (i as f32 * 0.1).sin()).collect();
        let mut output = vec![0.0; 256];
        convolver.process(&input, &mut output);

        for (got, want) in output.iter().zip(&input) {
            assert!((got - want).abs() < 1e-5);
        }
    }

    #[test]
    fn test_normalization_scale() {
        let ir = vec![0.5; 100];
        let scale = normalization_scale(&ir, 44_100.0);
        assert!((scale - 0.0025).abs() < 1e-7);

        let quiet = vec![0.0; 100];
        assert!((normalization_scale(&quiet, 22_050.0) - 20.0).abs() < 1e-4);
    }
}
