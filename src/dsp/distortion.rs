//! Distortion / Waveshaping
//!
//! Distortion adds harmonics by reshaping the waveform through a transfer
//! curve. The curve is a lookup table spanning inputs from -1 to 1; inputs
//! outside that range are clamped to the end points.
//!
//! # The Warming Curve
//!
//! ```text
//!   f(x) = (3 + a) · x · k / (π + a · |x|)        k = 20° in radians
//! ```
//!
//! A sigmoid: close to linear for small |x|, flattening as |x| grows. The
//! amount `a` controls how early it flattens:
//!
//!   0     = gentle, mostly linear
//!   50    = default, obvious warmth
//!   400+  = nearly a square-law clip
//!
//! The curve is odd (`f(-x) = -f(x)`), so it adds only odd harmonics and no
//! DC offset.

use std::f64::consts::PI;
use std::sync::Arc;

pub const DEFAULT_AMOUNT: f32 = 50.0;
pub const DEFAULT_CURVE_SIZE: usize = 8192;

/// Tabulate the warming curve with `size` entries at `x = 2i/size - 1`.
pub fn distortion_curve(amount: f32, size: usize) -> Vec<f32> {
    let amount = amount as f64;
    let k = 20.0 * PI / 180.0;
    (0..size)
        .map(|i| {
            let x = 2.0 * i as f64 / size as f64 - 1.0;
            ((3.0 + amount) * x * k / (PI + amount * x.abs())) as f32
        })
        .collect()
}

/// Maps samples through a transfer curve with linear interpolation.
#[derive(Debug, Clone)]
pub struct WaveShaper {
    curve: Arc<[f32]>,
}

impl WaveShaper {
    pub fn new(curve: Arc<[f32]>) -> Self {
        Self { curve }
    }

    pub fn curve(&self) -> &[f32] {
        &self.curve
    }

    #[inline]
    pub fn shape(&self, sample: f32) -> f32 {
        let n = self.curve.len();
        match n {
            0 => return sample,
            1 => return self.curve[0],
            _ => {}
        }

        let position = (n - 1) as f32 * 0.5 * (sample + 1.0);
        if position <= 0.0 {
            return self.curve[0];
        }
        if position >= (n - 1) as f32 {
            return self.curve[n - 1];
        }
        let index = position.floor() as usize;
        let frac = position - index as f32;
        self.curve[index] + (self.curve[index + 1] - self.curve[index]) * frac
    }

    pub fn process(&self, input: &[f32], output: &mut [f32]) {
        for (out, &sample) in output.iter_mut().zip(input) {
            *out = self.shape(sample);
        }
    }
}
