//! Oscillators
//!
//! Four fixed shapes plus custom periodic waves built from Fourier
//! coefficients.
//!
//! ```text
//!   Sine      Square      Sawtooth     Triangle
//!   ╭─╮       ┌──┐         /│   /│       /\
//!  ─╯ ╰─╭─    │  │        / │  / │      /  \  /
//!       ╰╯    ┘  └──     /  │ /  │     /    \/
//! ```
//!
//! Square and sawtooth have hard discontinuities that alias badly when
//! sampled naively. PolyBLEP smooths each step with a two-sample polynomial
//! residual, which removes most of the audible aliasing at no real cost.
//!
//! Custom waves are described by cosine (`real`) and sine (`imag`)
//! coefficients per harmonic, rendered once into a single-cycle table via an
//! inverse FFT and normalised to a peak of 1.

use std::{f64::consts::TAU, sync::Arc};

use rustfft::{num_complex::Complex, FftPlanner};

/// Fourier description of one cycle: `real[k]` and `imag[k]` are the cosine
/// and sine amplitudes of harmonic `k`. The DC term (index 0) is ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodicWave {
    real: Vec<f32>,
    imag: Vec<f32>,
}

impl PeriodicWave {
    /// The shorter array is zero-extended to the length of the longer.
    pub fn new(mut real: Vec<f32>, mut imag: Vec<f32>) -> Self {
        let len = real.len().max(imag.len());
        real.resize(len, 0.0);
        imag.resize(len, 0.0);
        Self { real, imag }
    }

    pub fn real(&self) -> &[f32] {
        &self.real
    }

    pub fn imag(&self) -> &[f32] {
        &self.imag
    }

    pub fn harmonics(&self) -> usize {
        self.real.len()
    }
}

#[derive(Debug, Clone, Default)]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Sawtooth,
    Triangle,
    Custom(Arc<PeriodicWave>),
}

const MIN_TABLE_SIZE: usize = 2048;

/// One cycle of a custom wave, sampled.
#[derive(Debug, Clone)]
pub struct WaveTable {
    samples: Vec<f32>,
}

impl WaveTable {
    pub fn from_periodic_wave(wave: &PeriodicWave) -> Self {
        let size = (2 * wave.harmonics() + 2).next_power_of_two().max(MIN_TABLE_SIZE);

        let mut spectrum = vec![Complex::new(0.0f32, 0.0); size];
        for k in 1..wave.harmonics().min(size / 2) {
            let coefficient = Complex::new(wave.real[k] * 0.5, -wave.imag[k] * 0.5);
            spectrum[k] = coefficient;
            spectrum[size - k] = coefficient.conj();
        }

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_inverse(size);
        fft.process(&mut spectrum);

        let mut samples: Vec<f32> = spectrum.iter().map(|c| c.re).collect();
        let peak = samples.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
        if peak > 0.0 {
            for sample in samples.iter_mut() {
                *sample /= peak;
            }
        }

        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Linearly interpolated lookup at `phase` in `[0, 1)`.
    #[inline]
    pub fn lookup(&self, phase: f64) -> f32 {
        let len = self.samples.len();
        if len == 0 {
            return 0.0;
        }
        let position = phase * len as f64;
        let index = position.floor() as usize % len;
        let frac = (position - position.floor()) as f32;
        let a = self.samples[index];
        let b = self.samples[(index + 1) % len];
        a + (b - a) * frac
    }
}

/// PolyBLEP residual for a unit step at phase 0.
///
/// `t` is the phase in `[0, 1)`, `dt` the phase increment per sample.
#[inline]
pub fn poly_blep(t: f64, dt: f64) -> f64 {
    if dt <= 0.0 {
        return 0.0;
    }
    if t < dt {
        let x = t / dt;
        2.0 * x - x * x - 1.0
    } else if t > 1.0 - dt {
        let x = (t - 1.0) / dt;
        x * x + 2.0 * x + 1.0
    } else {
        0.0
    }
}

enum Shape {
    Sine,
    Square,
    Sawtooth,
    Triangle,
    Table(WaveTable),
}

/// Phase-accumulating oscillator.
pub struct Oscillator {
    shape: Shape,
    phase: f64,
}

impl Oscillator {
    pub fn new(waveform: &Waveform) -> Self {
        let shape = match waveform {
            Waveform::Sine => Shape::Sine,
            Waveform::Square => Shape::Square,
            Waveform::Sawtooth => Shape::Sawtooth,
            Waveform::Triangle => Shape::Triangle,
            Waveform::Custom(wave) => Shape::Table(WaveTable::from_periodic_wave(wave)),
        };
        Self { shape, phase: 0.0 }
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Produce one sample at `frequency` Hz and advance the phase.
    #[inline]
    pub fn next_sample(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        let increment = frequency as f64 / sample_rate as f64;
        let dt = increment.abs().min(0.5);
        let t = self.phase;

        let value = match &self.shape {
            Shape::Sine => (TAU * t).sin(),
            Shape::Square => {
                let naive = if t < 0.5 { 1.0 } else { -1.0 };
                naive + poly_blep(t, dt) - poly_blep((t + 0.5).rem_euclid(1.0), dt)
            }
            Shape::Sawtooth => 2.0 * t - 1.0 - poly_blep(t, dt),
            Shape::Triangle => 1.0 - 4.0 * ((t + 0.25).rem_euclid(1.0) - 0.5).abs(),
            Shape::Table(table) => table.lookup(t) as f64,
        };

        self.phase = (self.phase + increment).rem_euclid(1.0);
        value as f32
    }
}
