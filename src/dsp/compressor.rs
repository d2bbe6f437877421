//! Dynamics Compressor
//!
//! Turns loud passages down so the overall level is more even.
//!
//! # Gain Computer
//!
//! Working in dB, with threshold T, knee width W and ratio R:
//!
//! ```text
//!   out dB
//!     │            ___----      slope 1/R above the knee
//!     │       _.-‾‾
//!     │     /                   quadratic blend inside the knee
//!     │   /
//!     │ /                       slope 1 below the knee
//!     └──────────┬───────── in dB
//!           T-W/2 T+W/2
//! ```
//!
//! The difference between the curve and the input level is the gain to
//! apply. It is smoothed with a one-pole filter that reacts with the attack
//! time when the gain must drop and with the release time when it may rise.
//!
//! # Makeup
//!
//! The compressed signal is boosted by 60% of the reduction a full-scale
//! signal would receive, so heavy settings do not simply make everything
//! quieter.

const MIN_LEVEL_DB: f32 = -120.0;

/// Per-sample settings, in Web Audio units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressorSettings {
    /// dB, -100..=0.
    pub threshold: f32,
    /// dB, 0..=40.
    pub knee: f32,
    /// 1..=20.
    pub ratio: f32,
    /// Seconds, 0..=1.
    pub attack: f32,
    /// Seconds, 0..=1.
    pub release: f32,
}

impl Default for CompressorSettings {
    fn default() -> Self {
        Self {
            threshold: -24.0,
            knee: 30.0,
            ratio: 12.0,
            attack: 0.003,
            release: 0.25,
        }
    }
}

impl CompressorSettings {
    fn clamped(self) -> Self {
        Self {
            threshold: self.threshold.clamp(-100.0, 0.0),
            knee: self.knee.clamp(0.0, 40.0),
            ratio: self.ratio.clamp(1.0, 20.0),
            attack: self.attack.clamp(0.0, 1.0),
            release: self.release.clamp(0.0, 1.0),
        }
    }

    /// Static output level for an input level, both in dB.
    pub fn curve(&self, level_db: f32) -> f32 {
        let CompressorSettings { threshold, knee, ratio, .. } = self.clamped();
        let over = level_db - threshold;
        if 2.0 * over < -knee {
            level_db
        } else if knee > 0.0 && 2.0 * over.abs() <= knee {
            let x = over + knee / 2.0;
            level_db + (1.0 / ratio - 1.0) * x * x / (2.0 * knee)
        } else {
            threshold + over / ratio
        }
    }

    /// Makeup gain in dB.
    pub fn makeup(&self) -> f32 {
        -0.6 * self.curve(0.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Compressor {
    /// Smoothed gain change in dB (<= 0).
    gain_db: f32,
}

impl Compressor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current gain reduction in dB (zero or negative).
    pub fn reduction(&self) -> f32 {
        self.gain_db
    }

    #[inline]
    pub fn next_sample(&mut self, sample: f32, settings: &CompressorSettings, sample_rate: f32) -> f32 {
        let settings = settings.clamped();
        let level_db = if sample.abs() > 0.0 {
            (20.0 * sample.abs().log10()).max(MIN_LEVEL_DB)
        } else {
            MIN_LEVEL_DB
        };
        let target = settings.curve(level_db) - level_db;

        let time = if target < self.gain_db { settings.attack } else { settings.release };
        let coefficient = if time > 0.0 {
            (-1.0 / (time * sample_rate)).exp()
        } else {
            0.0
        };
        self.gain_db = coefficient * self.gain_db + (1.0 - coefficient) * target;

        sample * 10f32.powf((self.gain_db + settings.makeup()) / 20.0)
    }
}
