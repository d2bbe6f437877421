//! Reverb - Impulse Responses from Decaying Noise
//!
//! Instead of simulating a room with delay networks, the convolution reverb
//! is fed a synthetic impulse response: white noise under an exponential
//! envelope that falls by 60 dB over the decay time.
//!
//! # Envelope
//!
//! ```text
//! amplitude
//!   1 ┤╲
//!     │ ╲
//!     │  ╲__
//! 1e-3┤     ‾‾‾‾───___            (-60 dB at decay_samples)
//!     └──────────┬────────┬──→
//!                D      1.5·D     samples
//! ```
//!
//! The buffer runs 50% past the decay time so the tail reaches about -90 dB
//! before it is cut.
//!
//! - **decay_base**: `1e-3 ^ (1 / decay_samples)`, the per-sample factor
//! - **subsample**: probability that a sample is left at zero; sparse
//!   responses sound grainier
//! - **fade_in**: linear ramp at the start, softening the onset
//!
//! Every channel draws from its own RNG, seeded from the caller's generator,
//! so the channels are decorrelated and the result does not depend on the
//! order they are filled in.

use rand::{rngs::StdRng, Rng, SeedableRng};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::buffer::AudioBuffer;

/// Parameters of a synthetic impulse response.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbParams {
    /// Seconds of linear fade-in.
    pub fade_in: f32,
    /// Seconds to fall 60 dB.
    pub decay: f32,
    /// Probability in `[0, 1]` that a sample is zero.
    pub subsample: f32,
    pub channels: usize,
}

impl Default for ReverbParams {
    fn default() -> Self {
        Self {
            fade_in: 0.0,
            decay: 1.0,
            subsample: 0.0,
            channels: 2,
        }
    }
}

/// Generate an impulse response at `sample_rate`.
pub fn impulse_response<R: Rng + ?Sized>(
    rng: &mut R,
    params: &ReverbParams,
    sample_rate: f32,
) -> AudioBuffer {
    let sr = sample_rate as f64;
    let decay = params.decay.max(0.0) as f64;
    let len = (1.5 * decay * sr).floor() as usize;
    let decay_samples = ((decay * sr).floor() as usize).max(1);
    let fade_in_samples = (params.fade_in.max(0.0) as f64 * sr).floor() as usize;
    let decay_base = 1e-3f64.powf(1.0 / decay_samples as f64);
    let subsample = params.subsample.max(0.0);

    let seeds: Vec<u64> = (0..params.channels).map(|_| rng.gen()).collect();

    let channels = seeds
        .into_iter()
        .map(|seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut envelope = 1.0f64;
            let mut channel: Vec<f32> = (0..len)
                .map(|_| {
                    let gate: f32 = rng.gen();
                    let value = if gate > subsample {
                        rng.gen_range(-1.0f64..=1.0) * envelope
                    } else {
                        0.0
                    };
                    envelope *= decay_base;
                    value as f32
                })
                .collect();

            for (i, sample) in channel.iter_mut().take(fade_in_samples).enumerate() {
                *sample *= i as f32 / fade_in_samples as f32;
            }
            channel
        })
        .collect();

    AudioBuffer::new(sample_rate, channels)
}
