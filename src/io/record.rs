//! Offline recording of a single note.
//!
//! A recording builds the instrument on a fresh offline synth, silences it,
//! plays one note at time zero, optionally releases it, and renders.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    engine::offline::OfflineRenderer,
    error::Result,
    synth::{factory::VoiceFactory, Synth, SynthConfig},
};

/// Sample rate of tracker samples played at C-2 on a PAL Amiga.
pub const TRACKER_SAMPLE_RATE: f32 = 16_574.0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSettings {
    pub sample_rate: f32,
    /// Seconds to render.
    pub duration: f64,
    /// Note frequency in Hz.
    pub frequency: f32,
    /// Release the note this long after it starts; hold it otherwise.
    pub release_after: Option<f64>,
    pub seed: u64,
}

impl Default for RecordSettings {
    fn default() -> Self {
        Self {
            sample_rate: TRACKER_SAMPLE_RATE,
            duration: 3.95,
            frequency: 440.0,
            release_after: None,
            seed: 0,
        }
    }
}

impl RecordSettings {
    /// Frames a recording of `duration` produces.
    pub fn frames(&self) -> usize {
        (self.duration.max(0.0) * self.sample_rate as f64).floor() as usize
    }
}

/// Record `settings.duration` seconds of one note.
pub fn record<F: VoiceFactory + ?Sized>(factory: &F, settings: &RecordSettings) -> Result<Vec<f32>> {
    record_frames(factory, settings, settings.frames())
}

/// Record exactly `frames` samples of one note.
pub fn record_frames<F: VoiceFactory + ?Sized>(
    factory: &F,
    settings: &RecordSettings,
    frames: usize,
) -> Result<Vec<f32>> {
    let config = SynthConfig {
        seed: settings.seed,
        ..Default::default()
    };
    let mut synth = Synth::with_config(OfflineRenderer::new(settings.sample_rate), config);
    let voice = factory.create_voice(&mut synth)?;

    let now = synth.now();
    synth.off(voice, now)?;
    synth.on(voice, now, settings.frequency)?;
    if let Some(release) = settings.release_after {
        synth.off(voice, now + release)?;
    }

    tracing::debug!(
        "Recording {} frames at {} Hz ({} units)",
        frames,
        settings.sample_rate,
        synth.units().len()
    );
    Ok(synth.backend_mut().render_frames(frames))
}
