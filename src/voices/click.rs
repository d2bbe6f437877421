//! Click: a 20 ms burst of band-passed noise.
//!
//! # How It Works
//!
//! 1. Noise with an envelope on its gain: instant attack, 20 ms decay to zero
//! 2. Band-pass around 2 kHz, wide (Q 0.8), doubled in level
//!
//! The note frequency is ignored. Bring the band-pass down for a duller
//! knock.

use crate::{
    dsp::filter::FilterType,
    error::Result,
    graph::{buffer::NoiseConfig, envelope::Adsr, filter::FilterConfig, Control},
    synth::{
        voice::{Voice, VoiceConfig},
        Synth,
    },
};

pub fn click(synth: &mut Synth) -> Result<Voice> {
    let voice = synth.voice(VoiceConfig::default())?;
    let envelope = synth.envelope(Adsr::new(0.0001, 0.02, 0.0, 0.0), voice)?;
    let noise = synth.noise(NoiseConfig {
        gain: envelope.into(),
        ..Default::default()
    })?;
    let filter = synth.filter(FilterConfig {
        kind: FilterType::BandPass,
        q: Control::Value(0.8),
        frequency: Control::Value(2000.0),
        gain: Control::Value(2.0),
        input: noise.into(),
        ..Default::default()
    })?;
    synth.attach(filter, voice, None)?;
    Ok(voice)
}
