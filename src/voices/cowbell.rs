//! Cowbell, after the TR-808.
//!
//! Two square waves a little under a fifth apart, band-passed low so only a
//! metallic clank survives.
//!
//! # How It Works
//!
//! 1. Two squares: one at the note, one at 800/540 of it
//! 2. Band-pass at 350 Hz throws away most of both
//! 3. The envelope drives the filter's output gain: a 10 ms attack, then a
//!    10 ms auto-release pulse falling away over 100 ms
//!
//! # Variations
//!
//! - Raise the band-pass = thinner, more like an agogo
//! - Longer pulse = ringing bell

use crate::{
    dsp::{filter::FilterType, oscillator::Waveform},
    error::Result,
    graph::{
        envelope::Adsr,
        filter::FilterConfig,
        oscillator::OscillatorConfig,
        Control,
    },
    synth::{
        voice::{Voice, VoiceConfig},
        Synth,
    },
};

pub fn cowbell(synth: &mut Synth) -> Result<Voice> {
    let voice = synth.voice(VoiceConfig::default())?;

    let square = |scale| OscillatorConfig {
        waveform: Waveform::Square,
        frequency: voice.frequency.into(),
        scale,
        ..Default::default()
    };
    let low = synth.oscillator(square(1.0))?;
    let high = synth.oscillator(square(800.0 / 540.0))?;

    let adsr = Adsr {
        attack_time: 0.01,
        auto_pulse: 0.01,
        release_time: 0.1,
        ..Default::default()
    };
    let envelope = synth.envelope(adsr, voice)?;

    let filter = synth.filter(FilterConfig {
        kind: FilterType::BandPass,
        frequency: Control::Value(350.0),
        q: Control::Value(1.0),
        gain: envelope.into(),
        input: [low, high].into(),
        ..Default::default()
    })?;
    synth.attach(filter, voice, None)?;
    Ok(voice)
}
