//! Reese bass.
//!
//! A stack of detuned saws over a square and a sub sine, lightly driven and
//! low-passed. The saws a few percent either side of the note beat against
//! each other, which is the whole point.
//!
//! # How It Works
//!
//! 1. Square an octave down, saw at the note, two quiet saws at ±3%
//! 2. Sine sub an octave down
//! 3. Gentle distortion glues the stack together
//! 4. Low-pass at 250 Hz, its gain driven by a slow (1.8 s) auto-release
//!    envelope
//! 5. Compressor with 5x makeup brings the level back up

use crate::{
    dsp::{filter::FilterType, oscillator::Waveform},
    error::Result,
    graph::{
        compressor::CompressorConfig,
        distortion::DistortionConfig,
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

pub fn reese(synth: &mut Synth) -> Result<Voice> {
    let voice = synth.voice(VoiceConfig::default())?;

    let mut stack = Vec::new();
    for (waveform, scale, gain) in [
        (Waveform::Square, 0.5, 0.8),
        (Waveform::Sawtooth, 1.0, 0.9),
        (Waveform::Sine, 0.5, 0.95),
        (Waveform::Sawtooth, 1.03, 0.2),
        (Waveform::Sawtooth, 0.97, 0.2),
    ] {
        stack.push(synth.oscillator(OscillatorConfig {
            waveform,
            frequency: voice.frequency.into(),
            scale,
            gain: Control::Value(gain),
            ..Default::default()
        })?);
    }

    let adsr = Adsr {
        attack_time: 0.01,
        auto_pulse: 1.8,
        release_time: 0.1,
        ..Default::default()
    };
    let envelope = synth.envelope(adsr, voice)?;

    let distortion = synth.distortion(DistortionConfig {
        amount: 0.1,
        input: stack.into(),
        ..Default::default()
    })?;
    let filter = synth.filter(FilterConfig {
        kind: FilterType::LowPass,
        frequency: Control::Value(250.0),
        q: Control::Value(0.0),
        gain: envelope.into(),
        input: distortion.into(),
        ..Default::default()
    })?;
    let compressor = synth.compressor(CompressorConfig {
        gain: Control::Value(5.0),
        knee: Control::Value(2.0),
        input: filter.into(),
        ..Default::default()
    })?;
    synth.attach(compressor, voice, None)?;
    Ok(voice)
}
