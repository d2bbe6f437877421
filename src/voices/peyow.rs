//! Peyow: the laser. A sine diving from 5 kHz to 220 Hz.
//!
//! # How It Works
//!
//! 1. Slide envelope on the sine's frequency: 5 kHz to 220 Hz over 200 ms
//! 2. Amplitude envelope with a 100 ms auto-release, so the zap ends by
//!    itself whatever the note length
//! 3. Compressor, knee 4 dB
//!
//! The note frequency is ignored.

use crate::{
    dsp::oscillator::Waveform,
    error::Result,
    graph::{
        compressor::CompressorConfig,
        envelope::Adsr,
        oscillator::OscillatorConfig,
        Control,
    },
    synth::{
        voice::{Voice, VoiceConfig},
        Synth,
    },
};

pub fn peyow(synth: &mut Synth) -> Result<Voice> {
    let voice = synth.voice(VoiceConfig::default())?;

    let slide = synth.envelope(
        Adsr {
            attack_time: 0.2,
            base: 5000.0,
            attack_target: 220.0,
            sustain_level: 1.0,
            release_time: 0.1,
            ..Default::default()
        },
        voice,
    )?;
    let amp = synth.envelope(
        Adsr {
            attack_target: 1.0,
            sustain_level: 1.8,
            attack_time: 1.0,
            decay_time: 1.0,
            release_time: 0.1,
            auto_pulse: 0.1,
            ..Default::default()
        },
        voice,
    )?;
    let sine = synth.oscillator(OscillatorConfig {
        waveform: Waveform::Sine,
        frequency: slide.into(),
        gain: amp.into(),
        ..Default::default()
    })?;

    let compressor = synth.compressor(CompressorConfig {
        knee: Control::Value(4.0),
        input: sine.into(),
        ..Default::default()
    })?;
    synth.attach(compressor, voice, None)?;
    Ok(voice)
}
