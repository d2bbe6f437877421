//! Rubberband: a sine whose pitch snaps from 146 Hz down to almost nothing
//! and wobbles back, through hard distortion and a resonant high-pass.
//!
//! # How It Works
//!
//! 1. Slide envelope on the sine's frequency: 146 Hz toward 0.73 over two
//!    seconds, holding at 1 Hz, released back up to 146
//! 2. Amplitude envelope swelling to 2.3, settling at 1.8
//! 3. Distortion at amount 55 turns the slow sine into a square-ish thud
//! 4. High-pass sweeping 1 kHz → 100 Hz → 1 kHz, Q 8
//! 5. Compressor with 4x makeup
//!
//! # Variations
//!
//! - Change the sweep's sustain for a different twang on release

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

pub fn rubberband(synth: &mut Synth) -> Result<Voice> {
    let voice = synth.voice(VoiceConfig::default())?;

    let slide = synth.envelope(
        Adsr {
            attack_time: 2.0,
            base: 146.0,
            attack_target: 0.73,
            sustain_level: 1.0,
            release_time: 1.0,
            ..Default::default()
        },
        voice,
    )?;
    let amp = synth.envelope(
        Adsr {
            attack_target: 2.3,
            sustain_level: 1.8,
            attack_time: 0.03,
            decay_time: 0.1,
            release_time: 0.1,
            ..Default::default()
        },
        voice,
    )?;
    let sine = synth.oscillator(OscillatorConfig {
        waveform: Waveform::Sine,
        frequency: slide.into(),
        scale: 0.5,
        gain: amp.into(),
        ..Default::default()
    })?;

    let distortion = synth.distortion(DistortionConfig {
        amount: 55.0,
        input: sine.into(),
        ..Default::default()
    })?;

    let sweep = synth.envelope(
        Adsr {
            start_delay: 0.01,
            base: 1000.0,
            attack_target: 100.0,
            sustain_level: 1000.0,
            attack_time: 0.21,
            decay_time: 0.1,
            release_time: 0.9,
            ..Default::default()
        },
        voice,
    )?;
    let filter = synth.filter(FilterConfig {
        kind: FilterType::HighPass,
        frequency: sweep.into(),
        q: Control::Value(8.0),
        gain: Control::Value(0.65),
        input: distortion.into(),
        ..Default::default()
    })?;

    let compressor = synth.compressor(CompressorConfig {
        gain: Control::Value(4.0),
        knee: Control::Value(4.0),
        input: filter.into(),
        ..Default::default()
    })?;
    synth.attach(compressor, voice, None)?;
    Ok(voice)
}
