//! Optical: a gritty sliding bass with a breath of noise.
//!
//! # How It Works
//!
//! 1. A slide envelope drives the sine's frequency: 146 Hz up toward 78 over
//!    two seconds, settling at 390 and falling back to 146 on release
//! 2. The sine plays at half that, its gain swelling past 1 and settling
//!    at 1.8
//! 3. Noise fades in after 400 ms underneath
//! 4. Both go through heavy distortion
//! 5. A resonant high-pass sweeping from 2 kHz down to 50 Hz and back up to
//!    3.2 kHz carves what is left
//! 6. Compressor with 4x makeup
//!
//! The note frequency is ignored; the slide envelope sets the pitch.

use crate::{
    dsp::{filter::FilterType, oscillator::Waveform},
    error::Result,
    graph::{
        buffer::NoiseConfig,
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

pub fn optical(synth: &mut Synth) -> Result<Voice> {
    let voice = synth.voice(VoiceConfig::default())?;

    let slide = synth.envelope(
        Adsr {
            attack_time: 2.0,
            base: 146.0,
            attack_target: 78.0,
            sustain_level: 390.0,
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

    let breath = synth.envelope(
        Adsr {
            start_delay: 0.4,
            attack_target: 0.01,
            sustain_level: 0.05,
            attack_time: 1.0,
            decay_time: 0.1,
            release_time: 0.1,
            ..Default::default()
        },
        voice,
    )?;
    let noise = synth.noise(NoiseConfig {
        gain: breath.into(),
        ..Default::default()
    })?;

    let distortion = synth.distortion(DistortionConfig {
        amount: 4.0,
        gain: Control::Value(4.0),
        input: [sine, noise].into(),
        ..Default::default()
    })?;

    let sweep = synth.envelope(
        Adsr {
            start_delay: 0.01,
            base: 2000.0,
            attack_target: 50.0,
            sustain_level: 3200.0,
            attack_time: 0.4,
            decay_time: 0.1,
            release_time: 0.5,
            ..Default::default()
        },
        voice,
    )?;
    let filter = synth.filter(FilterConfig {
        kind: FilterType::HighPass,
        frequency: sweep.into(),
        q: Control::Value(10.0),
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
