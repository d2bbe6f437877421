//! Bass: a sliding sine with a noisy tail, low-passed and driven.
//!
//! # How It Works
//!
//! 1. Slide envelope: 146 Hz falling to 110 over 200 ms, so every note
//!    starts with a small downward bend
//! 2. Sine at half the slide, amplitude rising to 2 and settling at 1
//! 3. Noise fading in after 600 ms
//! 4. Low-pass at 2.8 kHz with a little resonance
//! 5. Distortion at amount 30 and a hard-kneed compressor
//!
//! The filter, the distortion and the compressor all feed the voice, so the
//! clean low-passed signal sits under the driven one.

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

pub fn bass(synth: &mut Synth) -> Result<Voice> {
    let voice = synth.voice(VoiceConfig::default())?;

    let slide = synth.envelope(
        Adsr {
            attack_time: 0.2,
            base: 146.0,
            attack_target: 110.0,
            sustain_level: 110.0,
            release_time: 1.0,
            ..Default::default()
        },
        voice,
    )?;
    let amp = synth.envelope(
        Adsr {
            attack_target: 2.0,
            sustain_level: 1.0,
            attack_time: 0.01,
            decay_time: 0.3,
            release_time: 0.05,
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

    let tail = synth.envelope(
        Adsr {
            start_delay: 0.6,
            attack_target: 0.01,
            sustain_level: 0.1,
            attack_time: 0.9,
            decay_time: 0.1,
            release_time: 0.1,
            ..Default::default()
        },
        voice,
    )?;
    let noise = synth.noise(NoiseConfig {
        gain: tail.into(),
        ..Default::default()
    })?;

    let filter = synth.filter(FilterConfig {
        kind: FilterType::LowPass,
        frequency: Control::Value(2800.0),
        q: Control::Value(2.0),
        input: [sine, noise].into(),
        ..Default::default()
    })?;
    let distortion = synth.distortion(DistortionConfig {
        amount: 30.0,
        input: filter.into(),
        ..Default::default()
    })?;
    let compressor = synth.compressor(CompressorConfig {
        knee: Control::Value(8.0),
        input: distortion.into(),
        ..Default::default()
    })?;

    synth.attach_from([filter, distortion, compressor], voice, None)?;
    Ok(voice)
}
