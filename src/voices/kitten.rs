//! Kitten: a saw under a slowly opening, very resonant low-pass. Sounds a
//! bit like a mewl.
//!
//! # How It Works
//!
//! 1. Sawtooth an octave below the note
//! 2. Low-pass cutoff envelope: 2 Hz rising to 16 kHz over five seconds,
//!    so the recording only hears the first slow part of the sweep
//! 3. Q 5 makes the moving cutoff sing
//! 4. One second fade in and out

use crate::{
    dsp::{filter::FilterType, oscillator::Waveform},
    error::Result,
    graph::{
        amplify::GainConfig,
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

pub fn kitten(synth: &mut Synth) -> Result<Voice> {
    let voice = synth.voice(VoiceConfig {
        gain: Control::Value(1.0),
        ..Default::default()
    })?;

    let saw = synth.oscillator(OscillatorConfig {
        waveform: Waveform::Sawtooth,
        frequency: voice.frequency.into(),
        scale: 0.5,
        ..Default::default()
    })?;

    let sweep = synth.envelope(
        Adsr {
            base: 2.0,
            attack_time: 5.0,
            attack_target: 16_000.0,
            decay_time: 3.0,
            sustain_level: 10.0,
            release_time: 1.0,
            ..Default::default()
        },
        voice,
    )?;
    let filter = synth.filter(FilterConfig {
        kind: FilterType::LowPass,
        frequency: sweep.into(),
        q: Control::Value(5.0),
        input: saw.into(),
        ..Default::default()
    })?;

    let level = synth.envelope(Adsr::new(1.0, 0.0, 1.0, 1.0), voice)?;
    let amp = synth.gain(GainConfig {
        gain: level.into(),
        input: filter.into(),
    })?;
    synth.attach(amp, voice, None)?;
    Ok(voice)
}
