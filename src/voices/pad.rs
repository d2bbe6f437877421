//! Pad: three triangles with vibrato, a drifting high-pass and a long
//! reverb.
//!
//! # How It Works
//!
//! 1. A 2 Hz sine scaled by the voice frequency / 440 is added to each
//!    oscillator's frequency: vibrato whose depth follows the note
//! 2. Triangles at 16/12 and 19/12 of the note, the second pair detuned
//!    +14 and -12 cents so they beat
//! 3. High-pass whose cutoff is an envelope (500 Hz rising to 1.2 kHz over
//!    a second, decaying to 100 Hz over four) plus a 1 Hz, ±100 Hz wobble
//! 4. Slow amplitude envelope (1 s in, 1 s out)
//! 5. Convolution with a one second noise impulse response, doubled
//!
//! # Variations
//!
//! - Change the first triangle's interval to 15/12 for a minor colour

use crate::{
    dsp::{filter::FilterType, oscillator::Waveform, reverb::ReverbParams},
    error::Result,
    graph::{
        amplify::GainConfig,
        convolver::ConvolverConfig,
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

pub fn pad(synth: &mut Synth) -> Result<Voice> {
    let voice = synth.voice(VoiceConfig {
        gain: Control::Value(3.0),
        ..Default::default()
    })?;

    let wobble = synth.oscillator(OscillatorConfig {
        waveform: Waveform::Sine,
        frequency: Control::Value(2.0),
        gain: Control::Value(1.0 / 440.0),
        ..Default::default()
    })?;
    let vibrato = synth.gain(GainConfig {
        gain: voice.frequency.into(),
        input: wobble.into(),
    })?;

    let mut triangles = Vec::new();
    for (scale, detune) in [(16.0 / 12.0, 0.0), (19.0 / 12.0, 14.0), (19.0 / 12.0, -12.0)] {
        triangles.push(synth.oscillator(OscillatorConfig {
            waveform: Waveform::Triangle,
            frequency: [voice.frequency, vibrato].into(),
            scale,
            detune: Control::Value(detune),
            ..Default::default()
        })?);
    }

    let sweep = synth.envelope(
        Adsr {
            base: 500.0,
            attack_time: 1.0,
            attack_target: 1200.0,
            decay_time: 4.0,
            sustain_level: 100.0,
            release_time: 2.0,
            ..Default::default()
        },
        voice,
    )?;
    let drift = synth.oscillator(OscillatorConfig {
        waveform: Waveform::Sine,
        frequency: Control::Value(1.0),
        gain: Control::Value(100.0),
        ..Default::default()
    })?;
    let filter = synth.filter(FilterConfig {
        kind: FilterType::HighPass,
        frequency: [sweep, drift].into(),
        q: Control::Value(0.0),
        input: triangles.into(),
        ..Default::default()
    })?;

    let level = synth.envelope(Adsr::new(1.0, 0.0, 1.0, 1.0), voice)?;
    let amp = synth.gain(GainConfig {
        gain: level.into(),
        input: filter.into(),
    })?;

    let impulse = synth.reverb_impulse_response(&ReverbParams {
        fade_in: 0.1,
        decay: 1.0,
        subsample: 0.95,
        ..Default::default()
    });
    let reverb = synth.convolver(ConvolverConfig {
        gain: Control::Value(2.0),
        input: amp.into(),
        ..ConvolverConfig::new(impulse)
    })?;
    synth.attach(reverb, voice, None)?;
    Ok(voice)
}
