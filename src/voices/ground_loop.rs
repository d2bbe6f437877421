//! Ground loop: mains hum gone wrong.
//!
//! # How It Works
//!
//! 1. A 50 Hz sine, whatever the note
//! 2. Distortion at amount 30 squares it off, adding odd harmonics
//! 3. High-pass at 3 kHz keeps only the buzz
//! 4. A soft-kneed compressor with 5x makeup
//! 5. Reverb, doubled
//!
//! An envelope is registered with the voice but drives nothing; the hum runs
//! from the moment the graph is built.

use crate::{
    dsp::{filter::FilterType, oscillator::Waveform, reverb::ReverbParams},
    error::Result,
    graph::{
        compressor::CompressorConfig,
        convolver::ConvolverConfig,
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

pub fn ground_loop(synth: &mut Synth) -> Result<Voice> {
    let voice = synth.voice(VoiceConfig::default())?;
    synth.envelope(Adsr::default(), voice)?;

    let hum = synth.oscillator(OscillatorConfig {
        waveform: Waveform::Sine,
        frequency: Control::Value(50.0),
        ..Default::default()
    })?;
    let distortion = synth.distortion(DistortionConfig {
        amount: 30.0,
        input: hum.into(),
        ..Default::default()
    })?;
    let filter = synth.filter(FilterConfig {
        kind: FilterType::HighPass,
        q: Control::Value(0.5),
        frequency: Control::Value(3000.0),
        input: distortion.into(),
        ..Default::default()
    })?;
    let compressor = synth.compressor(CompressorConfig {
        knee: Control::Value(0.5),
        gain: Control::Value(5.0),
        input: filter.into(),
        ..Default::default()
    })?;

    let impulse = synth.reverb_impulse_response(&ReverbParams {
        fade_in: 0.1,
        decay: 1.0,
        subsample: 0.95,
        ..Default::default()
    });
    let reverb = synth.convolver(ConvolverConfig {
        gain: Control::Value(2.0),
        input: compressor.into(),
        ..ConvolverConfig::new(impulse)
    })?;
    synth.attach(reverb, voice, None)?;
    Ok(voice)
}
