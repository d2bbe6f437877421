/*
Tone Generators
===============

An oscillator unit repeats one waveform at the frequency arriving on its
`"frequency"` parameter. That parameter is not the backend oscillator's own
frequency: it goes through a scaling stage (see `graph::frequency`), so the
same voice frequency can drive several oscillators at different intervals.

Waveforms:

  Sine      a single partial
  Square    odd harmonics at 1/n
  Sawtooth  every harmonic at 1/n
  Triangle  odd harmonics at 1/n²
  Custom    any cosine/sine series (a `PeriodicWave`)

Scale and Nominal
-----------------

The backend oscillator runs at

    frequency * scale / nominal

`scale` transposes (2.0 is an octave up, 800/540 is the cowbell's second
square). `nominal` is the frequency at which a custom wave sounds as
written; basic waveforms leave it at 1.

Spectra
-------

A spectrum unit is a custom-wave oscillator whose wave is built from a list
of partial frequencies. The partials are laid into a table of `table_size`
bins, so one pass through the table lasts `table_size / sample_rate`
seconds. Playing the table at

    frequency * (sample_rate / table_size) * scale / nominal

sounds every partial at its written frequency when `frequency == nominal`
(440 Hz by default) and transposes the whole spectrum otherwise.

Example:
  let voice = synth.voice(VoiceConfig::default())?;
  let osc = synth.oscillator(OscillatorConfig {
      waveform: Waveform::Square,
      frequency: voice.frequency.into(),
      ..Default::default()
  })?;
  synth.attach(osc, voice, None)?;
*/

use std::sync::Arc;

use crate::{
    dsp::{
        oscillator::Waveform,
        spectrum::{default_table_size, spectrum_table},
    },
    engine::backend::{Backend, Destination, NodeSpec, ParamSlot},
    error::Result,
    graph::{
        node::{Control, Start, UnitId, UnitKind},
        param::{Param, DETUNE, FREQUENCY, GAIN},
    },
    synth::Synth,
};

#[derive(Debug, Clone)]
pub struct OscillatorConfig {
    pub waveform: Waveform,
    /// Multiplier applied to the incoming frequency.
    pub scale: f32,
    pub frequency: Control,
    /// Detune in cents.
    pub detune: Control,
    pub gain: Control,
    pub start: Start,
    /// Frequency at which the waveform sounds as written.
    pub nominal: f32,
}

impl Default for OscillatorConfig {
    fn default() -> Self {
        Self {
            waveform: Waveform::Sine,
            scale: 1.0,
            frequency: Control::Unset,
            detune: Control::Unset,
            gain: Control::Value(1.0),
            start: Start::Now,
            nominal: 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpectrumConfig {
    /// Partial frequencies in Hz, as heard when playing at `nominal`.
    pub frequencies: Vec<f32>,
    /// One gain per partial; all 1 when `None`.
    pub gains: Option<Vec<f32>>,
    pub nominal: f32,
    /// Table length in bins; a quarter second's worth when `None`.
    pub table_size: Option<usize>,
    pub frequency: Control,
    pub start: Start,
    pub gain: Control,
    pub scale: f32,
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        Self {
            frequencies: Vec::new(),
            gains: None,
            nominal: 440.0,
            table_size: None,
            frequency: Control::Unset,
            start: Start::Now,
            gain: Control::Value(1.0),
            scale: 1.0,
        }
    }
}

impl<B: Backend> Synth<B> {
    pub fn oscillator(&mut self, config: OscillatorConfig) -> Result<UnitId> {
        let rate_scale = config.scale / config.nominal;
        self.build_oscillator(UnitKind::Oscillator, config, rate_scale)
    }

    /// An oscillator playing an additive spectrum.
    pub fn spectrum(&mut self, config: SpectrumConfig) -> Result<UnitId> {
        let sample_rate = self.sample_rate();
        let table_size = config.table_size.unwrap_or_else(|| default_table_size(sample_rate));
        let wave = spectrum_table(&config.frequencies, config.gains.as_deref(), table_size, sample_rate)?;

        let rate_scale = sample_rate / table_size as f32 * config.scale / config.nominal;
        let oscillator = OscillatorConfig {
            waveform: Waveform::Custom(Arc::new(wave)),
            scale: config.scale,
            frequency: config.frequency,
            detune: Control::Unset,
            gain: config.gain,
            start: config.start,
            nominal: config.nominal,
        };
        self.build_oscillator(UnitKind::Spectrum, oscillator, rate_scale)
    }

    fn build_oscillator(&mut self, kind: UnitKind, config: OscillatorConfig, rate_scale: f32) -> Result<UnitId> {
        let mut unit = self.gain_stage(kind)?;

        let oscillator = self.backend.create(NodeSpec::Oscillator { waveform: config.waveform });
        self.backend.connect(oscillator, Destination::Node(unit.output()));
        unit.own(oscillator);
        unit.set_source(oscillator);
        unit.add_param(Param::value(DETUNE, self.slot(oscillator, ParamSlot::Detune)?));

        let control = self.slot(oscillator, ParamSlot::Frequency)?;
        self.frequency_helper(&mut unit, control, &config.frequency, rate_scale)?;

        let id = self.add_unit(unit);
        tracing::debug!("Created {} {} (rate scale {})", kind, id, rate_scale);
        self.start_source(oscillator, config.start);
        self.init_param(id, GAIN, config.gain)?;
        self.init_param(id, DETUNE, config.detune)?;
        self.init_param(id, FREQUENCY, config.frequency)?;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::Error,
        graph::param::SCALE,
    };

    fn zero_crossings(samples: &[f32]) -> usize {
        samples.windows(2).filter(|w| w[0] < 0.0 && w[1] >= 0.0).count()
    }

    fn to_destination(synth: &mut Synth, unit: UnitId) {
        let output = synth.output(unit).unwrap();
        let destination = synth.backend().destination();
        synth.backend_mut().connect(output, Destination::Node(destination));
    }

    #[test]
    fn test_literal_frequency_sets_the_pitch() {
        let mut synth = Synth::offline(8000.0);
        let osc = synth
            .oscillator(OscillatorConfig {
                frequency: Control::Value(100.0),
                ..Default::default()
            })
            .unwrap();
        to_destination(&mut synth, osc);

        let out = synth.backend_mut().render(1.0);

        let crossings = zero_crossings(&out);
        assert!((99..=101).contains(&crossings), "{crossings} crossings");
    }

    #[test]
    fn test_scale_transposes() {
        let mut synth = Synth::offline(8000.0);
        let osc = synth
            .oscillator(OscillatorConfig {
                frequency: Control::Value(100.0),
                scale: 2.0,
                ..Default::default()
            })
            .unwrap();
        to_destination(&mut synth, osc);

        let out = synth.backend_mut().render(1.0);

        let crossings = zero_crossings(&out);
        assert!((199..=201).contains(&crossings), "{crossings} crossings");
    }

    #[test]
    fn test_unit_driven_frequency_follows_the_driver() {
        let mut synth = Synth::offline(8000.0);
        let driver = synth.constant(50.0).unwrap();
        let osc = synth
            .oscillator(OscillatorConfig {
                frequency: driver.into(),
                ..Default::default()
            })
            .unwrap();
        to_destination(&mut synth, osc);
        synth.param(driver, crate::graph::param::VALUE).unwrap().set(150.0);

        let out = synth.backend_mut().render(1.0);

        let crossings = zero_crossings(&out);
        assert!((149..=151).contains(&crossings), "{crossings} crossings");
    }

    #[test]
    fn test_deferred_oscillator_is_silent_until_started() {
        let mut synth = Synth::offline(8000.0);
        let osc = synth
            .oscillator(OscillatorConfig {
                frequency: Control::Value(100.0),
                start: Start::Deferred,
                ..Default::default()
            })
            .unwrap();
        to_destination(&mut synth, osc);

        let silent = synth.backend_mut().render_frames(1024);
        assert!(silent.iter().all(|&s| s == 0.0));

        let now = synth.now();
        synth.start(osc, now).unwrap();
        let sounding = synth.backend_mut().render_frames(1024);
        assert!(sounding.iter().any(|&s| s.abs() > 0.5));
    }

    #[test]
    fn test_spectrum_scale_accounts_for_the_table() {
        let mut synth = Synth::offline(8000.0);
        let spectrum = synth
            .spectrum(SpectrumConfig {
                frequencies: vec![440.0],
                ..Default::default()
            })
            .unwrap();

        let scale = synth.unit(spectrum).unwrap().require(SCALE).unwrap().automation().unwrap();
        let expected = 8000.0 / 2000.0 / 440.0;
        assert!((synth.backend().param_value(scale, 0.0).unwrap() - expected).abs() < 1e-7);
    }

    #[test]
    fn test_spectrum_partial_sounds_at_its_frequency() {
        let mut synth = Synth::offline(8000.0);
        let spectrum = synth
            .spectrum(SpectrumConfig {
                frequencies: vec![200.0],
                frequency: Control::Value(440.0),
                ..Default::default()
            })
            .unwrap();
        to_destination(&mut synth, spectrum);

        let out = synth.backend_mut().render(1.0);

        let crossings = zero_crossings(&out);
        assert!((198..=202).contains(&crossings), "{crossings} crossings");
    }

    #[test]
    fn test_empty_spectrum_is_rejected() {
        let mut synth = Synth::offline(8000.0);
        assert!(matches!(
            synth.spectrum(SpectrumConfig::default()),
            Err(Error::EmptySpectrum)
        ));
    }
}
