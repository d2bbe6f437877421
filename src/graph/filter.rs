/*
Filter Units
============

A filter unit wraps one backend filter node. Its cutoff is a driving
frequency like an oscillator's: `"frequency"` goes through a scaling stage
whose `"scale"` defaults to the configured multiplier, so a filter can track
the voice frequency (`frequency: voice.frequency.into(), scale: 2.0` keeps the
cutoff an octave above the note) or follow an envelope sweeping in Hz.

Parameters:

  in         audio to filter
  frequency  cutoff (or centre) in Hz, before scaling
  scale      cutoff multiplier
  q          resonance in dB for low/high-pass, bandwidth otherwise
  boost      gain in dB for shelving and peaking responses
  gain       output level

A cutoff of 0 (no frequency given) is clamped by the filter to its lowest
usable value rather than silencing the unit.
*/

use crate::{
    dsp::filter::FilterType,
    engine::backend::{Backend, Destination, NodeSpec, ParamSlot},
    error::Result,
    graph::{
        node::{Control, UnitId, UnitKind},
        param::{Param, BOOST, FREQUENCY, GAIN, INPUT, Q},
    },
    synth::Synth,
};

#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    pub kind: FilterType,
    pub q: Control,
    pub frequency: Control,
    pub scale: f32,
    pub boost: Control,
    pub gain: Control,
    pub input: Control,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            kind: FilterType::LowPass,
            q: Control::Unset,
            frequency: Control::Unset,
            scale: 1.0,
            boost: Control::Unset,
            gain: Control::Value(1.0),
            input: Control::Unset,
        }
    }
}

impl<B: Backend> Synth<B> {
    pub fn filter(&mut self, config: FilterConfig) -> Result<UnitId> {
        let mut unit = self.gain_stage(UnitKind::Filter)?;

        let filter = self.backend.create(NodeSpec::Filter { kind: config.kind });
        self.backend.connect(filter, Destination::Node(unit.output()));
        unit.own(filter);
        unit.add_param(Param::audio(INPUT, filter));
        unit.add_param(Param::value(Q, self.slot(filter, ParamSlot::Q)?));
        unit.add_param(Param::value(BOOST, self.slot(filter, ParamSlot::FilterGain)?));

        let control = self.slot(filter, ParamSlot::Frequency)?;
        self.frequency_helper(&mut unit, control, &config.frequency, config.scale)?;

        let id = self.add_unit(unit);
        tracing::debug!("Created {:?} filter {}", config.kind, id);
        self.init_param(id, GAIN, config.gain)?;
        self.init_param(id, INPUT, config.input)?;
        self.init_param(id, Q, config.q)?;
        self.init_param(id, BOOST, config.boost)?;
        self.init_param(id, FREQUENCY, config.frequency)?;
        Ok(id)
    }
}
