//! Gain stages.
//!
//! Most units end in one: their output node is a gain node whose `"gain"`
//! parameter scales whatever the unit produces. A plain gain unit is just
//! that stage with its input exposed, which makes it a multiplier: feed a
//! signal into `"in"` and a modulator into `"gain"` for amplitude or ring
//! modulation.

use crate::{
    engine::backend::{Backend, NodeSpec, ParamSlot},
    error::Result,
    graph::{
        node::{Control, Unit, UnitId, UnitKind},
        param::{Param, GAIN, INPUT},
    },
    synth::Synth,
};

#[derive(Debug, Clone, PartialEq)]
pub struct GainConfig {
    pub gain: Control,
    pub input: Control,
}

impl Default for GainConfig {
    fn default() -> Self {
        Self {
            gain: Control::Value(1.0),
            input: Control::Unset,
        }
    }
}

impl<B: Backend> Synth<B> {
    pub fn gain(&mut self, config: GainConfig) -> Result<UnitId> {
        let mut unit = self.gain_stage(UnitKind::Gain)?;
        unit.add_param(Param::audio(INPUT, unit.output()));

        let id = self.add_unit(unit);
        tracing::debug!("Created gain {}", id);
        self.init_param(id, GAIN, config.gain)?;
        self.init_param(id, INPUT, config.input)?;
        Ok(id)
    }

    /// A unit of `kind` whose output is a fresh gain node, with `"gain"`
    /// already registered.
    pub(crate) fn gain_stage(&mut self, kind: UnitKind) -> Result<Unit> {
        let node = self.backend.create(NodeSpec::Gain);
        let gain = self.slot(node, ParamSlot::Gain)?;
        let mut unit = Unit::new(kind, node);
        unit.add_param(Param::value(GAIN, gain));
        Ok(unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::backend::Destination;

    #[test]
    fn test_gain_multiplies_its_input() {
        let mut synth = Synth::offline(1000.0);
        let source = synth.constant(0.5).unwrap();
        let amp = synth
            .gain(GainConfig {
                gain: Control::Value(0.5),
                input: source.into(),
            })
            .unwrap();
        let output = synth.output(amp).unwrap();
        let destination = synth.backend().destination();
        synth.backend_mut().connect(output, Destination::Node(destination));

        let out = synth.backend_mut().render_frames(32);

        assert!(out.iter().all(|&s| (s - 0.25).abs() < 1e-6));
    }

    #[test]
    fn test_modulator_replaces_static_gain() {
        let mut synth = Synth::offline(1000.0);
        let signal = synth.constant(1.0).unwrap();
        let modulator = synth.constant(0.3).unwrap();
        let amp = synth
            .gain(GainConfig {
                gain: Control::Value(0.9),
                input: signal.into(),
            })
            .unwrap();
        synth.attach(modulator, amp, Some(GAIN)).unwrap();
        let output = synth.output(amp).unwrap();
        let destination = synth.backend().destination();
        synth.backend_mut().connect(output, Destination::Node(destination));

        let out = synth.backend_mut().render_frames(32);

        // 0.9 was zeroed on the first live source, leaving only the modulator.
        assert!(out.iter().all(|&s| (s - 0.3).abs() < 1e-6));
    }
}
