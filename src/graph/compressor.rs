//! Dynamics compression.
//!
//! Every setting is a value parameter, so thresholds and ratios can be
//! automated like any other control. Settings left unset keep the
//! backend defaults (-24 dB threshold, 30 dB knee, 12:1, 3 ms attack,
//! 250 ms release).

use crate::{
    engine::backend::{Backend, Destination, NodeSpec, ParamSlot},
    error::Result,
    graph::{
        node::{Control, UnitId, UnitKind},
        param::{Param, ATTACK, GAIN, INPUT, KNEE, RATIO, RELEASE, THRESHOLD},
    },
    synth::Synth,
};

#[derive(Debug, Clone, PartialEq)]
pub struct CompressorConfig {
    /// dB.
    pub threshold: Control,
    /// dB.
    pub knee: Control,
    pub ratio: Control,
    /// Seconds.
    pub attack: Control,
    /// Seconds.
    pub release: Control,
    pub gain: Control,
    pub input: Control,
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            threshold: Control::Unset,
            knee: Control::Unset,
            ratio: Control::Unset,
            attack: Control::Unset,
            release: Control::Unset,
            gain: Control::Value(1.0),
            input: Control::Unset,
        }
    }
}

impl<B: Backend> Synth<B> {
    pub fn compressor(&mut self, config: CompressorConfig) -> Result<UnitId> {
        let mut unit = self.gain_stage(UnitKind::Compressor)?;

        let compressor = self.backend.create(NodeSpec::Compressor);
        self.backend.connect(compressor, Destination::Node(unit.output()));
        unit.own(compressor);
        unit.add_param(Param::audio(INPUT, compressor));

        let settings = [
            (THRESHOLD, ParamSlot::Threshold, config.threshold),
            (KNEE, ParamSlot::Knee, config.knee),
            (RATIO, ParamSlot::Ratio, config.ratio),
            (ATTACK, ParamSlot::Attack, config.attack),
            (RELEASE, ParamSlot::Release, config.release),
        ];
        for (name, slot, _) in &settings {
            unit.add_param(Param::value(*name, self.slot(compressor, *slot)?));
        }

        let id = self.add_unit(unit);
        tracing::debug!("Created compressor {}", id);
        self.init_param(id, GAIN, config.gain)?;
        self.init_param(id, INPUT, config.input)?;
        for (name, _, control) in settings {
            self.init_param(id, name, control)?;
        }
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compressed(level: f32, config: CompressorConfig) -> f32 {
        let mut synth = Synth::offline(8000.0);
        let source = synth.constant(level).unwrap();
        let unit = synth
            .compressor(CompressorConfig {
                input: source.into(),
                ..config
            })
            .unwrap();
        let output = synth.output(unit).unwrap();
        let destination = synth.backend().destination();
        synth.backend_mut().connect(output, Destination::Node(destination));
        *synth.backend_mut().render(1.0).last().unwrap()
    }

    #[test]
    fn test_loud_input_is_reduced_relative_to_makeup() {
        let quiet = compressed(0.01, CompressorConfig::default());
        let loud = compressed(1.0, CompressorConfig::default());
        // Gain reduction makes the output grow far slower than the input.
        assert!(loud / quiet < 100.0 * 0.5, "ratio {}", loud / quiet);
    }

    #[test]
    fn test_settings_are_value_parameters() {
        let mut synth = Synth::offline(8000.0);
        let unit = synth
            .compressor(CompressorConfig {
                ratio: Control::Value(4.0),
                ..Default::default()
            })
            .unwrap();

        let ratio = synth.unit(unit).unwrap().require(RATIO).unwrap().automation().unwrap();
        assert_eq!(synth.backend().param_value(ratio, 0.0), Some(4.0));
        for name in [THRESHOLD, KNEE, ATTACK, RELEASE] {
            assert!(synth.param(unit, name).is_ok());
        }
    }
}
