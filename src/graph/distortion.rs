//! Wave-shaping distortion.
//!
//! The unit maps every input sample through a curve. The default curve is the
//! sigmoid from [`distortion_curve`]: near-linear for quiet input, flattening
//! as `amount` grows. Any other curve can be supplied directly.

use std::sync::Arc;

use crate::{
    dsp::distortion::{distortion_curve, DEFAULT_AMOUNT, DEFAULT_CURVE_SIZE},
    engine::backend::{Backend, Destination, NodeSpec},
    error::Result,
    graph::{
        node::{Control, UnitId, UnitKind},
        param::{Param, GAIN, INPUT},
    },
    synth::Synth,
};

#[derive(Debug, Clone, PartialEq)]
pub struct DistortionConfig {
    /// Drive of the default sigmoid curve.
    pub amount: f32,
    /// Replaces the sigmoid when set.
    pub curve: Option<Arc<[f32]>>,
    pub gain: Control,
    pub input: Control,
}

impl Default for DistortionConfig {
    fn default() -> Self {
        Self {
            amount: DEFAULT_AMOUNT,
            curve: None,
            gain: Control::Value(1.0),
            input: Control::Unset,
        }
    }
}

impl<B: Backend> Synth<B> {
    pub fn distortion(&mut self, config: DistortionConfig) -> Result<UnitId> {
        let mut unit = self.gain_stage(UnitKind::Distortion)?;

        let curve = config
            .curve
            .unwrap_or_else(|| distortion_curve(config.amount, DEFAULT_CURVE_SIZE).into());
        let shaper = self.backend.create(NodeSpec::WaveShaper { curve });
        self.backend.connect(shaper, Destination::Node(unit.output()));
        unit.own(shaper);
        unit.add_param(Param::audio(INPUT, shaper));

        let id = self.add_unit(unit);
        tracing::debug!("Created distortion {} (amount {})", id, config.amount);
        self.init_param(id, GAIN, config.gain)?;
        self.init_param(id, INPUT, config.input)?;
        Ok(id)
    }
}
