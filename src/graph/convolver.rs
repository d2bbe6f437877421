//! Convolution, mostly for reverb.
//!
//! [`Synth::reverb_impulse_response`] generates a decaying-noise impulse
//! response from the synth's seeded generator; hand it to a convolver unit
//! and attach the dry signal to the unit's `"in"`.

use std::sync::Arc;

use crate::{
    dsp::{
        buffer::AudioBuffer,
        reverb::{impulse_response, ReverbParams},
    },
    engine::backend::{Backend, Destination, NodeSpec},
    error::Result,
    graph::{
        node::{Control, UnitId, UnitKind},
        param::{Param, GAIN, INPUT},
    },
    synth::Synth,
};

#[derive(Debug, Clone)]
pub struct ConvolverConfig {
    pub buffer: Arc<AudioBuffer>,
    /// Scale the impulse response to unit power.
    pub normalize: bool,
    pub gain: Control,
    pub input: Control,
}

impl ConvolverConfig {
    pub fn new(buffer: Arc<AudioBuffer>) -> Self {
        Self {
            buffer,
            normalize: true,
            gain: Control::Value(1.0),
            input: Control::Unset,
        }
    }
}

impl<B: Backend> Synth<B> {
    pub fn convolver(&mut self, config: ConvolverConfig) -> Result<UnitId> {
        let mut unit = self.gain_stage(UnitKind::Convolver)?;
        let frames = config.buffer.len();

        let convolver = self.backend.create(NodeSpec::Convolver {
            buffer: config.buffer,
            normalize: config.normalize,
        });
        self.backend.connect(convolver, Destination::Node(unit.output()));
        unit.own(convolver);
        unit.add_param(Param::audio(INPUT, convolver));

        let id = self.add_unit(unit);
        tracing::debug!("Created convolver {} ({} frame response)", id, frames);
        self.init_param(id, GAIN, config.gain)?;
        self.init_param(id, INPUT, config.input)?;
        Ok(id)
    }

    /// A reverb impulse response at the synth's sample rate.
    pub fn reverb_impulse_response(&mut self, params: &ReverbParams) -> Arc<AudioBuffer> {
        let sample_rate = self.sample_rate();
        let response = impulse_response(&mut self.rng, params, sample_rate);
        tracing::debug!(
            "Generated {} channel impulse response, {:.2}s",
            response.channel_count(),
            response.duration()
        );
        Arc::new(response)
    }
}
