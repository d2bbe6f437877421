//! Buffer players: sampled sound, looping noise and pulse tables.
//!
//! A buffer unit plays an [`AudioBuffer`] either at a plain playback rate or
//! under frequency control. Under frequency control the rate scale is
//! `scale * duration`, so a 1 Hz input plays the whole buffer once per
//! second; a pulse table driven at 440 Hz therefore sounds at 440 Hz.

use std::sync::Arc;

use crate::{
    dsp::{buffer::AudioBuffer, noise::noise_buffer, pulse::pulse_table},
    engine::backend::{Backend, Destination, NodeSpec, ParamSlot},
    error::Result,
    graph::{
        node::{Control, Start, UnitId, UnitKind},
        param::{Param, DETUNE, FREQUENCY, GAIN, PLAYBACK_RATE},
    },
    synth::Synth,
};

/// How the playback rate of a buffer is controlled.
#[derive(Debug, Clone, PartialEq)]
pub enum Playback {
    /// A `"rate"` parameter; 1 plays at the buffer's own speed.
    Rate(Control),
    /// A `"frequency"` parameter through the frequency helper.
    Frequency(Control),
}

impl Default for Playback {
    fn default() -> Self {
        Playback::Rate(Control::Value(1.0))
    }
}

#[derive(Debug, Clone)]
pub struct BufferConfig {
    pub buffer: Arc<AudioBuffer>,
    pub looping: bool,
    pub scale: f32,
    pub gain: Control,
    pub start: Start,
    /// Detune in cents.
    pub detune: Control,
    pub playback: Playback,
}

impl BufferConfig {
    pub fn new(buffer: Arc<AudioBuffer>) -> Self {
        Self {
            buffer,
            looping: true,
            scale: 1.0,
            gain: Control::Value(1.0),
            start: Start::Now,
            detune: Control::Unset,
            playback: Playback::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NoiseConfig {
    pub gain: Control,
    pub start: Start,
    pub rate: Control,
    pub detune: Control,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            gain: Control::Value(1.0),
            start: Start::Now,
            rate: Control::Value(1.0),
            detune: Control::Unset,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PulseConfig {
    /// Fraction of the cycle spent high, in `[0, 1]`.
    pub width: f32,
    /// Rotation of the wave as a fraction of the cycle.
    pub offset: f32,
    /// Samples in one cycle of the table.
    pub size: usize,
    pub scale: f32,
    pub frequency: Control,
    pub gain: Control,
    pub start: Start,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            width: 0.1,
            offset: 0.0,
            size: 1024,
            scale: 1.0,
            frequency: Control::Unset,
            gain: Control::Value(1.0),
            start: Start::Now,
        }
    }
}

impl<B: Backend> Synth<B> {
    pub fn buffer(&mut self, config: BufferConfig) -> Result<UnitId> {
        self.build_buffer(UnitKind::Buffer, config)
    }

    /// White noise from a looping buffer of [`SynthConfig::noise_seconds`].
    ///
    /// [`SynthConfig::noise_seconds`]: crate::SynthConfig::noise_seconds
    pub fn noise(&mut self, config: NoiseConfig) -> Result<UnitId> {
        let sample_rate = self.sample_rate();
        let samples = noise_buffer(&mut self.rng, sample_rate, self.config.noise_seconds);
        let buffer = Arc::new(AudioBuffer::mono(sample_rate, samples));

        self.build_buffer(
            UnitKind::Noise,
            BufferConfig {
                gain: config.gain,
                start: config.start,
                detune: config.detune,
                playback: Playback::Rate(config.rate),
                ..BufferConfig::new(buffer)
            },
        )
    }

    /// A frequency-controlled, DC-free pulse wave.
    pub fn pulse(&mut self, config: PulseConfig) -> Result<UnitId> {
        let table = pulse_table(config.width, config.offset, config.size);
        let buffer = Arc::new(AudioBuffer::mono(self.sample_rate(), table));

        self.build_buffer(
            UnitKind::Pulse,
            BufferConfig {
                scale: config.scale,
                gain: config.gain,
                start: config.start,
                playback: Playback::Frequency(config.frequency),
                ..BufferConfig::new(buffer)
            },
        )
    }

    fn build_buffer(&mut self, kind: UnitKind, config: BufferConfig) -> Result<UnitId> {
        let mut unit = self.gain_stage(kind)?;
        let duration = config.buffer.duration() as f32;

        let source = self.backend.create(NodeSpec::BufferSource {
            buffer: config.buffer,
            looping: config.looping,
        });
        self.backend.connect(source, Destination::Node(unit.output()));
        unit.own(source);
        unit.set_source(source);
        unit.add_param(Param::value(DETUNE, self.slot(source, ParamSlot::Detune)?));

        let rate = self.slot(source, ParamSlot::PlaybackRate)?;
        let (name, control) = match config.playback {
            Playback::Rate(control) => {
                unit.add_param(Param::value(PLAYBACK_RATE, rate));
                (PLAYBACK_RATE, control)
            }
            Playback::Frequency(control) => {
                self.frequency_helper(&mut unit, rate, &control, config.scale * duration)?;
                (FREQUENCY, control)
            }
        };

        let id = self.add_unit(unit);
        tracing::debug!("Created {} {} ({:.3}s, looping {})", kind, id, duration, config.looping);
        self.start_source(source, config.start);
        self.init_param(id, GAIN, config.gain)?;
        self.init_param(id, DETUNE, config.detune)?;
        self.init_param(id, name, control)?;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        engine::offline::OfflineRenderer,
        graph::param::{INPUT, SCALE},
        synth::SynthConfig,
    };

    fn to_destination(synth: &mut Synth, unit: UnitId) {
        let output = synth.output(unit).unwrap();
        let destination = synth.backend().destination();
        synth.backend_mut().connect(output, Destination::Node(destination));
    }

    #[test]
    fn test_one_shot_buffer_plays_once() {
        let mut synth = Synth::offline(1000.0);
        let buffer = Arc::new(AudioBuffer::mono(1000.0, vec![0.5; 100]));
        let unit = synth
            .buffer(BufferConfig {
                looping: false,
                ..BufferConfig::new(buffer)
            })
            .unwrap();
        to_destination(&mut synth, unit);

        let out = synth.backend_mut().render_frames(256);

        assert!(out[..100].iter().all(|&s| (s - 0.5).abs() < 1e-6));
        assert!(out[100..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_rate_parameter_is_exposed_without_frequency_control() {
        let mut synth = Synth::offline(1000.0);
        let buffer = Arc::new(AudioBuffer::mono(1000.0, vec![0.0; 10]));
        let unit = synth.buffer(BufferConfig::new(buffer)).unwrap();

        let unit = synth.unit(unit).unwrap();
        assert!(unit.param(PLAYBACK_RATE).is_some());
        assert!(unit.param(FREQUENCY).is_none());
        assert!(unit.param(INPUT).is_none());
    }

    #[test]
    fn test_frequency_controlled_buffer_scales_by_duration() {
        let mut synth = Synth::offline(1000.0);
        let buffer = Arc::new(AudioBuffer::mono(1000.0, vec![0.0; 250]));
        let unit = synth
            .buffer(BufferConfig {
                scale: 2.0,
                playback: Playback::Frequency(Control::Value(4.0)),
                ..BufferConfig::new(buffer)
            })
            .unwrap();

        let scale = synth.unit(unit).unwrap().require(SCALE).unwrap().automation().unwrap();
        assert!((synth.backend().param_value(scale, 0.0).unwrap() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_noise_is_seeded_and_bounded() {
        let render = |seed| {
            let config = SynthConfig { seed, noise_seconds: 0.5 };
            let mut synth = Synth::with_config(OfflineRenderer::new(4000.0), config);
            let unit = synth.noise(NoiseConfig::default()).unwrap();
            to_destination(&mut synth, unit);
            synth.backend_mut().render_frames(512)
        };

        let a = render(1);
        assert_eq!(a, render(1));
        assert_ne!(a, render(2));
        assert!(a.iter().all(|s| (-1.0..=1.0).contains(s)));
    }

    #[test]
    fn test_pulse_sounds_at_its_frequency() {
        let mut synth = Synth::offline(8000.0);
        let unit = synth
            .pulse(PulseConfig {
                width: 0.5,
                frequency: Control::Value(100.0),
                ..Default::default()
            })
            .unwrap();
        to_destination(&mut synth, unit);

        let out = synth.backend_mut().render(1.0);

        let rising = out.windows(2).filter(|w| w[0] < 0.0 && w[1] >= 0.0).count();
        assert!((99..=101).contains(&rising), "{rising} rising edges");
    }
}
