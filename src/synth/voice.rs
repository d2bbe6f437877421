//! Monophonic voices.
//!
//! A voice is a master gain stage plus a registry of units that react to its
//! notes. It owns a frequency controller (registered first), so every unit
//! whose `"frequency"` is driven by `voice.frequency` follows the notes
//! played with [`Synth::on`].
//!
//! Units join the registry by having the voice attached to their trigger
//! input, either at construction (`synth.envelope(adsr, voice)`) or later
//! with `synth.attach(voice, unit, None)`. Registering never wires audio.

use crate::{
    engine::backend::{Backend, Destination},
    error::Result,
    graph::{
        frequency::FrequencyConfig,
        node::{Control, Role, UnitId, UnitKind},
        param::{Param, GAIN, INPUT},
    },
    synth::Synth,
};

/// Handle to a voice built by [`Synth::voice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Voice {
    /// The voice unit: master gain and registry.
    pub unit: UnitId,
    /// The voice's frequency controller. Use it as the `frequency` of
    /// oscillators and filters that should track the notes.
    pub frequency: UnitId,
}

impl From<Voice> for UnitId {
    fn from(voice: Voice) -> Self {
        voice.unit
    }
}

/// A voice as a control source: attaching it to a trigger input registers
/// the unit with the voice.
impl From<Voice> for Control {
    fn from(voice: Voice) -> Self {
        Control::Units(vec![voice.unit])
    }
}

/// Units that receive a voice's note events, in registration order.
#[derive(Debug, Clone, Default)]
pub struct VoiceRegistry {
    registrants: Vec<UnitId>,
}

impl VoiceRegistry {
    pub fn registrants(&self) -> &[UnitId] {
        &self.registrants
    }

    pub(crate) fn register(&mut self, unit: UnitId) {
        self.registrants.push(unit);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VoiceConfig {
    /// Master volume.
    pub gain: Control,
    /// Connect the master output to the backend destination.
    pub connect_output: bool,
    /// Glide time of the frequency controller.
    pub portamento: f64,
    pub input: Control,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            gain: Control::Value(0.5),
            connect_output: true,
            portamento: 0.0,
            input: Control::Unset,
        }
    }
}

impl<B: Backend> Synth<B> {
    pub fn voice(&mut self, config: VoiceConfig) -> Result<Voice> {
        let frequency = self.frequency_controller(FrequencyConfig {
            portamento: config.portamento,
            trigger: Control::Unset,
        })?;

        let mut unit = self.gain_stage(UnitKind::Voice)?.with_role(Role::Voice(VoiceRegistry::default()));
        let output = unit.output();
        unit.add_param(Param::audio(INPUT, output));
        unit.add_helper(frequency);

        let id = self.add_unit(unit);
        self.register(id, frequency)?;
        if config.connect_output {
            let destination = self.backend.destination();
            self.backend.connect(output, Destination::Node(destination));
        }
        tracing::debug!("Created voice {} (frequency {})", id, frequency);

        self.init_param(id, GAIN, config.gain)?;
        self.init_param(id, INPUT, config.input)?;
        Ok(Voice { unit: id, frequency })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{
        envelope::Adsr,
        oscillator::OscillatorConfig,
        param::VALUE,
    };

    #[test]
    fn test_voice_registers_its_frequency_controller_first() {
        let mut synth = Synth::offline(8000.0);
        let voice = synth.voice(VoiceConfig::default()).unwrap();

        let Role::Voice(registry) = synth.unit(voice.unit).unwrap().role() else {
            panic!("not a voice");
        };
        assert_eq!(registry.registrants(), &[voice.frequency]);
    }

    #[test]
    fn test_on_sets_the_frequency() {
        let mut synth = Synth::offline(8000.0);
        let voice = synth.voice(VoiceConfig::default()).unwrap();

        synth.on(voice, 0.0, 330.0).unwrap();

        let level = synth.unit(voice.frequency).unwrap().require(VALUE).unwrap().automation().unwrap();
        assert_eq!(synth.backend().param_value(level, 0.1), Some(330.0));
    }

    #[test]
    fn test_silent_until_triggered() {
        let mut synth = Synth::offline(8000.0);
        let voice = synth.voice(VoiceConfig::default()).unwrap();
        let envelope = synth.envelope(Adsr::default(), voice).unwrap();
        let osc = synth
            .oscillator(OscillatorConfig {
                frequency: voice.frequency.into(),
                gain: envelope.into(),
                ..Default::default()
            })
            .unwrap();
        synth.attach(osc, voice, None).unwrap();

        let before = synth.backend_mut().render_frames(512);
        assert!(before.iter().all(|&s| s.abs() < 1e-6));

        let now = synth.now();
        synth.on(voice, now, 200.0).unwrap();
        let after = synth.backend_mut().render_frames(2048);
        let peak = after.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
        assert!((peak - 0.5).abs() < 0.05, "peak {peak}");
    }

    #[test]
    fn test_voice_without_output_can_be_attached_elsewhere() {
        let mut synth = Synth::offline(8000.0);
        let voice = synth
            .voice(VoiceConfig {
                connect_output: false,
                ..Default::default()
            })
            .unwrap();
        let amp = synth.gain(Default::default()).unwrap();

        synth.attach(voice, amp, None).unwrap();

        let Role::Voice(registry) = synth.unit(voice.unit).unwrap().role() else {
            panic!("not a voice");
        };
        assert_eq!(registry.registrants().len(), 1);
    }
}
