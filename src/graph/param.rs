//! Named parameters on units.
//!
//! A parameter is one of three kinds:
//!
//! - **value**: a backend automation parameter. It can be set, ramped and
//!   cancelled through a [`ParamHandle`]; live sources connected to it add
//!   to its scheduled value.
//! - **audio**: a backend node input. Sources connected to it are summed.
//! - **trigger**: the `"in"` of envelopes and frequency controllers. Only a
//!   voice can be attached to it, which registers the unit with the voice.

use crate::{
    engine::backend::{AudioParamId, Backend, Destination, NodeId, ParamEvent},
    error::{Error, Result},
    MIN_TIME,
};

/// Primary input of every unit that has one.
pub const INPUT: &str = "in";
pub const GAIN: &str = "gain";
pub const FREQUENCY: &str = "frequency";
pub const SCALE: &str = "scale";
pub const DETUNE: &str = "detune";
pub const PLAYBACK_RATE: &str = "rate";
pub const Q: &str = "q";
pub const BOOST: &str = "boost";
/// The output level of constants, envelopes and frequency controllers.
pub const VALUE: &str = "value";
pub const THRESHOLD: &str = "threshold";
pub const KNEE: &str = "knee";
pub const RATIO: &str = "ratio";
pub const ATTACK: &str = "attack";
pub const RELEASE: &str = "release";

/// Exponential ramps cannot reach zero; smaller targets are raised to this.
pub const MIN_EXPONENTIAL_TARGET: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamTarget {
    Value(AudioParamId),
    Audio(NodeId),
    Trigger,
}

/// Outcome of wiring a source into a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connection {
    /// The parameter had no live source before this one.
    First,
    Additional,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    name: &'static str,
    target: ParamTarget,
    connected: bool,
}

impl Param {
    pub fn value(name: &'static str, param: AudioParamId) -> Self {
        Self::new(name, ParamTarget::Value(param))
    }

    pub fn audio(name: &'static str, node: NodeId) -> Self {
        Self::new(name, ParamTarget::Audio(node))
    }

    pub fn trigger(name: &'static str) -> Self {
        Self::new(name, ParamTarget::Trigger)
    }

    fn new(name: &'static str, target: ParamTarget) -> Self {
        Self { name, target, connected: false }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn target(&self) -> ParamTarget {
        self.target
    }

    pub fn is_trigger(&self) -> bool {
        self.target == ParamTarget::Trigger
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// The automation parameter behind a value parameter.
    pub fn automation(&self) -> Result<AudioParamId> {
        match self.target {
            ParamTarget::Value(param) => Ok(param),
            _ => Err(Error::NotAValueParam(self.name.to_string())),
        }
    }

    /// Wire `source` into this parameter.
    ///
    /// Trigger parameters cannot be wired; the caller resolves them by
    /// registering with a voice instead.
    pub fn accept(&mut self, backend: &mut dyn Backend, source: NodeId) -> Result<Connection> {
        let destination = match self.target {
            ParamTarget::Value(param) => Destination::Param(param),
            ParamTarget::Audio(node) => Destination::Node(node),
            ParamTarget::Trigger => return Err(Error::TriggerRequiresVoice(self.name.to_string())),
        };
        backend.connect(source, destination);

        if self.connected {
            Ok(Connection::Additional)
        } else {
            self.connected = true;
            Ok(Connection::First)
        }
    }

    /// Clear the static value so it no longer adds into a live source.
    /// Audio and trigger parameters have nothing to clear.
    pub fn reset_to_zero(&self, backend: &mut dyn Backend) {
        if let ParamTarget::Value(param) = self.target {
            backend.set_value(param, 0.0);
        }
    }
}

/// Scheduling access to one value parameter.
pub struct ParamHandle<'a> {
    backend: &'a mut dyn Backend,
    param: AudioParamId,
}

impl<'a> ParamHandle<'a> {
    pub fn new(backend: &'a mut dyn Backend, param: AudioParamId) -> Self {
        Self { backend, param }
    }

    pub fn id(&self) -> AudioParamId {
        self.param
    }

    /// Assign immediately.
    pub fn set(&mut self, value: f32) -> &mut Self {
        self.backend.set_value(self.param, value);
        self
    }

    pub fn set_at(&mut self, value: f32, time: f64) -> &mut Self {
        self.backend.schedule(self.param, ParamEvent::SetValue { value, time });
        self
    }

    pub fn linear_ramp_to(&mut self, value: f32, end_time: f64) -> &mut Self {
        self.backend.schedule(self.param, ParamEvent::LinearRamp { value, end_time });
        self
    }

    pub fn exponential_ramp_to(&mut self, value: f32, end_time: f64) -> &mut Self {
        let value = if value.abs() < MIN_EXPONENTIAL_TARGET {
            MIN_EXPONENTIAL_TARGET
        } else {
            value
        };
        self.backend
            .schedule(self.param, ParamEvent::ExponentialRamp { value, end_time });
        self
    }

    /// Approach `target` from `start_time`; after three time constants the
    /// value is about 95% of the way there.
    pub fn set_target_at(&mut self, target: f32, start_time: f64, time_constant: f64) -> &mut Self {
        self.backend.schedule(
            self.param,
            ParamEvent::SetTarget {
                target,
                start_time,
                time_constant: time_constant.max(MIN_TIME),
            },
        );
        self
    }

    pub fn cancel_scheduled_values(&mut self, time: f64) -> &mut Self {
        self.backend.cancel_scheduled_values(self.param, time);
        self
    }

    pub fn cancel_and_hold(&mut self, time: f64) -> &mut Self {
        self.backend.cancel_and_hold(self.param, time);
        self
    }

    pub fn reset_to_zero(&mut self) -> &mut Self {
        self.set(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{
        backend::{NodeSpec, ParamSlot},
        offline::OfflineRenderer,
    };

    #[test]
    fn test_first_connection_is_reported_once() {
        let mut backend = OfflineRenderer::new(1000.0);
        let gain = backend.create(NodeSpec::Gain);
        let source = backend.create(NodeSpec::ConstantSource);
        let mut param = Param::value(GAIN, backend.param(gain, ParamSlot::Gain).unwrap());

        assert_eq!(param.accept(&mut backend, source).unwrap(), Connection::First);
        assert_eq!(param.accept(&mut backend, source).unwrap(), Connection::Additional);
        assert!(param.is_connected());
    }

    #[test]
    fn test_trigger_params_refuse_wiring() {
        let mut backend = OfflineRenderer::new(1000.0);
        let source = backend.create(NodeSpec::ConstantSource);
        let mut param = Param::trigger(INPUT);

        assert!(matches!(
            param.accept(&mut backend, source),
            Err(Error::TriggerRequiresVoice(name)) if name == INPUT
        ));
        assert!(!param.is_connected());
    }

    #[test]
    fn test_audio_params_are_not_value_params() {
        let param = Param::audio(INPUT, NodeId::from_index(3));
        assert!(matches!(param.automation(), Err(Error::NotAValueParam(_))));
    }

    #[test]
    fn test_exponential_targets_are_clamped() {
        let mut backend = OfflineRenderer::new(1000.0);
        let gain = backend.create(NodeSpec::Gain);
        let id = backend.param(gain, ParamSlot::Gain).unwrap();

        ParamHandle::new(&mut backend, id).exponential_ramp_to(0.0, 1.0);

        assert_eq!(
            backend.events(id).unwrap(),
            &[ParamEvent::ExponentialRamp { value: MIN_EXPONENTIAL_TARGET, end_time: 1.0 }]
        );
    }

    #[test]
    fn test_set_target_time_constant_has_a_floor() {
        let mut backend = OfflineRenderer::new(1000.0);
        let gain = backend.create(NodeSpec::Gain);
        let id = backend.param(gain, ParamSlot::Gain).unwrap();

        ParamHandle::new(&mut backend, id).set_target_at(1.0, 0.0, 0.0);

        assert_eq!(
            backend.events(id).unwrap(),
            &[ParamEvent::SetTarget { target: 1.0, start_time: 0.0, time_constant: MIN_TIME }]
        );
    }
}
