use std::fmt;

use crate::{
    engine::backend::{Backend, NodeId},
    error::{Error, Result},
    graph::{
        envelope::Envelope,
        frequency::{FrequencyController, Program},
        param::Param,
    },
    synth::voice::VoiceRegistry,
};

/// Handle to a unit owned by a [`Synth`](crate::Synth).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(pub(crate) usize);

impl UnitId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    Gain,
    Constant,
    Oscillator,
    Spectrum,
    Buffer,
    Noise,
    Pulse,
    Filter,
    Distortion,
    Convolver,
    Compressor,
    Envelope,
    Frequency,
    Program,
    Voice,
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UnitKind::Gain => "gain",
            UnitKind::Constant => "constant",
            UnitKind::Oscillator => "oscillator",
            UnitKind::Spectrum => "spectrum",
            UnitKind::Buffer => "buffer",
            UnitKind::Noise => "noise",
            UnitKind::Pulse => "pulse",
            UnitKind::Filter => "filter",
            UnitKind::Distortion => "distortion",
            UnitKind::Convolver => "convolver",
            UnitKind::Compressor => "compressor",
            UnitKind::Envelope => "envelope",
            UnitKind::Frequency => "frequency",
            UnitKind::Program => "program",
            UnitKind::Voice => "voice",
        };
        f.write_str(name)
    }
}

/// Initial setting of a parameter: nothing, a number, or source units.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Control {
    #[default]
    Unset,
    Value(f32),
    Units(Vec<UnitId>),
}

impl Control {
    /// The literal, or `fallback` when the control is unset or unit-driven.
    pub fn value_or(&self, fallback: f32) -> f32 {
        match self {
            Control::Value(value) => *value,
            _ => fallback,
        }
    }
}

impl From<f32> for Control {
    fn from(value: f32) -> Self {
        Control::Value(value)
    }
}

impl From<UnitId> for Control {
    fn from(unit: UnitId) -> Self {
        Control::Units(vec![unit])
    }
}

impl From<Vec<UnitId>> for Control {
    fn from(units: Vec<UnitId>) -> Self {
        Control::Units(units)
    }
}

impl From<&[UnitId]> for Control {
    fn from(units: &[UnitId]) -> Self {
        Control::Units(units.to_vec())
    }
}

impl<const N: usize> From<[UnitId; N]> for Control {
    fn from(units: [UnitId; N]) -> Self {
        Control::Units(units.to_vec())
    }
}

/// When a source unit starts producing sound.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Start {
    /// At the backend's current time.
    #[default]
    Now,
    At(f64),
    /// Not until [`Synth::start`](crate::Synth::start) is called.
    Deferred,
}

/// Units that react to a voice's note events.
///
/// Both methods default to doing nothing, so only units with trigger
/// behaviour need to implement them.
pub trait Triggerable {
    fn on(&mut self, _backend: &mut dyn Backend, _time: f64, _frequency: f32) {
        // Default: do nothing
    }

    fn off(&mut self, _backend: &mut dyn Backend, _time: f64) {
        // Default: do nothing
    }
}

/// What a unit does beyond routing audio.
#[derive(Debug, Clone)]
pub enum Role {
    Plain,
    Envelope(Envelope),
    Frequency(FrequencyController),
    Program(Program),
    Voice(VoiceRegistry),
}

impl Triggerable for Role {
    fn on(&mut self, backend: &mut dyn Backend, time: f64, frequency: f32) {
        match self {
            Role::Envelope(envelope) => envelope.on(backend, time, frequency),
            Role::Frequency(controller) => controller.on(backend, time, frequency),
            Role::Program(program) => program.on(backend, time, frequency),
            Role::Plain | Role::Voice(_) => {}
        }
    }

    fn off(&mut self, backend: &mut dyn Backend, time: f64) {
        match self {
            Role::Envelope(envelope) => envelope.off(backend, time),
            Role::Frequency(controller) => controller.off(backend, time),
            Role::Program(program) => program.off(backend, time),
            Role::Plain | Role::Voice(_) => {}
        }
    }
}

/// A processing unit: one audio output, named parameters, the backend nodes
/// it created and any helper units it depends on.
#[derive(Debug, Clone)]
pub struct Unit {
    kind: UnitKind,
    output: NodeId,
    params: Vec<Param>,
    nodes: Vec<NodeId>,
    helpers: Vec<UnitId>,
    source: Option<NodeId>,
    pub(crate) role: Role,
}

impl Unit {
    pub(crate) fn new(kind: UnitKind, output: NodeId) -> Self {
        Self {
            kind,
            output,
            params: Vec::new(),
            nodes: vec![output],
            helpers: Vec::new(),
            source: None,
            role: Role::Plain,
        }
    }

    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    /// The node every downstream connection reads from.
    pub fn output(&self) -> NodeId {
        self.output
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name() == name)
    }

    /// Like [`Unit::param`], but a missing name is an error.
    pub fn require(&self, name: &str) -> Result<&Param> {
        self.param(name).ok_or_else(|| Error::UnknownParam {
            kind: self.kind,
            name: name.to_string(),
        })
    }

    pub(crate) fn require_mut(&mut self, name: &str) -> Result<&mut Param> {
        let kind = self.kind;
        self.params
            .iter_mut()
            .find(|p| p.name() == name)
            .ok_or_else(|| Error::UnknownParam {
                kind,
                name: name.to_string(),
            })
    }

    /// Backend nodes created for this unit, output first.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn helpers(&self) -> &[UnitId] {
        &self.helpers
    }

    /// The startable node, for oscillator and buffer units.
    pub fn source(&self) -> Option<NodeId> {
        self.source
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn is_voice(&self) -> bool {
        matches!(self.role, Role::Voice(_))
    }

    pub(crate) fn add_param(&mut self, param: Param) {
        debug_assert!(self.param(param.name()).is_none(), "duplicate parameter {}", param.name());
        self.params.push(param);
    }

    pub(crate) fn own(&mut self, node: NodeId) {
        self.nodes.push(node);
    }

    pub(crate) fn add_helper(&mut self, unit: UnitId) {
        self.helpers.push(unit);
    }

    pub(crate) fn set_source(&mut self, node: NodeId) {
        self.source = Some(node);
    }

    pub(crate) fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}
