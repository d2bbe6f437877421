use std::{fmt, sync::Arc};

use crate::dsp::{buffer::AudioBuffer, filter::FilterType, oscillator::Waveform};

pub use crate::engine::automation::ParamEvent;

/// Handle to a primitive node owned by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// The automatable inputs a primitive node can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamSlot {
    Gain,
    Frequency,
    Detune,
    Q,
    /// Boost/cut in dB for shelving and peaking filters.
    FilterGain,
    PlaybackRate,
    Offset,
    Threshold,
    Knee,
    Ratio,
    Attack,
    Release,
}

/// One automatable parameter of one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AudioParamId {
    pub node: NodeId,
    pub slot: ParamSlot,
}

impl AudioParamId {
    pub fn new(node: NodeId, slot: ParamSlot) -> Self {
        Self { node, slot }
    }
}

/// Where a node's output can be connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// The node's audio input (summed with every other connection).
    Node(NodeId),
    /// An automatable parameter; the signal is added to its scheduled value.
    Param(AudioParamId),
}

/// What kind of primitive to create.
#[derive(Debug, Clone)]
pub enum NodeSpec {
    Gain,
    Oscillator { waveform: Waveform },
    BufferSource { buffer: Arc<AudioBuffer>, looping: bool },
    Filter { kind: FilterType },
    WaveShaper { curve: Arc<[f32]> },
    Convolver { buffer: Arc<AudioBuffer>, normalize: bool },
    Compressor,
    ConstantSource,
}

impl NodeSpec {
    /// Parameters a node of this kind exposes, with their initial values.
    ///
    /// These follow the Web Audio defaults the toolkit's instruments were
    /// voiced against.
    pub fn default_params(&self) -> &'static [(ParamSlot, f32)] {
        match self {
            NodeSpec::Gain => &[(ParamSlot::Gain, 1.0)],
            NodeSpec::Oscillator { .. } => &[(ParamSlot::Frequency, 440.0), (ParamSlot::Detune, 0.0)],
            NodeSpec::BufferSource { .. } => {
                &[(ParamSlot::PlaybackRate, 1.0), (ParamSlot::Detune, 0.0)]
            }
            NodeSpec::Filter { .. } => &[
                (ParamSlot::Frequency, 350.0),
                (ParamSlot::Q, 1.0),
                (ParamSlot::FilterGain, 0.0),
            ],
            NodeSpec::WaveShaper { .. } | NodeSpec::Convolver { .. } => &[],
            NodeSpec::Compressor => &[
                (ParamSlot::Threshold, -24.0),
                (ParamSlot::Knee, 30.0),
                (ParamSlot::Ratio, 12.0),
                (ParamSlot::Attack, 0.003),
                (ParamSlot::Release, 0.25),
            ],
            NodeSpec::ConstantSource => &[(ParamSlot::Offset, 1.0)],
        }
    }

    /// Source nodes produce silence until started.
    pub fn is_source(&self) -> bool {
        matches!(
            self,
            NodeSpec::Oscillator { .. } | NodeSpec::BufferSource { .. } | NodeSpec::ConstantSource
        )
    }
}

/// The rendering engine the graph layer configures.
///
/// Every call is synchronous and only records intent: scheduled events take
/// effect when the backend renders past their time. The trait is object
/// safe so trigger handlers can take `&mut dyn Backend`.
pub trait Backend {
    fn sample_rate(&self) -> f32;

    /// Current render time in seconds.
    fn current_time(&self) -> f64;

    /// The node whose output is the final mix.
    fn destination(&self) -> NodeId;

    fn create(&mut self, spec: NodeSpec) -> NodeId;

    /// The automatable parameter `slot` of `node`, if the node exposes it.
    fn param(&self, node: NodeId, slot: ParamSlot) -> Option<AudioParamId>;

    fn connect(&mut self, source: NodeId, destination: Destination);

    /// Remove every outgoing connection of `source`.
    fn disconnect(&mut self, source: NodeId);

    fn start(&mut self, node: NodeId, time: f64);

    fn stop(&mut self, node: NodeId, time: f64);

    /// Set the parameter's value immediately.
    fn set_value(&mut self, param: AudioParamId, value: f32);

    fn schedule(&mut self, param: AudioParamId, event: ParamEvent);

    /// Drop every scheduled event at or after `time`.
    fn cancel_scheduled_values(&mut self, param: AudioParamId, time: f64);

    /// Like [`Backend::cancel_scheduled_values`], but freeze the value the
    /// parameter has at `time`.
    fn cancel_and_hold(&mut self, param: AudioParamId, time: f64);
}
