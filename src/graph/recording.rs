//! A backend that only records what it is asked to do.

use crate::engine::backend::{AudioParamId, Backend, Destination, NodeId, NodeSpec, ParamEvent, ParamSlot};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Create(NodeId),
    Connect(NodeId, Destination),
    Disconnect(NodeId),
    Start(NodeId, f64),
    Stop(NodeId, f64),
    SetValue(AudioParamId, f32),
    Schedule(AudioParamId, ParamEvent),
    Cancel(AudioParamId, f64),
    CancelAndHold(AudioParamId, f64),
}

#[derive(Debug)]
pub(crate) struct RecordingBackend {
    pub calls: Vec<Call>,
    nodes: usize,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self { calls: Vec::new(), nodes: 1 }
    }

    pub fn take(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.calls)
    }
}

impl Backend for RecordingBackend {
    fn sample_rate(&self) -> f32 {
        48_000.0
    }

    fn current_time(&self) -> f64 {
        0.0
    }

    fn destination(&self) -> NodeId {
        NodeId::from_index(0)
    }

    fn create(&mut self, _spec: NodeSpec) -> NodeId {
        let id = NodeId::from_index(self.nodes);
        self.nodes += 1;
        self.calls.push(Call::Create(id));
        id
    }

    fn param(&self, node: NodeId, slot: ParamSlot) -> Option<AudioParamId> {
        Some(AudioParamId::new(node, slot))
    }

    fn connect(&mut self, source: NodeId, destination: Destination) {
        self.calls.push(Call::Connect(source, destination));
    }

    fn disconnect(&mut self, source: NodeId) {
        self.calls.push(Call::Disconnect(source));
    }

    fn start(&mut self, node: NodeId, time: f64) {
        self.calls.push(Call::Start(node, time));
    }

    fn stop(&mut self, node: NodeId, time: f64) {
        self.calls.push(Call::Stop(node, time));
    }

    fn set_value(&mut self, param: AudioParamId, value: f32) {
        self.calls.push(Call::SetValue(param, value));
    }

    fn schedule(&mut self, param: AudioParamId, event: ParamEvent) {
        self.calls.push(Call::Schedule(param, event));
    }

    fn cancel_scheduled_values(&mut self, param: AudioParamId, time: f64) {
        self.calls.push(Call::Cancel(param, time));
    }

    fn cancel_and_hold(&mut self, param: AudioParamId, time: f64) {
        self.calls.push(Call::CancelAndHold(param, time));
    }
}
