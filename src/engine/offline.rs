/*
Offline Rendering
=================

The renderer owns every primitive node, the connections between them and
each node's parameter automation. Rendering happens in blocks of
`RENDER_QUANTUM` frames:

  1. Order the nodes reachable from the destination so that every node comes
     after the nodes feeding it (depth-first post-order over audio and
     parameter connections).
  2. For each node in that order:
       input  = sum of the outputs connected to its audio input
       param  = automation value at each frame
                + sum of the outputs connected to that parameter
       output = kernel(input, params)
  3. The destination's output is the block's mix.

A graph may contain cycles. A connection whose source has not been rendered
yet in the current block reads that source's output from the previous block,
so every feedback loop carries one block of delay.

Source nodes (oscillators, buffer players, constants) output silence outside
the window between their start and stop times.
*/

use crate::{
    dsp::{
        buffer::BufferPlayer,
        compressor::{Compressor, CompressorSettings},
        convolver::Convolver,
        distortion::WaveShaper,
        filter::SVFilter,
        oscillator::Oscillator,
    },
    engine::{
        automation::{Automation, ParamEvent},
        backend::{AudioParamId, Backend, Destination, NodeId, NodeSpec, ParamSlot},
    },
    RENDER_QUANTUM,
};

pub const DEFAULT_SAMPLE_RATE: f32 = 44_100.0;

enum Kernel {
    Gain,
    Constant,
    Oscillator(Oscillator),
    Buffer(BufferPlayer),
    Filter(SVFilter),
    WaveShaper(WaveShaper),
    Convolver(Convolver),
    Compressor(Compressor),
}

struct ParamState {
    slot: ParamSlot,
    automation: Automation,
    values: Vec<f32>,
}

struct Node {
    kernel: Kernel,
    params: Vec<ParamState>,
    is_source: bool,
    start: Option<f64>,
    stop: Option<f64>,
}

fn values(params: &[ParamState], slot: ParamSlot) -> &[f32] {
    params
        .iter()
        .find(|p| p.slot == slot)
        .map(|p| p.values.as_slice())
        .unwrap_or_default()
}

impl Node {
    fn new(spec: NodeSpec, sample_rate: f32) -> Self {
        let params = spec
            .default_params()
            .iter()
            .map(|&(slot, default)| ParamState {
                slot,
                automation: Automation::new(default),
                values: vec![default; RENDER_QUANTUM],
            })
            .collect();
        let is_source = spec.is_source();

        let kernel = match spec {
            NodeSpec::Gain => Kernel::Gain,
            NodeSpec::ConstantSource => Kernel::Constant,
            NodeSpec::Oscillator { waveform } => Kernel::Oscillator(Oscillator::new(&waveform)),
            NodeSpec::BufferSource { buffer, looping } => {
                Kernel::Buffer(BufferPlayer::new(&buffer, looping))
            }
            NodeSpec::Filter { kind } => Kernel::Filter(SVFilter::new(kind)),
            NodeSpec::WaveShaper { curve } => Kernel::WaveShaper(WaveShaper::new(curve)),
            NodeSpec::Convolver { buffer, normalize } => {
                if (buffer.sample_rate() - sample_rate).abs() > f32::EPSILON {
                    tracing::warn!(
                        "Convolver impulse response at {} Hz used at {} Hz",
                        buffer.sample_rate(),
                        sample_rate
                    );
                }
                Kernel::Convolver(Convolver::new(&buffer, normalize, RENDER_QUANTUM))
            }
            NodeSpec::Compressor => Kernel::Compressor(Compressor::new()),
        };

        Self {
            kernel,
            params,
            is_source,
            start: None,
            stop: None,
        }
    }

    fn param_mut(&mut self, slot: ParamSlot) -> Option<&mut ParamState> {
        self.params.iter_mut().find(|p| p.slot == slot)
    }

    fn active(&self, time: f64) -> bool {
        if !self.is_source {
            return true;
        }
        let started = self.start.is_some_and(|start| time >= start);
        let stopped = self.stop.is_some_and(|stop| time >= stop);
        started && !stopped
    }

    fn process(&mut self, input: &[f32], first_frame: u64, sample_rate: f32, out: &mut [f32]) {
        let gate: Vec<bool> = (0..out.len())
            .map(|i| self.active((first_frame + i as u64) as f64 / sample_rate as f64))
            .collect();
        let Node { kernel, params, .. } = self;

        match kernel {
            Kernel::Gain => {
                let gain = values(params, ParamSlot::Gain);
                for ((o, &x), &g) in out.iter_mut().zip(input).zip(gain) {
                    *o = x * g;
                }
            }
            Kernel::Constant => {
                let offset = values(params, ParamSlot::Offset);
                for ((o, &v), &on) in out.iter_mut().zip(offset).zip(&gate) {
                    *o = if on { v } else { 0.0 };
                }
            }
            Kernel::Oscillator(osc) => {
                let frequency = values(params, ParamSlot::Frequency);
                let detune = values(params, ParamSlot::Detune);
                for (i, o) in out.iter_mut().enumerate() {
                    *o = if gate[i] {
                        let cents = detune[i];
                        let hz = if cents == 0.0 {
                            frequency[i]
                        } else {
                            frequency[i] * 2f32.powf(cents / 1200.0)
                        };
                        osc.next_sample(hz, sample_rate)
                    } else {
                        0.0
                    };
                }
            }
            Kernel::Buffer(player) => {
                let rate = values(params, ParamSlot::PlaybackRate);
                let detune = values(params, ParamSlot::Detune);
                for (i, o) in out.iter_mut().enumerate() {
                    *o = if gate[i] {
                        player.next_sample(rate[i], detune[i], sample_rate)
                    } else {
                        0.0
                    };
                }
            }
            Kernel::Filter(filter) => {
                let cutoff = values(params, ParamSlot::Frequency);
                let q = values(params, ParamSlot::Q);
                let gain = values(params, ParamSlot::FilterGain);
                for (i, (o, &x)) in out.iter_mut().zip(input).enumerate() {
                    filter.set_params(cutoff[i], q[i], gain[i], sample_rate);
                    *o = filter.process_sample(x);
                }
            }
            Kernel::WaveShaper(shaper) => shaper.process(input, out),
            Kernel::Convolver(convolver) => convolver.process(input, out),
            Kernel::Compressor(compressor) => {
                let threshold = values(params, ParamSlot::Threshold);
                let knee = values(params, ParamSlot::Knee);
                let ratio = values(params, ParamSlot::Ratio);
                let attack = values(params, ParamSlot::Attack);
                let release = values(params, ParamSlot::Release);
                for (i, (o, &x)) in out.iter_mut().zip(input).enumerate() {
                    let settings = CompressorSettings {
                        threshold: threshold[i],
                        knee: knee[i],
                        ratio: ratio[i],
                        attack: attack[i],
                        release: release[i],
                    };
                    *o = compressor.next_sample(x, &settings, sample_rate);
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Edge {
    source: NodeId,
    destination: Destination,
}

impl Edge {
    fn target(&self) -> NodeId {
        match self.destination {
            Destination::Node(node) => node,
            Destination::Param(param) => param.node,
        }
    }
}

/// Render order and per-node fan-in, rebuilt whenever the graph changes.
struct Routing {
    order: Vec<usize>,
    inputs: Vec<Vec<usize>>,
    param_inputs: Vec<Vec<(ParamSlot, usize)>>,
}

impl Routing {
    fn build(node_count: usize, edges: &[Edge], root: usize) -> Self {
        let mut inputs = vec![Vec::new(); node_count];
        let mut param_inputs = vec![Vec::new(); node_count];
        let mut dependencies: Vec<Vec<usize>> = vec![Vec::new(); node_count];

        for edge in edges {
            let source = edge.source.index();
            match edge.destination {
                Destination::Node(node) => inputs[node.index()].push(source),
                Destination::Param(param) => param_inputs[param.node.index()].push((param.slot, source)),
            }
            dependencies[edge.target().index()].push(source);
        }

        let mut order = Vec::with_capacity(node_count);
        let mut visited = vec![false; node_count];
        let mut stack = vec![(root, 0usize)];
        visited[root] = true;

        while let Some(top) = stack.last_mut() {
            let (node, next) = *top;
            match dependencies[node].get(next) {
                Some(&source) => {
                    top.1 += 1;
                    if !visited[source] {
                        visited[source] = true;
                        stack.push((source, 0));
                    }
                }
                None => {
                    order.push(node);
                    stack.pop();
                }
            }
        }

        Self { order, inputs, param_inputs }
    }
}

/// A [`Backend`] that renders the configured graph into a mono buffer.
///
/// The destination node (created first) is a gain stage; everything
/// connected to it is mixed into the rendered output. Time only moves when
/// a render call consumes blocks.
pub struct OfflineRenderer {
    sample_rate: f32,
    frames_rendered: u64,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    routing: Option<Routing>,
    outputs: Vec<Vec<f32>>,
    previous: Vec<Vec<f32>>,
    rendered: Vec<bool>,
    input: Vec<f32>,
}

impl Default for OfflineRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}

impl OfflineRenderer {
    pub fn new(sample_rate: f32) -> Self {
        let mut renderer = Self {
            sample_rate,
            frames_rendered: 0,
            nodes: Vec::new(),
            edges: Vec::new(),
            routing: None,
            outputs: Vec::new(),
            previous: Vec::new(),
            rendered: Vec::new(),
            input: vec![0.0; RENDER_QUANTUM],
        };
        renderer.create(NodeSpec::Gain);
        renderer
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Scheduled automation events of a parameter, for inspection.
    pub fn events(&self, param: AudioParamId) -> Option<&[ParamEvent]> {
        let node = self.nodes.get(param.node.index())?;
        let state = node.params.iter().find(|p| p.slot == param.slot)?;
        Some(state.automation.events())
    }

    /// The value a parameter's automation has at `time`, ignoring any audio
    /// connected into it.
    pub fn param_value(&self, param: AudioParamId, time: f64) -> Option<f32> {
        let node = self.nodes.get(param.node.index())?;
        let state = node.params.iter().find(|p| p.slot == param.slot)?;
        Some(state.automation.value_at(time))
    }

    /// Render `seconds` of audio from the current time.
    pub fn render(&mut self, seconds: f64) -> Vec<f32> {
        let frames = (seconds.max(0.0) * self.sample_rate as f64).floor() as usize;
        self.render_frames(frames)
    }

    /// Render exactly `frames` samples. Time advances in whole blocks, so a
    /// request that is not a multiple of the block size discards the rest of
    /// the final block.
    pub fn render_frames(&mut self, frames: usize) -> Vec<f32> {
        let destination = self.destination().index();
        let mut mix = Vec::with_capacity(frames);
        while mix.len() < frames {
            self.render_block();
            let take = (frames - mix.len()).min(RENDER_QUANTUM);
            mix.extend_from_slice(&self.outputs[destination][..take]);
        }
        tracing::debug!(
            "Rendered {} frames at {} Hz ({} nodes)",
            frames,
            self.sample_rate,
            self.nodes.len()
        );
        mix
    }

    fn render_block(&mut self) {
        if self.routing.is_none() {
            self.routing = Some(Routing::build(self.nodes.len(), &self.edges, 0));
        }

        let sample_rate = self.sample_rate;
        let Self {
            frames_rendered,
            nodes,
            routing,
            outputs,
            previous,
            rendered,
            input,
            ..
        } = self;
        let Some(routing) = routing.as_ref() else {
            return;
        };

        std::mem::swap(outputs, previous);
        rendered.clear();
        rendered.resize(nodes.len(), false);

        let first_frame = *frames_rendered;
        for &index in &routing.order {
            input.fill(0.0);
            for &source in &routing.inputs[index] {
                let signal = if rendered[source] { &outputs[source] } else { &previous[source] };
                for (acc, &s) in input.iter_mut().zip(signal) {
                    *acc += s;
                }
            }

            let node = &mut nodes[index];
            for param in node.params.iter_mut() {
                param.automation.fill(first_frame, sample_rate as f64, &mut param.values);
            }
            for &(slot, source) in &routing.param_inputs[index] {
                let signal = if rendered[source] { &outputs[source] } else { &previous[source] };
                if let Some(param) = node.param_mut(slot) {
                    for (acc, &s) in param.values.iter_mut().zip(signal) {
                        *acc += s;
                    }
                }
            }

            let mut out = std::mem::take(&mut outputs[index]);
            node.process(input, first_frame, sample_rate, &mut out);
            outputs[index] = out;
            rendered[index] = true;
        }

        *frames_rendered += RENDER_QUANTUM as u64;
    }

    fn node_mut(&mut self, node: NodeId) -> Option<&mut Node> {
        let found = self.nodes.get_mut(node.index());
        if found.is_none() {
            tracing::warn!("Ignoring call on unknown {}", node);
        }
        found
    }

    fn automation_mut(&mut self, param: AudioParamId) -> Option<&mut Automation> {
        let state = self.node_mut(param.node)?.param_mut(param.slot);
        if state.is_none() {
            tracing::warn!("{} has no {:?} parameter", param.node, param.slot);
        }
        state.map(|p| &mut p.automation)
    }
}

impl Backend for OfflineRenderer {
    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn current_time(&self) -> f64 {
        self.frames_rendered as f64 / self.sample_rate as f64
    }

    fn destination(&self) -> NodeId {
        NodeId::from_index(0)
    }

    fn create(&mut self, spec: NodeSpec) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        tracing::trace!("Creating {} as {:?}", id, std::mem::discriminant(&spec));
        self.nodes.push(Node::new(spec, self.sample_rate));
        self.outputs.push(vec![0.0; RENDER_QUANTUM]);
        self.previous.push(vec![0.0; RENDER_QUANTUM]);
        self.routing = None;
        id
    }

    fn param(&self, node: NodeId, slot: ParamSlot) -> Option<AudioParamId> {
        let state = self.nodes.get(node.index())?;
        state
            .params
            .iter()
            .any(|p| p.slot == slot)
            .then(|| AudioParamId::new(node, slot))
    }

    fn connect(&mut self, source: NodeId, destination: Destination) {
        let edge = Edge { source, destination };
        let count = self.nodes.len();
        if source.index() >= count || edge.target().index() >= count {
            tracing::warn!("Ignoring connection {} -> {:?}: unknown node", source, destination);
            return;
        }
        if self.edges.contains(&edge) {
            return;
        }
        tracing::trace!("Connecting {} -> {:?}", source, destination);
        self.edges.push(edge);
        self.routing = None;
    }

    fn disconnect(&mut self, source: NodeId) {
        self.edges.retain(|edge| edge.source != source);
        self.routing = None;
    }

    fn start(&mut self, node: NodeId, time: f64) {
        if let Some(node) = self.node_mut(node) {
            node.start = Some(time);
        }
    }

    fn stop(&mut self, node: NodeId, time: f64) {
        if let Some(node) = self.node_mut(node) {
            node.stop = Some(time);
        }
    }

    fn set_value(&mut self, param: AudioParamId, value: f32) {
        let now = self.current_time();
        if let Some(automation) = self.automation_mut(param) {
            automation.set_value(value, now);
        }
    }

    fn schedule(&mut self, param: AudioParamId, event: ParamEvent) {
        tracing::trace!("{} {:?}: {:?}", param.node, param.slot, event);
        if let Some(automation) = self.automation_mut(param) {
            automation.insert(event);
        }
    }

    fn cancel_scheduled_values(&mut self, param: AudioParamId, time: f64) {
        if let Some(automation) = self.automation_mut(param) {
            automation.cancel_scheduled_values(time);
        }
    }

    fn cancel_and_hold(&mut self, param: AudioParamId, time: f64) {
        if let Some(automation) = self.automation_mut(param) {
            automation.cancel_and_hold(time);
        }
    }
}
