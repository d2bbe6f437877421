//! Driving frequencies.
//!
//! A frequency controller is a constant source whose level is the note
//! frequency. Voices own one and set it on every `on`; oscillators, filters
//! and frequency-controlled buffers read it through their `"frequency"`
//! parameter. With a portamento time the level glides to each new note
//! instead of jumping.
//!
//! Frequency-driven units do not connect the controller straight into the
//! backend's frequency parameter. They go through a *frequency helper*: a
//! gain stage scaling the incoming frequency into whatever the backend
//! control expects (a playback rate for buffers, a table rate for spectra),
//! fed by a constant when the caller gave a plain number.

use crate::{
    engine::backend::{AudioParamId, Backend, Destination, NodeId},
    error::Result,
    graph::{
        amplify::GainConfig,
        node::{Control, Role, Triggerable, Unit, UnitId, UnitKind},
        param::{Param, ParamHandle, FREQUENCY, GAIN, INPUT, SCALE, VALUE},
    },
    synth::Synth,
};

#[derive(Debug, Clone)]
pub struct FrequencyController {
    portamento: f64,
    previous: f32,
    level: AudioParamId,
}

impl FrequencyController {
    pub fn new(portamento: f64, level: AudioParamId) -> Self {
        Self {
            portamento,
            previous: 0.0,
            level,
        }
    }

    pub fn portamento(&self) -> f64 {
        self.portamento
    }

    /// The last frequency set, or 0 before the first note.
    pub fn previous(&self) -> f32 {
        self.previous
    }
}

impl Triggerable for FrequencyController {
    fn on(&mut self, backend: &mut dyn Backend, time: f64, frequency: f32) {
        let mut level = ParamHandle::new(backend, self.level);
        if self.previous != 0.0 && self.portamento > 0.0 {
            level.set_target_at(frequency, time, self.portamento / 3.0);
        } else {
            level.set_at(frequency, time);
        }
        self.previous = frequency;
    }
}

/// A frequency controller that plays a list of `(offset, value)` steps on
/// every trigger, ignoring the voice's frequency.
#[derive(Debug, Clone)]
pub struct Program {
    controller: FrequencyController,
    steps: Vec<(f64, f32)>,
}

impl Program {
    pub fn new(controller: FrequencyController, steps: Vec<(f64, f32)>) -> Self {
        Self { controller, steps }
    }

    pub fn steps(&self) -> &[(f64, f32)] {
        &self.steps
    }
}

impl Triggerable for Program {
    fn on(&mut self, backend: &mut dyn Backend, time: f64, _frequency: f32) {
        for &(offset, value) in &self.steps {
            self.controller.on(backend, time + offset, value);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrequencyConfig {
    /// Glide time in seconds; 0 jumps.
    pub portamento: f64,
    pub trigger: Control,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgramConfig {
    /// `(seconds after the trigger, value)` pairs.
    pub steps: Vec<(f64, f32)>,
    pub portamento: f64,
    pub trigger: Control,
}

impl<B: Backend> Synth<B> {
    pub fn frequency_controller(&mut self, config: FrequencyConfig) -> Result<UnitId> {
        let (node, level) = self.constant_node(0.0)?;
        let role = Role::Frequency(FrequencyController::new(config.portamento, level));
        let id = self.controller_unit(UnitKind::Frequency, node, level, role, config.trigger)?;
        tracing::debug!("Created frequency controller {} (portamento {}s)", id, config.portamento);
        Ok(id)
    }

    pub fn program(&mut self, config: ProgramConfig) -> Result<UnitId> {
        let (node, level) = self.constant_node(0.0)?;
        let controller = FrequencyController::new(config.portamento, level);
        let steps = config.steps.len();
        let role = Role::Program(Program::new(controller, config.steps));
        let id = self.controller_unit(UnitKind::Program, node, level, role, config.trigger)?;
        tracing::debug!("Created program {} with {} steps", id, steps);
        Ok(id)
    }

    fn controller_unit(
        &mut self,
        kind: UnitKind,
        node: NodeId,
        level: AudioParamId,
        role: Role,
        trigger: Control,
    ) -> Result<UnitId> {
        let mut unit = Unit::new(kind, node).with_role(role);
        unit.add_param(Param::value(VALUE, level));
        unit.add_param(Param::trigger(INPUT));

        let id = self.add_unit(unit);
        self.init_param(id, INPUT, trigger)?;
        Ok(id)
    }

    /// Route a driving frequency into `control` through a scaling stage.
    ///
    /// Adds `"frequency"` and `"scale"` to `unit`. `rate_scale` is the value
    /// `control` should receive for a 1 Hz input. The caller applies the
    /// frequency default with [`Synth::init_param`] once the unit is added;
    /// for unit-driven frequencies that is what wires the sources in.
    pub(crate) fn frequency_helper(
        &mut self,
        unit: &mut Unit,
        control: AudioParamId,
        frequency: &Control,
        rate_scale: f32,
    ) -> Result<()> {
        self.backend.set_value(control, 0.0);

        let scaler = self.gain(GainConfig::default())?;
        let scaler_output = self.output(scaler)?;
        match frequency {
            Control::Units(_) => unit.add_param(Param::audio(FREQUENCY, scaler_output)),
            literal => {
                let constant = self.constant(literal.value_or(0.0))?;
                self.attach(constant, scaler, None)?;
                let offset = self.unit(constant)?.require(VALUE)?.automation()?;
                unit.add_param(Param::value(FREQUENCY, offset));
                unit.add_helper(constant);
            }
        }

        let scale = self.unit(scaler)?.require(GAIN)?.automation()?;
        self.backend.set_value(scale, rate_scale);
        unit.add_param(Param::value(SCALE, scale));

        self.backend.connect(scaler_output, Destination::Param(control));
        unit.add_helper(scaler);
        Ok(())
    }
}
