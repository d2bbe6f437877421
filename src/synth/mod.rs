//! The unit arena.
//!
//! A [`Synth`] owns a backend and every unit built on it. Units refer to each
//! other by [`UnitId`], so the graph can contain cycles without shared
//! ownership. All wiring (`attach`), registration and triggering goes
//! through the synth.

pub mod factory;
pub mod voice;

use std::collections::HashSet;

use rand::{rngs::StdRng, SeedableRng};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    engine::{
        backend::{AudioParamId, Backend, NodeId, NodeSpec, ParamSlot},
        offline::OfflineRenderer,
    },
    error::{Error, Result},
    graph::{
        node::{Control, Role, Start, Triggerable, Unit, UnitId},
        param::{Connection, ParamHandle, INPUT},
    },
};

/// Settings shared by every unit built on one synth.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SynthConfig {
    /// Seed for noise buffers and reverb impulse responses.
    pub seed: u64,
    /// Length of the looping buffer behind noise units.
    pub noise_seconds: f32,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            noise_seconds: 1.0,
        }
    }
}

pub struct Synth<B: Backend = OfflineRenderer> {
    pub(crate) backend: B,
    pub(crate) units: Vec<Unit>,
    pub(crate) rng: StdRng,
    pub(crate) config: SynthConfig,
}

impl Synth<OfflineRenderer> {
    /// A synth rendering offline at `sample_rate`.
    pub fn offline(sample_rate: f32) -> Self {
        Self::new(OfflineRenderer::new(sample_rate))
    }
}

impl<B: Backend> Synth<B> {
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, SynthConfig::default())
    }

    pub fn with_config(backend: B, config: SynthConfig) -> Self {
        Self {
            backend,
            units: Vec::new(),
            rng: StdRng::seed_from_u64(config.seed),
            config,
        }
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    pub fn sample_rate(&self) -> f32 {
        self.backend.sample_rate()
    }

    /// The backend's current time in seconds.
    pub fn now(&self) -> f64 {
        self.backend.current_time()
    }

    pub fn unit(&self, id: UnitId) -> Result<&Unit> {
        self.units.get(id.0).ok_or(Error::UnknownUnit(id))
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub(crate) fn unit_mut(&mut self, id: UnitId) -> Result<&mut Unit> {
        self.units.get_mut(id.0).ok_or(Error::UnknownUnit(id))
    }

    /// The node a unit's output comes from.
    pub fn output(&self, id: impl Into<UnitId>) -> Result<NodeId> {
        Ok(self.unit(id.into())?.output())
    }

    pub(crate) fn add_unit(&mut self, unit: Unit) -> UnitId {
        let id = UnitId(self.units.len());
        self.units.push(unit);
        id
    }

    /// The backend parameter behind `slot`, which every node created by
    /// the factories is known to expose.
    pub(crate) fn slot(&self, node: NodeId, slot: ParamSlot) -> Result<AudioParamId> {
        self.backend
            .param(node, slot)
            .ok_or(Error::MissingSlot { node, slot })
    }

    /// A started constant source at `value`, with its offset parameter.
    pub(crate) fn constant_node(&mut self, value: f32) -> Result<(NodeId, AudioParamId)> {
        let node = self.backend.create(NodeSpec::ConstantSource);
        let offset = self.slot(node, ParamSlot::Offset)?;
        self.backend.set_value(offset, value);
        let now = self.backend.current_time();
        self.backend.start(node, now);
        Ok((node, offset))
    }

    pub(crate) fn start_source(&mut self, node: NodeId, start: Start) {
        match start {
            Start::Now => {
                let now = self.backend.current_time();
                self.backend.start(node, now);
            }
            Start::At(time) => self.backend.start(node, time),
            Start::Deferred => {}
        }
    }

    /// Apply a factory default to a parameter of an already added unit.
    pub(crate) fn init_param(&mut self, id: UnitId, name: &str, control: Control) -> Result<()> {
        match control {
            Control::Unset => Ok(()),
            Control::Value(value) => {
                let param = self.unit(id)?.require(name)?.automation()?;
                self.backend.set_value(param, value);
                Ok(())
            }
            Control::Units(sources) => self.attach_from(sources, id, Some(name)),
        }
    }

    /// Feed `source`'s output into `param` of `target` (its `"in"` when
    /// `param` is `None`).
    ///
    /// The first live source connected to a value parameter zeroes the
    /// parameter's own value, so the static default stops adding into the
    /// signal. A voice attached to a trigger parameter registers the target
    /// with the voice instead of wiring audio.
    pub fn attach(
        &mut self,
        source: impl Into<UnitId>,
        target: impl Into<UnitId>,
        param: Option<&str>,
    ) -> Result<()> {
        let (source, target) = (source.into(), target.into());
        let name = param.unwrap_or(INPUT);

        let source_unit = self.unit(source)?;
        let (output, source_is_voice) = (source_unit.output(), source_unit.is_voice());

        let Self { backend, units, .. } = &mut *self;
        let param = units
            .get_mut(target.0)
            .ok_or(Error::UnknownUnit(target))?
            .require_mut(name)?;

        if param.is_trigger() {
            if !source_is_voice {
                return Err(Error::TriggerRequiresVoice(name.to_string()));
            }
            return self.register(source, target);
        }

        if param.accept(backend, output)? == Connection::First {
            param.reset_to_zero(backend);
        }
        tracing::debug!("Attached {} to `{}` of {}", source, name, target);
        Ok(())
    }

    /// Attach each of `sources`, in order, to `param` of `target`.
    pub fn attach_from(
        &mut self,
        sources: impl IntoIterator<Item = UnitId>,
        target: impl Into<UnitId>,
        param: Option<&str>,
    ) -> Result<()> {
        let target = target.into();
        for source in sources {
            self.attach(source, target, param)?;
        }
        Ok(())
    }

    /// Have `target` receive the note events of `voice`. No audio is wired.
    pub fn register(&mut self, voice: impl Into<UnitId>, target: impl Into<UnitId>) -> Result<()> {
        let (voice, target) = (voice.into(), target.into());
        self.unit(target)?;
        match &mut self.unit_mut(voice)?.role {
            Role::Voice(registry) => registry.register(target),
            _ => return Err(Error::NotAVoice(voice)),
        }
        tracing::debug!("Registered {} with voice {}", target, voice);
        Ok(())
    }

    /// Scheduling access to a value parameter.
    pub fn param(&mut self, unit: impl Into<UnitId>, name: &str) -> Result<ParamHandle<'_>> {
        let param = self.unit(unit.into())?.require(name)?.automation()?;
        Ok(ParamHandle::new(&mut self.backend, param))
    }

    /// Send a note-on at `time` to every unit registered with `voice`.
    pub fn on(&mut self, voice: impl Into<UnitId>, time: f64, frequency: f32) -> Result<()> {
        tracing::trace!("Note on at {:.4}s ({} Hz)", time, frequency);
        self.broadcast(voice.into(), &mut HashSet::new(), &mut |role, backend| {
            role.on(backend, time, frequency)
        })
    }

    /// Send a note-off at `time` to every unit registered with `voice`.
    pub fn off(&mut self, voice: impl Into<UnitId>, time: f64) -> Result<()> {
        tracing::trace!("Note off at {:.4}s", time);
        self.broadcast(voice.into(), &mut HashSet::new(), &mut |role, backend| {
            role.off(backend, time)
        })
    }

    fn broadcast(
        &mut self,
        voice: UnitId,
        visited: &mut HashSet<UnitId>,
        event: &mut dyn FnMut(&mut Role, &mut dyn Backend),
    ) -> Result<()> {
        let registrants = match &self.unit(voice)?.role {
            Role::Voice(registry) => registry.registrants().to_vec(),
            _ => return Err(Error::NotAVoice(voice)),
        };
        visited.insert(voice);

        for id in registrants {
            if self.unit(id)?.is_voice() {
                if !visited.contains(&id) {
                    self.broadcast(id, visited, event)?;
                }
                continue;
            }
            let Self { backend, units, .. } = &mut *self;
            if let Some(unit) = units.get_mut(id.0) {
                event(&mut unit.role, backend);
            }
        }
        Ok(())
    }

    /// Start a source unit created with [`Start::Deferred`].
    pub fn start(&mut self, unit: impl Into<UnitId>, time: f64) -> Result<()> {
        let unit = unit.into();
        let node = self.unit(unit)?.source().ok_or(Error::NotStartable(unit))?;
        self.backend.start(node, time);
        Ok(())
    }

    pub fn stop(&mut self, unit: impl Into<UnitId>, time: f64) -> Result<()> {
        let unit = unit.into();
        let node = self.unit(unit)?.source().ok_or(Error::NotStartable(unit))?;
        self.backend.stop(node, time);
        Ok(())
    }

    /// Disconnect a unit's output from everything it feeds. Upstream sources
    /// stay connected.
    pub fn disconnect(&mut self, unit: impl Into<UnitId>) -> Result<()> {
        let unit = unit.into();
        let output = self.output(unit)?;
        self.backend.disconnect(output);
        tracing::debug!("Disconnected {}", unit);
        Ok(())
    }
}
