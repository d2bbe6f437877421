/*
ADSR Envelopes as Scheduled Automation
======================================

An envelope unit is a constant source whose level is automated. Nothing is
computed per sample here: `on` and `off` schedule set-target curves on the
level parameter and the backend renders them.

Vocabulary
----------

  base            The resting level, before attack and after release.
  attack_target   The level the attack heads for.
  sustain_level   The level the decay settles on while the note is held.
  start_delay     Seconds between `on` and the start of the attack.
  auto_pulse      If > 0, the envelope releases itself this long after `on`.


The Shape: Exponential Approaches
---------------------------------

  Level
  target ┐   ╭─╮
         │  ╱   ╲___________
  sustain│ │                ╲
         │ │                 ╲_
  base   └─┴───────────────────‾‾──→ Time
          D  A   D     S       R

Each segment is a set-target curve with a time-constant of one third of the
segment's duration, so it covers ~95% of the distance in the given time.
The decay curve is scheduled to begin when the attack time has elapsed,
whether or not the attack has arrived.


The State Machine
-----------------

    ┌──────────┐   on    ┌─────────┐   off   ┌──────────┐
    │ Pristine │ ──────→ │ Engaged │ ──────→ │ Released │
    └──────────┘         └─────────┘         └──────────┘
                              ↑      on           │
                              └───────────────────┘

  on  (Pristine)   set base at t, no cancellation (nothing to cancel).
  on  (otherwise)  cancel everything from t + start_delay, then attack.
                   Retriggering mid-envelope glides from wherever the level
                   is at the cancellation point.
  off (Engaged)    cancel from t, release toward base.
  off (otherwise)  set base at t. Repeated offs just reassert the base.
*/

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    engine::backend::{AudioParamId, Backend},
    error::Result,
    graph::{
        node::{Control, Role, Triggerable, Unit, UnitId, UnitKind},
        param::{Param, ParamHandle, INPUT, VALUE},
    },
    synth::Synth,
    MIN_TIME,
};

/// Envelope shape. Times are in seconds.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adsr {
    pub start_delay: f64,
    pub base: f32,
    pub attack_target: f32,
    pub attack_time: f64,
    pub decay_time: f64,
    pub sustain_level: f32,
    pub release_time: f64,
    pub auto_pulse: f64,
}

impl Default for Adsr {
    /// Stays on until released.
    fn default() -> Self {
        Self {
            start_delay: 0.0,
            base: 0.0,
            attack_target: 1.0,
            attack_time: 1e-3,
            decay_time: 0.0,
            sustain_level: 1.0,
            release_time: 0.0,
            auto_pulse: 0.0,
        }
    }
}

impl Adsr {
    /// Attack, decay, sustain and release with every other field defaulted.
    pub fn new(attack_time: f64, decay_time: f64, sustain_level: f32, release_time: f64) -> Self {
        Self {
            attack_time,
            decay_time,
            sustain_level,
            release_time,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    /// Never triggered. Counts as released for `off`.
    Pristine,
    Engaged,
    Released,
}

#[inline]
fn time_constant(duration: f64) -> f64 {
    (duration / 3.0).max(MIN_TIME)
}

#[derive(Debug, Clone)]
pub struct Envelope {
    adsr: Adsr,
    stage: EnvelopeStage,
    level: AudioParamId,
}

impl Envelope {
    pub fn new(adsr: Adsr, level: AudioParamId) -> Self {
        Self {
            adsr,
            stage: EnvelopeStage::Pristine,
            level,
        }
    }

    pub fn adsr(&self) -> &Adsr {
        &self.adsr
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }
}

impl Triggerable for Envelope {
    fn on(&mut self, backend: &mut dyn Backend, time: f64, _frequency: f32) {
        let adsr = self.adsr;
        let attack_start = time + adsr.start_delay;

        let mut level = ParamHandle::new(backend, self.level);
        if self.stage == EnvelopeStage::Pristine {
            level.set_at(adsr.base, time);
        } else {
            level.cancel_scheduled_values(attack_start);
        }
        level
            .set_target_at(adsr.attack_target, attack_start, time_constant(adsr.attack_time))
            .set_target_at(
                adsr.sustain_level,
                attack_start + adsr.attack_time,
                time_constant(adsr.decay_time),
            );
        self.stage = EnvelopeStage::Engaged;

        if adsr.auto_pulse > 0.0 {
            self.off(backend, time + adsr.auto_pulse);
        }
    }

    fn off(&mut self, backend: &mut dyn Backend, time: f64) {
        let mut level = ParamHandle::new(backend, self.level);
        match self.stage {
            EnvelopeStage::Engaged => {
                level
                    .cancel_scheduled_values(time)
                    .set_target_at(self.adsr.base, time, time_constant(self.adsr.release_time));
                self.stage = EnvelopeStage::Released;
            }
            EnvelopeStage::Pristine | EnvelopeStage::Released => {
                level.set_at(self.adsr.base, time);
            }
        }
    }
}

impl<B: Backend> Synth<B> {
    /// An envelope unit. Its output is the envelope level; attach a voice to
    /// `trigger` (or later to its `"in"`) to have it follow the voice's notes.
    pub fn envelope(&mut self, adsr: Adsr, trigger: impl Into<Control>) -> Result<UnitId> {
        let (node, level) = self.constant_node(adsr.base)?;

        let mut unit = Unit::new(UnitKind::Envelope, node).with_role(Role::Envelope(Envelope::new(adsr, level)));
        unit.add_param(Param::value(VALUE, level));
        unit.add_param(Param::trigger(INPUT));

        let id = self.add_unit(unit);
        tracing::debug!("Created envelope {} ({:?})", id, adsr);
        self.init_param(id, INPUT, trigger.into())?;
        Ok(id)
    }
}
