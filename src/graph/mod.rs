//! Units and the parameters that wire them together.
//!
//! Every factory here is a method on [`Synth`](crate::Synth): it creates the
//! backend nodes a unit needs, registers the unit's parameters and applies the
//! caller's defaults. Units only ever talk to the backend through the synth,
//! so the same graph code drives the offline renderer and any other
//! [`Backend`](crate::Backend).

/// Gain stages, the simplest unit and the output stage of most others.
pub mod amplify;
/// Sample playback, looping noise and pulse tables.
pub mod buffer;
/// Dynamics compression.
pub mod compressor;
/// Constant sources.
pub mod constant;
/// Convolution and generated reverb impulse responses.
pub mod convolver;
/// Wave shaping.
pub mod distortion;
/// ADSR control units.
pub mod envelope;
/// Biquad-style filters with a driving frequency.
pub mod filter;
/// Frequency controllers, programs and the frequency helper.
pub mod frequency;
/// Units, roles and handles.
pub mod node;
/// Tone generators: basic waveforms and additive spectra.
pub mod oscillator;
/// Value, audio and trigger parameters.
pub mod param;

#[cfg(test)]
pub(crate) mod recording;

pub use node::{Control, Role, Start, Triggerable, Unit, UnitId, UnitKind};
