use thiserror::Error;

use crate::{
    engine::backend::{NodeId, ParamSlot},
    graph::{UnitId, UnitKind},
};

/// Everything that can go wrong while building, wiring or exporting a graph.
///
/// Graph errors are configuration errors: they surface at construction time
/// and are never retried.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unit {0} does not exist")]
    UnknownUnit(UnitId),

    #[error("{kind} unit has no parameter named `{name}`")]
    UnknownParam { kind: UnitKind, name: String },

    #[error("parameter `{0}` is not a value parameter and cannot be scheduled")]
    NotAValueParam(String),

    #[error("trigger parameter `{0}` only accepts a voice")]
    TriggerRequiresVoice(String),

    #[error("unit {0} is not a voice")]
    NotAVoice(UnitId),

    #[error("unit {0} has no startable source")]
    NotStartable(UnitId),

    #[error("backend {node} has no {slot:?} parameter")]
    MissingSlot { node: NodeId, slot: ParamSlot },

    #[error("spectrum needs at least one partial")]
    EmptySpectrum,

    #[error("spectrum has {frequencies} frequencies but {gains} gains")]
    SpectrumMismatch { frequencies: usize, gains: usize },

    #[error("no tone named `{0}`")]
    UnknownTone(String),

    #[error("sample slot {slot} is outside the module's sample table (1..={max})")]
    SampleSlot { slot: usize, max: usize },

    #[error("module buffer is {len} bytes but at least {needed} are required")]
    TruncatedModule { len: usize, needed: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Wav(#[from] hound::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
