pub mod dsp; // Buffer synthesis and rendering kernels
pub mod engine; // Backend interface, automation and the offline renderer
pub mod error;
pub mod graph; // Units, parameters, envelopes
pub mod io; // Recording, export, tracker-module patching
pub mod synth; // The unit arena and voices
pub mod voices; // Ready-made tone definitions

pub use engine::{backend::Backend, offline::OfflineRenderer};
pub use error::{Error, Result};
pub use graph::{Control, Start, UnitId};
pub use synth::{voice::Voice, Synth, SynthConfig};

/// Frames rendered per block by the offline renderer.
pub const RENDER_QUANTUM: usize = 128;

/// Shortest time-constant handed to the backend (one sample at 48 kHz).
pub const MIN_TIME: f64 = 1.0 / 48_000.0;
