//! Getting sound out: offline recording, 8-bit export and tracker modules.

/// Note numbers and frequencies.
pub mod converter;
/// Quantisation and file output.
pub mod export;
/// Render one note of a voice offline.
pub mod record;
/// Sample tables of 31-sample tracker modules, and the bake pipeline.
pub mod tracker;
