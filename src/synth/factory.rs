use crate::{error::Result, synth::voice::Voice, Synth};

/// Builds an instrument on a synth and returns the voice that plays it.
///
/// This is the instrument design layer: describe the sound once, and the
/// recorder and bake pipeline build a fresh copy on their own offline synth
/// for every render.
pub trait VoiceFactory {
    fn create_voice(&self, synth: &mut Synth) -> Result<Voice>;
}

impl<F> VoiceFactory for F
where
    F: Fn(&mut Synth) -> Result<Voice>,
{
    fn create_voice(&self, synth: &mut Synth) -> Result<Voice> {
        self(synth)
    }
}
