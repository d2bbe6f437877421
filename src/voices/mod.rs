//! Ready-made tone definitions.
//!
//! Each tone is a function building an instrument on a [`Synth`] plus the
//! note it is recorded at: frequency, when the note is released and how long
//! the recording runs. They are the candidates for baking into tracker
//! sample slots, and starting points for your own sounds.
//!
//! # Example
//!
//! ```ignore
//! use tonegraph::{io::record::record, voices};
//!
//! let cowbell = voices::find("cowbell").unwrap();
//! let samples = record(&cowbell.build, &cowbell.settings(16_574.0))?;
//! ```

use std::fmt;

use crate::{
    error::Result,
    io::record::{record, RecordSettings},
    synth::{voice::Voice, Synth},
};

mod bass;
mod click;
mod cowbell;
mod ground_loop;
mod kitten;
mod optical;
mod pad;
mod peyow;
mod reese;
mod rubberband;

pub use bass::bass;
pub use click::click;
pub use cowbell::cowbell;
pub use ground_loop::ground_loop;
pub use kitten::kitten;
pub use optical::optical;
pub use pad::pad;
pub use peyow::peyow;
pub use reese::reese;
pub use rubberband::rubberband;

/// An instrument and the note it is recorded with.
#[derive(Clone, Copy)]
pub struct ToneDef {
    pub name: &'static str,
    pub build: fn(&mut Synth) -> Result<Voice>,
    /// Note frequency in Hz.
    pub frequency: f32,
    /// Seconds after the note starts to release it.
    pub release_after: Option<f64>,
    /// Recording length in seconds.
    pub duration: f64,
}

impl fmt::Debug for ToneDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToneDef")
            .field("name", &self.name)
            .field("frequency", &self.frequency)
            .field("release_after", &self.release_after)
            .field("duration", &self.duration)
            .finish_non_exhaustive()
    }
}

impl ToneDef {
    /// Recording settings for this tone at `sample_rate`.
    pub fn settings(&self, sample_rate: f32) -> RecordSettings {
        RecordSettings {
            sample_rate,
            duration: self.duration,
            frequency: self.frequency,
            release_after: self.release_after,
            seed: 0,
        }
    }

    pub fn record(&self, sample_rate: f32) -> Result<Vec<f32>> {
        record(&self.build, &self.settings(sample_rate))
    }
}

/// Every tone, by name.
pub fn catalogue() -> Vec<ToneDef> {
    vec![
        ToneDef {
            name: "cowbell",
            build: cowbell,
            frequency: 660.0,
            release_after: Some(0.15),
            duration: 0.3,
        },
        ToneDef {
            name: "reese",
            build: reese,
            frequency: 175.0,
            release_after: Some(2.0),
            duration: 2.0,
        },
        ToneDef {
            name: "optical",
            build: optical,
            frequency: 175.0,
            release_after: Some(1.301),
            duration: 3.0,
        },
        ToneDef {
            name: "rubberband",
            build: rubberband,
            frequency: 175.0,
            release_after: Some(1.301),
            duration: 3.0,
        },
        ToneDef {
            name: "pad",
            build: pad,
            frequency: 220.0,
            release_after: Some(0.5),
            duration: 3.0,
        },
        ToneDef {
            name: "bass",
            build: bass,
            frequency: 175.0,
            release_after: Some(1.0),
            duration: 2.0,
        },
        ToneDef {
            name: "click",
            build: click,
            frequency: 100.0,
            release_after: Some(0.1),
            duration: 0.1,
        },
        ToneDef {
            name: "ground_loop",
            build: ground_loop,
            frequency: 50.0,
            release_after: Some(5.0),
            duration: 6.0,
        },
        ToneDef {
            name: "kitten",
            build: kitten,
            frequency: 220.0,
            release_after: Some(0.7),
            duration: 3.0,
        },
        ToneDef {
            name: "peyow",
            build: peyow,
            frequency: 175.0,
            release_after: Some(0.5),
            duration: 1.0,
        },
    ]
}

pub fn find(name: &str) -> Option<ToneDef> {
    catalogue().into_iter().find(|tone| tone.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<_> = catalogue().iter().map(|t| t.name).collect();
        assert_eq!(names.len(), catalogue().len());
    }

    #[test]
    fn test_find_by_name() {
        assert_eq!(find("click").unwrap().frequency, 100.0);
        assert!(find("theremin").is_none());
    }

    #[test]
    fn test_every_tone_builds() {
        for tone in catalogue() {
            let mut synth = Synth::offline(8000.0);
            assert!((tone.build)(&mut synth).is_ok(), "{} failed to build", tone.name);
        }
    }

    #[test]
    fn test_settings_carry_the_note() {
        let settings = find("cowbell").unwrap().settings(22_050.0);
        assert_eq!(settings.sample_rate, 22_050.0);
        assert_eq!(settings.frequency, 660.0);
        assert_eq!(settings.release_after, Some(0.15));
        assert_eq!(settings.frames(), (0.3f64 * 22_050.0).floor() as usize);
    }
}
