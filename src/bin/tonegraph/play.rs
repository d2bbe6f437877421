//! Audition a recorded tone on the default output device.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use color_eyre::eyre::{eyre, Result, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tonegraph::{io::record::record, voices::ToneDef};

use super::NoteArgs;

/// A finished recording and how far the device has got through it.
struct Playback {
    samples: Vec<f32>,
    position: usize,
}

impl Playback {
    fn finished(&self) -> bool {
        self.position >= self.samples.len()
    }
}

pub fn play(tone: &ToneDef, note: &NoteArgs) -> Result<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let device_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;

    // Render at the device rate unless asked otherwise; there is no resampler.
    let settings = note.settings(tone, device_rate);
    let samples = record(&tone.build, &settings)?;
    tracing::info!(
        "Playing `{}` ({} samples, {} Hz, {} channels)",
        tone.name,
        samples.len(),
        device_rate,
        channels
    );

    let state = Arc::new(Mutex::new(Playback { samples, position: 0 }));
    let state_clone = state.clone();

    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _| {
            let Ok(mut state) = state_clone.lock() else {
                data.fill(0.0);
                return;
            };
            let Playback { samples, position } = &mut *state;

            // Mono to all channels, silence once the recording runs out.
            for frame in data.chunks_mut(channels) {
                let sample = samples.get(*position).copied().unwrap_or(0.0);
                frame.fill(sample);
                *position += 1;
            }
        },
        |err| tracing::error!("Audio error: {}", err),
        None,
    )?;

    stream.play()?;

    loop {
        std::thread::sleep(Duration::from_millis(50));
        let done = state.lock().map(|s| s.finished()).unwrap_or(true);
        if done {
            break;
        }
    }
    // Let the device drain its last buffer.
    std::thread::sleep(Duration::from_millis(100));
    Ok(())
}
