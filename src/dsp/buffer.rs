//! Sample buffers and the player that reads them back.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A block of multichannel sample memory at a fixed sample rate.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    sample_rate: f32,
    channels: Vec<Vec<f32>>,
}

impl AudioBuffer {
    /// Build a buffer from per-channel sample data.
    ///
    /// Channels shorter than the first are padded with silence so every
    /// channel has the same length.
    pub fn new(sample_rate: f32, mut channels: Vec<Vec<f32>>) -> Self {
        let len = channels.first().map_or(0, Vec::len);
        for channel in channels.iter_mut() {
            channel.resize(len, 0.0);
        }
        Self { sample_rate, channels }
    }

    pub fn mono(sample_rate: f32, samples: Vec<f32>) -> Self {
        Self::new(sample_rate, vec![samples])
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Frames per channel.
    pub fn len(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Length in seconds.
    pub fn duration(&self) -> f64 {
        if self.sample_rate <= 0.0 {
            return 0.0;
        }
        self.len() as f64 / self.sample_rate as f64
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Average of all channels.
    pub fn mixdown(&self) -> Vec<f32> {
        let count = self.channels.len();
        match count {
            0 => Vec::new(),
            1 => self.channels[0].clone(),
            _ => {
                let scale = 1.0 / count as f32;
                (0..self.len())
                    .map(|i| self.channels.iter().map(|c| c[i]).sum::<f32>() * scale)
                    .collect()
            }
        }
    }
}

/// Reads a buffer at a variable rate with linear interpolation.
///
/// The rate combines three factors: the playback-rate parameter, the detune
/// parameter in cents, and the ratio between the buffer's sample rate and
/// the output sample rate.
pub struct BufferPlayer {
    samples: Vec<f32>,
    buffer_rate: f32,
    looping: bool,
    position: f64,
    finished: bool,
}

impl BufferPlayer {
    pub fn new(buffer: &AudioBuffer, looping: bool) -> Self {
        Self {
            samples: buffer.mixdown(),
            buffer_rate: buffer.sample_rate(),
            looping,
            position: 0.0,
            finished: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn reset(&mut self) {
        self.position = 0.0;
        self.finished = false;
    }

    /// Produce one output sample and advance the read position.
    #[inline]
    pub fn next_sample(&mut self, playback_rate: f32, detune_cents: f32, output_rate: f32) -> f32 {
        let len = self.samples.len();
        if self.finished || len == 0 {
            return 0.0;
        }

        if self.looping {
            self.position = self.position.rem_euclid(len as f64);
        } else if self.position < 0.0 || self.position >= len as f64 {
            self.finished = true;
            return 0.0;
        }

        let index = self.position.floor() as usize;
        let frac = (self.position - index as f64) as f32;
        let current = self.samples[index.min(len - 1)];
        let next = match index + 1 {
            i if i < len => self.samples[i],
            _ if self.looping => self.samples[0],
            _ => 0.0,
        };
        let sample = current + (next - current) * frac;

        let rate = playback_rate as f64
            * 2f64.powf(detune_cents as f64 / 1200.0)
            * (self.buffer_rate as f64 / output_rate as f64);
        self.position += rate;

        sample
    }
}
