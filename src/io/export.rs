//! Sample export.
//!
//! Tracker modules store signed 8-bit samples, so rendered audio is
//! quantised before it is written: anything above 1 becomes 127, anything
//! below -1 becomes -128, and the rest is `trunc(v * 127)`.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use crate::error::Result;

#[inline]
pub fn quantize_sample(sample: f32) -> i8 {
    if sample > 1.0 {
        127
    } else if sample < -1.0 {
        -128
    } else {
        (sample * 127.0).trunc() as i8
    }
}

pub fn quantize_i8(samples: &[f32]) -> Vec<i8> {
    samples.iter().map(|&s| quantize_sample(s)).collect()
}

/// Two's complement bytes of quantised samples.
pub fn to_bytes(samples: &[i8]) -> Vec<u8> {
    samples.iter().map(|&s| s as u8).collect()
}

/// Write quantised samples as headerless signed 8-bit data.
pub fn write_raw<W: Write>(writer: &mut W, samples: &[i8]) -> Result<()> {
    writer.write_all(&to_bytes(samples))?;
    Ok(())
}

pub fn write_raw_file(path: impl AsRef<Path>, samples: &[i8]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    write_raw(&mut writer, samples)?;
    writer.flush()?;
    tracing::info!("Wrote {} raw samples to {}", samples.len(), path.as_ref().display());
    Ok(())
}

/// Write mono 16-bit PCM. Samples outside `[-1, 1]` are clipped.
pub fn write_wav(path: impl AsRef<Path>, samples: &[f32], sample_rate: u32) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path.as_ref(), spec)?;
    for &sample in samples {
        writer.write_sample((sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)?;
    }
    writer.finalize()?;
    tracing::info!("Wrote {} samples at {} Hz to {}", samples.len(), sample_rate, path.as_ref().display());
    Ok(())
}

/// Smallest and largest quantised value, `(0, 0)` for no samples.
pub fn quantized_range(samples: &[i8]) -> (i8, i8) {
    samples
        .iter()
        .fold((0, 0), |(min, max), &s| (min.min(s), max.max(s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantisation_clamps_and_truncates() {
        assert_eq!(quantize_i8(&[1.5, -1.5, 1.0, -1.0, 0.5, -0.5, 0.0]), vec![127, -128, 127, -127, 63, -63, 0]);
    }

    #[test]
    fn test_raw_bytes_are_twos_complement() {
        let mut out = Vec::new();
        write_raw(&mut out, &[-1, -128, 127, 0]).unwrap();
        assert_eq!(out, vec![0xff, 0x80, 0x7f, 0x00]);
    }

    #[test]
    fn test_range_tracks_extremes() {
        assert_eq!(quantized_range(&[3, -7, 12]), (-7, 12));
        assert_eq!(quantized_range(&[]), (0, 0));
    }

    #[test]
    fn test_wav_round_trips_through_hound() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        write_wav(&path, &[0.0, 0.5, -0.5, 2.0], 16_574).unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_rate, 16_574);
        assert_eq!(reader.spec().channels, 1);
        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![0, 16383, -16383, i16::MAX]);
    }

    #[test]
    fn test_raw_file_has_one_byte_per_sample() {
        let file = tempfile::NamedTempFile::new().unwrap();
        write_raw_file(file.path(), &quantize_i8(&[0.25; 100])).unwrap();
        assert_eq!(std::fs::read(file.path()).unwrap(), vec![31u8; 100]);
    }
}
