//! Additive spectral tables.
//!
//! A list of partial frequencies becomes a cosine table of `table_size`
//! bins. Bin `j` of a table played back once per `table_size` samples sits at
//! `j * sample_rate / table_size` Hz, so the oscillator that plays the table
//! must scale its frequency by `sample_rate / table_size` for each partial to
//! sound at the frequency it was specified with.

use crate::{
    dsp::oscillator::PeriodicWave,
    error::{Error, Result},
};

/// Default table size for a given sample rate: a quarter second of bins.
pub fn default_table_size(sample_rate: f32) -> usize {
    ((sample_rate / 4.0).floor() as usize).max(1)
}

/// Place each gain at bin `round(freq * table_size / sample_rate)`.
///
/// Partials landing at or beyond `table_size` are dropped. Missing gains
/// default to 1; the imaginary (sine) part stays zero.
pub fn spectrum_table(
    frequencies: &[f32],
    gains: Option<&[f32]>,
    table_size: usize,
    sample_rate: f32,
) -> Result<PeriodicWave> {
    if frequencies.is_empty() {
        return Err(Error::EmptySpectrum);
    }
    if let Some(gains) = gains {
        if gains.len() != frequencies.len() {
            return Err(Error::SpectrumMismatch {
                frequencies: frequencies.len(),
                gains: gains.len(),
            });
        }
    }

    let mut real = vec![0.0f32; table_size];
    let imag = vec![0.0f32; table_size];

    for (i, &freq) in frequencies.iter().enumerate() {
        let bin = (freq as f64 * table_size as f64 / sample_rate as f64).round();
        if bin < 0.0 || bin >= table_size as f64 {
            continue;
        }
        real[bin as usize] = gains.map_or(1.0, |g| g[i]);
    }

    Ok(PeriodicWave::new(real, imag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partials_land_on_rounded_bins() {
        let wave = spectrum_table(&[100.0, 251.0], Some(&[0.5, 0.25]), 1000, 1000.0).unwrap();

        assert_eq!(wave.real()[100], 0.5);
        assert_eq!(wave.real()[251], 0.25);
        assert!(wave.imag().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_gains_default_to_one() {
        let wave = spectrum_table(&[10.0, 20.0], None, 64, 64.0).unwrap();
        assert_eq!(wave.real()[10], 1.0);
        assert_eq!(wave.real()[20], 1.0);
    }

    #[test]
    fn test_out_of_range_partials_are_dropped() {
        let wave = spectrum_table(&[10.0, 5000.0], None, 64, 64.0).unwrap();
        assert_eq!(wave.real().iter().filter(|&&v| v != 0.0).count(), 1);
    }

    #[test]
    fn test_empty_and_mismatched_inputs_fail() {
        assert!(matches!(
            spectrum_table(&[], None, 64, 64.0),
            Err(Error::EmptySpectrum)
        ));
        assert!(matches!(
            spectrum_table(&[1.0, 2.0], Some(&[1.0]), 64, 64.0),
            Err(Error::SpectrumMismatch { frequencies: 2, gains: 1 })
        ));
    }

    #[test]
    fn test_default_size_is_quarter_rate() {
        assert_eq!(default_table_size(44_100.0), 11_025);
    }
}
