use std::f32::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
| type       | passes                  | Q                   | gain         |
| ---------- | ----------------------- | ------------------- | ------------ |
| low-pass   | below cutoff            | resonance in dB     | -            |
| high-pass  | above cutoff            | resonance in dB     | -            |
| band-pass  | around cutoff           | bandwidth           | -            |
| low-shelf  | everything, boosts low  | -                   | boost in dB  |
| high-shelf | everything, boosts high | -                   | boost in dB  |
| peaking    | everything, boosts band | bandwidth           | boost in dB  |
| notch      | outside cutoff          | bandwidth           | -            |
| all-pass   | everything (phase only) | steepness           | -            |

All eight responses come from one topology-preserving-transform (TPT)
state-variable filter. Each response is a mix of the three core outputs:

    y = m0·x + m1·bandpass + m2·lowpass

with g (the warped cutoff) and k (the damping, 1/Q) chosen per response.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterType {
    #[default]
    LowPass,
    HighPass,
    BandPass,
    LowShelf,
    HighShelf,
    Peaking,
    Notch,
    AllPass,
}

pub struct FilterOutputs {
    pub lowpass: f32,
    pub bandpass: f32,
    pub highpass: f32,
}

/// Q used by the shelving responses, which take no Q parameter.
const SHELF_Q: f32 = std::f32::consts::FRAC_1_SQRT_2;
const MIN_Q: f32 = 1e-3;
const MIN_CUTOFF: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Coefficients {
    g: f32,
    k: f32,
    m0: f32,
    m1: f32,
    m2: f32,
}

pub struct SVFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    filter_type: FilterType,
    settings: Option<(f32, f32, f32, f32)>,
    coefficients: Coefficients,
}

impl SVFilter {
    pub fn new(filter_type: FilterType) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            filter_type,
            settings: None,
            coefficients: Coefficients { g: 0.0, k: 1.0, m0: 1.0, m1: 0.0, m2: 0.0 },
        }
    }

    pub fn lowpass() -> Self {
        Self::new(FilterType::LowPass)
    }

    pub fn highpass() -> Self {
        Self::new(FilterType::HighPass)
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    /// Update cutoff (Hz), Q and gain (dB). Coefficients are only
    /// recomputed when a value changes.
    pub fn set_params(&mut self, cutoff_hz: f32, q: f32, gain_db: f32, sample_rate: f32) {
        let settings = (cutoff_hz, q, gain_db, sample_rate);
        if self.settings == Some(settings) {
            return;
        }
        self.settings = Some(settings);
        self.coefficients = self.compute(cutoff_hz, q, gain_db, sample_rate);
    }

    fn compute(&self, cutoff_hz: f32, q: f32, gain_db: f32, sample_rate: f32) -> Coefficients {
        let cutoff = cutoff_hz.clamp(MIN_CUTOFF, 0.49 * sample_rate);
        let g = (PI * cutoff / sample_rate).tan();
        let a = 10f32.powf(gain_db / 40.0);
        let resonance_db = q;
        let q = q.max(MIN_Q);

        match self.filter_type {
            FilterType::LowPass | FilterType::HighPass => {
                // Resonance is specified in dB for these two.
                let k = 1.0 / 10f32.powf(resonance_db / 20.0).max(MIN_Q);
                let (m1, m2) = if self.filter_type == FilterType::LowPass {
                    (0.0, 1.0)
                } else {
                    (-k, -1.0)
                };
                let m0 = if self.filter_type == FilterType::LowPass { 0.0 } else { 1.0 };
                Coefficients { g, k, m0, m1, m2 }
            }
            FilterType::BandPass => {
                let k = 1.0 / q;
                Coefficients { g, k, m0: 0.0, m1: k, m2: 0.0 }
            }
            FilterType::Notch => {
                let k = 1.0 / q;
                Coefficients { g, k, m0: 1.0, m1: -k, m2: 0.0 }
            }
            FilterType::AllPass => {
                let k = 1.0 / q;
                Coefficients { g, k, m0: 1.0, m1: -2.0 * k, m2: 0.0 }
            }
            FilterType::Peaking => {
                let k = 1.0 / (q * a);
                Coefficients { g, k, m0: 1.0, m1: k * (a * a - 1.0), m2: 0.0 }
            }
            FilterType::LowShelf => {
                let k = 1.0 / SHELF_Q;
                Coefficients {
                    g: g / a.sqrt(),
                    k,
                    m0: 1.0,
                    m1: k * (a - 1.0),
                    m2: a * a - 1.0,
                }
            }
            FilterType::HighShelf => {
                let k = 1.0 / SHELF_Q;
                Coefficients {
                    g: g * a.sqrt(),
                    k,
                    m0: a * a,
                    m1: k * (1.0 - a) * a,
                    m2: 1.0 - a * a,
                }
            }
        }
    }

    pub fn next_sample(&mut self, sample: f32, k: f32, g: f32) -> FilterOutputs {
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        FilterOutputs {
            lowpass: v2,
            bandpass: v1,
            highpass: sample - k * v1 - v2,
        }
    }

    #[inline]
    pub fn process_sample(&mut self, sample: f32) -> f32 {
        let Coefficients { g, k, m0, m1, m2 } = self.coefficients;
        let outputs = self.next_sample(sample, k, g);
        m0 * sample + m1 * outputs.bandpass + m2 * outputs.lowpass
    }

    /// Filter a block in place with fixed settings.
    pub fn render(&mut self, buffer: &mut [f32], cutoff_hz: f32, q: f32, gain_db: f32, sample_rate: f32) {
        self.set_params(cutoff_hz, q, gain_db, sample_rate);
        for sample in buffer.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::{Oscillator, Waveform};

    const SAMPLE_RATE: f32 = 48_000.0;

    fn sine(freq: f32, frames: usize) -> Vec<f32> {
        let mut osc = Oscillator::new(&Waveform::Sine);
        (0..frames).map(|_| osc.next_sample(freq, SAMPLE_RATE)).collect()
    }

    fn peak_after_transient(buffer: &[f32]) -> f32 {
        let skip = buffer.len().min(256);
        buffer
            .get(skip..)
            .unwrap_or(buffer)
            .iter()
            .fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    fn response(kind: FilterType, cutoff: f32, q: f32, gain: f32, freq: f32) -> f32 {
        let mut filter = SVFilter::new(kind);
        let mut buffer = sine(freq, 4096);
        filter.render(&mut buffer, cutoff, q, gain, SAMPLE_RATE);
        peak_after_transient(&buffer)
    }

    #[test]
    fn test_lowpass_passes_dc() {
        let mut filter = SVFilter::lowpass();
        let mut buffer = vec![1.0; 512];
        filter.render(&mut buffer, 500.0, 0.0, 0.0, SAMPLE_RATE);
        assert!(buffer[511] > 0.99);
    }

    #[test]
    fn test_highpass_blocks_dc() {
        let mut filter = SVFilter::highpass();
        let mut buffer = vec![1.0; 512];
        filter.render(&mut buffer, 500.0, 0.0, 0.0, SAMPLE_RATE);
        assert!(buffer[511].abs() < 0.001);
    }

    #[test]
    fn test_lowpass_filters_high_freq() {
        let peak = response(FilterType::LowPass, 500.0, 0.0, 0.0, 5_000.0);
        assert!(peak < 0.05, "Expected high freq attenuation, got peak: {}", peak);
    }

    #[test]
    fn test_lowpass_resonance_in_db() {
        // 12 dB of resonance is a 4x boost at the cutoff.
        let peak = response(FilterType::LowPass, 1_000.0, 12.0, 0.0, 1_000.0);
        assert!((peak - 3.98).abs() < 0.3, "got {peak}");
    }

    #[test]
    fn test_bandpass_is_unity_at_center() {
        let center = response(FilterType::BandPass, 1_000.0, 5.0, 0.0, 1_000.0);
        let off = response(FilterType::BandPass, 1_000.0, 5.0, 0.0, 200.0);
        assert!((center - 1.0).abs() < 0.05, "center {center}");
        assert!(off < center * 0.5, "off {off}");
    }

    #[test]
    fn test_notch_rejects_cutoff_frequency() {
        let center = response(FilterType::Notch, 1_000.0, 1.0, 0.0, 1_000.0);
        let off = response(FilterType::Notch, 1_000.0, 1.0, 0.0, 200.0);
        assert!(center * 2.0 < off, "center {center}, off {off}");
    }

    #[test]
    fn test_allpass_keeps_amplitude() {
        for freq in [200.0, 1_000.0, 5_000.0] {
            let peak = response(FilterType::AllPass, 1_000.0, 1.0, 0.0, freq);
            assert!((peak - 1.0).abs() < 0.05, "{freq} Hz: {peak}");
        }
    }

    #[test]
    fn test_peaking_boosts_band() {
        let peak = response(FilterType::Peaking, 1_000.0, 1.0, 6.0, 1_000.0);
        assert!((peak - 2.0).abs() < 0.1, "got {peak}");
        let far = response(FilterType::Peaking, 1_000.0, 1.0, 6.0, 50.0);
        assert!((far - 1.0).abs() < 0.1, "got {far}");
    }

    #[test]
    fn test_shelves_boost_their_side() {
        let low_shelf_low = response(FilterType::LowShelf, 1_000.0, 1.0, 12.0, 50.0);
        let low_shelf_high = response(FilterType::LowShelf, 1_000.0, 1.0, 12.0, 15_000.0);
        assert!(low_shelf_low > 3.5 && (low_shelf_high - 1.0).abs() < 0.1);

        let high_shelf_low = response(FilterType::HighShelf, 1_000.0, 1.0, 12.0, 50.0);
        let high_shelf_high = response(FilterType::HighShelf, 1_000.0, 1.0, 12.0, 15_000.0);
        assert!(high_shelf_high > 3.5 && (high_shelf_low - 1.0).abs() < 0.1);
    }

    #[test]
    fn test_params_change_filtering() {
        let low = response(FilterType::LowPass, 200.0, 0.0, 0.0, 1_000.0);
        let high = response(FilterType::LowPass, 5_000.0, 0.0, 0.0, 1_000.0);
        assert!(high > low * 2.0, "high={high}, low={low}");
    }

    #[test]
    fn test_extreme_settings_stay_finite() {
        let mut filter = SVFilter::new(FilterType::BandPass);
        let mut buffer = sine(100.0, 1024);
        filter.render(&mut buffer, 1e9, -5.0, 0.0, SAMPLE_RATE);
        assert!(buffer.iter().all(|x| x.is_finite()));
    }
}
