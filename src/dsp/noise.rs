//! White noise fill.

use rand::Rng;

/// `floor(sample_rate * seconds)` independent uniform samples in `[-1, 1]`.
///
/// The caller owns the generator, so a seeded RNG gives a reproducible buffer.
pub fn noise_buffer<R: Rng + ?Sized>(rng: &mut R, sample_rate: f32, seconds: f32) -> Vec<f32> {
    let len = (sample_rate as f64 * seconds as f64).max(0.0).floor() as usize;
    (0..len).map(|_| rng.gen_range(-1.0..=1.0)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_length_is_floored() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(noise_buffer(&mut rng, 1000.0, 0.0125).len(), 12);
        assert!(noise_buffer(&mut rng, 1000.0, -1.0).is_empty());
    }

    #[test]
    fn test_values_stay_in_range_and_vary() {
        let mut rng = StdRng::seed_from_u64(7);
        let noise = noise_buffer(&mut rng, 8000.0, 1.0);

        assert!(noise.iter().all(|v| (-1.0..=1.0).contains(v)));
        let mean = noise.iter().sum::<f32>() / noise.len() as f32;
        assert!(mean.abs() < 0.05, "mean {mean}");
        assert!(noise.iter().any(|&v| v > 0.9));
        assert!(noise.iter().any(|&v| v < -0.9));
    }

    #[test]
    fn test_same_seed_same_noise() {
        let a = noise_buffer(&mut StdRng::seed_from_u64(3), 100.0, 1.0);
        let b = noise_buffer(&mut StdRng::seed_from_u64(3), 100.0, 1.0);
        assert_eq!(a, b);
    }
}
