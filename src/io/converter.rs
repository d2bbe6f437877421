/// Equal-tempered frequency of a MIDI note number (A4 = 69 = 440 Hz).
pub fn midi_note_to_freq(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}

/// Nearest MIDI note to `frequency`, if it is in range.
pub fn freq_to_midi_note(frequency: f32) -> Option<u8> {
    if frequency.is_nan() || frequency <= 0.0 {
        return None;
    }
    let note = (69.0 + 12.0 * (frequency / 440.0).log2()).round();
    (0.0..=127.0).contains(&note).then_some(note as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a4_is_440() {
        assert_eq!(midi_note_to_freq(69), 440.0);
        assert!((midi_note_to_freq(81) - 880.0).abs() < 1e-3);
    }

    #[test]
    fn test_frequencies_round_to_the_nearest_note() {
        assert_eq!(freq_to_midi_note(440.0), Some(69));
        assert_eq!(freq_to_midi_note(261.0), Some(60));
        assert_eq!(freq_to_midi_note(0.0), None);
        assert_eq!(freq_to_midi_note(100_000.0), None);
    }
}
