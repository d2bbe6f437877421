use tonegraph::{
    dsp::oscillator::Waveform,
    graph::{envelope::Adsr, oscillator::OscillatorConfig},
    io::{
        export::{quantize_i8, write_raw_file},
        record::record,
    },
    synth::voice::VoiceConfig,
    voices, Control, Synth,
};

const SAMPLE_RATE: f32 = 8000.0;

fn window(samples: &[f32], from: f64, to: f64) -> &[f32] {
    let at = |t: f64| (t * SAMPLE_RATE as f64) as usize;
    &samples[at(from)..at(to).min(samples.len())]
}

fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |m, s| m.max(s.abs()))
}

/// A square wave following the voice, gated by an ADSR, played on at 0 and
/// off at 0.5.
fn square_note() -> Vec<f32> {
    let mut synth = Synth::offline(SAMPLE_RATE);
    let voice = synth
        .voice(VoiceConfig {
            gain: Control::Value(1.0),
            ..Default::default()
        })
        .unwrap();
    let envelope = synth.envelope(Adsr::new(0.01, 0.0, 1.0, 0.1), voice).unwrap();
    let square = synth
        .oscillator(OscillatorConfig {
            waveform: Waveform::Square,
            frequency: voice.frequency.into(),
            gain: envelope.into(),
            ..Default::default()
        })
        .unwrap();
    synth.attach(square, voice, None).unwrap();

    synth.on(voice, 0.0, 440.0).unwrap();
    synth.off(voice, 0.5).unwrap();
    synth.backend_mut().render(1.0)
}

#[test]
fn test_square_voice_follows_its_envelope() {
    let out = square_note();
    assert_eq!(out.len(), SAMPLE_RATE as usize);

    assert!(out[0].abs() < 0.05, "first sample {}", out[0]);

    let attack = peak(window(&out, 0.03, 0.06));
    assert!(attack > 0.8, "after attack {attack}");

    let held = peak(window(&out, 0.05, 0.45));
    assert!((0.8..1.3).contains(&held), "held {held}");

    let released = peak(window(&out, 0.85, 1.0));
    assert!(released < 0.1, "after release {released}");
}

#[test]
fn test_square_voice_plays_the_note_frequency() {
    let out = square_note();
    let held = window(&out, 0.05, 0.45);
    let rising = held.windows(2).filter(|w| w[0] < 0.0 && w[1] >= 0.0).count();
    // 0.4 s of 440 Hz
    assert!((174..=178).contains(&rising), "{rising} rising edges");
}

#[test]
fn test_catalogue_tones_render_finite_and_bounded() {
    for tone in voices::catalogue() {
        let out = tone.record(SAMPLE_RATE).unwrap();
        assert_eq!(out.len(), (tone.duration * SAMPLE_RATE as f64).floor() as usize);
        assert!(out.iter().all(|s| s.is_finite()), "{} produced NaN or inf", tone.name);
        assert!(peak(&out) < 32.0, "{} peaks at {}", tone.name, peak(&out));
    }
}

#[test]
fn test_percussive_tones_fall_silent() {
    for name in ["click", "cowbell"] {
        let tone = voices::find(name).unwrap();
        let out = tone.record(SAMPLE_RATE).unwrap();
        assert!(peak(&out) > 0.01, "{name} is silent");
        let tail = &out[out.len() - 80..];
        assert!(peak(tail) < peak(&out) * 0.5, "{name} does not decay");
    }
}

#[test]
fn test_recordings_are_reproducible() {
    let tone = voices::find("click").unwrap();
    assert_eq!(tone.record(SAMPLE_RATE).unwrap(), tone.record(SAMPLE_RATE).unwrap());
}

#[test]
fn test_recorded_tone_exports_as_raw_bytes() {
    let tone = voices::find("cowbell").unwrap();
    let samples = record(&tone.build, &tone.settings(SAMPLE_RATE)).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cowbell.raw");
    write_raw_file(&path, &quantize_i8(&samples)).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), samples.len());
    assert!(bytes.iter().any(|&b| b != 0));
}
