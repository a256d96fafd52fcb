//! Pipeline tests with a fake speech engine
//!
//! The fake returns canned waveforms and records every call, so ordering,
//! pause layout and failure behaviour can be checked without a real model.

use std::path::{Path, PathBuf};
use ttsvid::audio::{read_mono, segment_offsets, WavEncoding, XTTS_SAMPLE_RATE};
use ttsvid::form::{FormData, FormInput, QuotesSource};
use ttsvid::narrate::{generate, quotes_to_audio, GenerationReport, OutputSettings};
use ttsvid::speech::{synthesize_quotes, SpeechEngine};
use ttsvid::{Result, TtsvidError};

/// Engine returning a constant waveform whose length and level depend on the quote
struct FakeEngine {
    sample_rate: u32,
    calls: Vec<(String, PathBuf, String)>,
    fail_on: Option<String>,
}

impl FakeEngine {
    fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            calls: Vec::new(),
            fail_on: None,
        }
    }

    fn waveform(text: &str) -> Vec<f32> {
        vec![text.len() as f32 / 10.0; text.len()]
    }
}

impl SpeechEngine for FakeEngine {
    fn name(&self) -> &str {
        "fake"
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn synthesize(&mut self, text: &str, voice: &Path, language: &str) -> Result<Vec<f32>> {
        self.calls
            .push((text.to_string(), voice.to_path_buf(), language.to_string()));
        if self.fail_on.as_deref() == Some(text) {
            return Err(TtsvidError::Speech("unsupported characters".to_string()));
        }
        Ok(Self::waveform(text))
    }
}

fn quotes(items: &[&str]) -> Vec<String> {
    items.iter().map(|q| q.to_string()).collect()
}

#[test]
fn test_driver_calls_engine_in_order() {
    let mut engine = FakeEngine::new(XTTS_SAMPLE_RATE);
    let voice = Path::new("presenter.mp3");

    let synthesis =
        synthesize_quotes(&mut engine, &quotes(&["one", "three", "seven"]), voice, "en").unwrap();

    assert_eq!(synthesis.sample_rate, XTTS_SAMPLE_RATE);
    assert_eq!(synthesis.segments.len(), 3);
    assert_eq!(synthesis.segments[1], FakeEngine::waveform("three"));

    let texts: Vec<&str> = engine.calls.iter().map(|(t, _, _)| t.as_str()).collect();
    assert_eq!(texts, vec!["one", "three", "seven"]);
    assert!(engine
        .calls
        .iter()
        .all(|(_, v, l)| v == voice && l == "en"));
}

#[test]
fn test_driver_with_no_quotes() {
    let mut engine = FakeEngine::new(XTTS_SAMPLE_RATE);
    let synthesis = synthesize_quotes(&mut engine, &[], Path::new("v.wav"), "en").unwrap();
    assert!(synthesis.segments.is_empty());
    assert!(engine.calls.is_empty());
}

#[test]
fn test_failure_aborts_batch() {
    let mut engine = FakeEngine::new(XTTS_SAMPLE_RATE);
    engine.fail_on = Some("bad".to_string());

    let err = synthesize_quotes(
        &mut engine,
        &quotes(&["good", "bad", "never"]),
        Path::new("v.wav"),
        "en",
    )
    .unwrap_err();

    match err {
        TtsvidError::Synthesis { index, message } => {
            assert_eq!(index, 1);
            assert!(message.contains("unsupported characters"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(engine.calls.len(), 2);
}

#[test]
fn test_quotes_to_audio_layout() {
    // Low rate keeps pauses small: 2 s at 10 Hz is 20 samples
    let mut engine = FakeEngine::new(10);
    let items = quotes(&["ab", "cdef", "g"]);

    let track = quotes_to_audio(&mut engine, &items, Path::new("v.wav"), "en", 2).unwrap();

    assert_eq!(track.sample_rate, 10);
    assert_eq!(track.len(), 2 + 4 + 1 + 2 * 20);

    let offsets = segment_offsets(&[2, 4, 1], 20);
    for (quote, &offset) in items.iter().zip(&offsets) {
        let expected = FakeEngine::waveform(quote);
        assert_eq!(&track.samples[offset..offset + expected.len()], expected.as_slice());
    }
    assert!(track.samples[2..22].iter().all(|&s| s == 0.0));
    assert!(track.samples[26..46].iter().all(|&s| s == 0.0));
}

#[test]
fn test_quotes_to_audio_empty_is_error() {
    let mut engine = FakeEngine::new(10);
    let err = quotes_to_audio(&mut engine, &[], Path::new("v.wav"), "en", 1).unwrap_err();
    assert!(matches!(err, TtsvidError::EmptyInput));
}

#[test]
fn test_generate_writes_wav() {
    let dir = tempfile::tempdir().unwrap();
    let output = OutputSettings {
        path: dir.path().join("output.wav"),
        encoding: WavEncoding::Float32,
    };
    let form = FormData {
        presenter_voice: PathBuf::from("presenter.wav"),
        quotes: quotes(&["first quote", "second"]),
        pause_seconds: 1,
    };
    let mut engine = FakeEngine::new(XTTS_SAMPLE_RATE);

    let report = generate(&mut engine, &form, "en", &output).unwrap();

    assert_eq!(report.output, output.path);
    assert_eq!(report.quotes, 2);
    assert_eq!(report.sample_rate, XTTS_SAMPLE_RATE);
    assert_eq!(report.samples, 11 + 6 + 24_000);

    let (samples, rate) = read_mono(&output.path).unwrap();
    assert_eq!(rate, XTTS_SAMPLE_RATE);
    assert_eq!(samples.len(), report.samples);
    assert_eq!(samples[0], 1.1);
}

#[test]
fn test_failed_batch_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let output = OutputSettings {
        path: dir.path().join("output.wav"),
        encoding: WavEncoding::Pcm16,
    };
    let form = FormData {
        presenter_voice: PathBuf::from("presenter.wav"),
        quotes: quotes(&["fine", "broken"]),
        pause_seconds: 0,
    };
    let mut engine = FakeEngine::new(XTTS_SAMPLE_RATE);
    engine.fail_on = Some("broken".to_string());

    assert!(generate(&mut engine, &form, "en", &output).is_err());
    assert!(!output.path.exists());
}

/// Validate then narrate, in the order the command line does it
fn narrate_input(
    engine: &mut dyn SpeechEngine,
    input: &FormInput,
    output: &OutputSettings,
) -> Result<GenerationReport> {
    let form = input.validate()?;
    generate(engine, &form, "en", output)
}

#[test]
fn test_invalid_form_never_reaches_engine() {
    let dir = tempfile::tempdir().unwrap();
    let output = OutputSettings {
        path: dir.path().join("output.wav"),
        encoding: WavEncoding::Float32,
    };
    let input = FormInput {
        presenter_voice: PathBuf::from("/nonexistent/presenter.mp3"),
        quotes: QuotesSource::Text("hello\nworld".to_string()),
        pause_seconds: 1,
    };
    let mut engine = FakeEngine::new(XTTS_SAMPLE_RATE);

    let err = narrate_input(&mut engine, &input, &output).unwrap_err();

    assert!(err.to_string().contains("Presenter Voice"));
    assert!(engine.calls.is_empty());
    assert!(!output.path.exists());
}

#[test]
fn test_valid_form_reaches_engine() {
    let dir = tempfile::tempdir().unwrap();
    let voice = dir.path().join("presenter.wav");
    std::fs::write(&voice, b"RIFF").unwrap();
    let output = OutputSettings {
        path: dir.path().join("output.wav"),
        encoding: WavEncoding::Float32,
    };
    let input = FormInput {
        presenter_voice: voice.clone(),
        quotes: QuotesSource::Text("hello\n\nworld".to_string()),
        pause_seconds: 0,
    };
    let mut engine = FakeEngine::new(XTTS_SAMPLE_RATE);

    let report = narrate_input(&mut engine, &input, &output).unwrap();

    assert_eq!(report.quotes, 2);
    assert_eq!(engine.calls.len(), 2);
    assert!(engine.calls.iter().all(|(_, v, _)| *v == voice));
}

#[test]
fn test_preview_generates_first_quotes() {
    let dir = tempfile::tempdir().unwrap();
    let output = OutputSettings {
        path: dir.path().join("preview.wav"),
        encoding: WavEncoding::Float32,
    };
    let form = FormData {
        presenter_voice: PathBuf::from("presenter.wav"),
        quotes: quotes(&["a", "b", "c", "d", "e"]),
        pause_seconds: 0,
    };
    let mut engine = FakeEngine::new(XTTS_SAMPLE_RATE);

    let report = generate(&mut engine, &form.preview(3).unwrap(), "en", &output).unwrap();
    assert_eq!(report.quotes, 3);
    assert_eq!(engine.calls.len(), 3);
}

#[test]
fn test_zero_preview_is_rejected_before_synthesis() {
    let form = FormData {
        presenter_voice: PathBuf::from("presenter.wav"),
        quotes: quotes(&["a", "b"]),
        pause_seconds: 1,
    };

    let err = form.preview(0).unwrap_err();
    assert!(matches!(err, TtsvidError::Validation(_)));
}
