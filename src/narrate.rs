//! End-to-end narration: quotes to segments to one track to a WAV file

use crate::audio::{pause_samples, stitch, write_track, CombinedTrack, WavEncoding};
use crate::form::FormData;
use crate::speech::{synthesize_quotes, SpeechEngine};
use crate::Result;
use log::info;
use std::path::{Path, PathBuf};

/// Where and how the narration is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSettings {
    pub path: PathBuf,
    pub encoding: WavEncoding,
}

/// Summary of a finished generation
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    pub output: PathBuf,
    pub quotes: usize,
    pub samples: usize,
    pub sample_rate: u32,
    pub duration_secs: f32,
}

/// Synthesize every quote and join the clips with `pause_seconds` of silence
pub fn quotes_to_audio(
    engine: &mut dyn SpeechEngine,
    quotes: &[String],
    voice: &Path,
    language: &str,
    pause_seconds: u32,
) -> Result<CombinedTrack> {
    let synthesis = synthesize_quotes(engine, quotes, voice, language)?;
    let pause = pause_samples(pause_seconds, synthesis.sample_rate);
    let samples = stitch(&synthesis.segments, pause)?;
    Ok(CombinedTrack::new(samples, synthesis.sample_rate))
}

/// Narrate a validated form and write the result to `output`
///
/// Nothing is written unless every quote was synthesized.
pub fn generate(
    engine: &mut dyn SpeechEngine,
    form: &FormData,
    language: &str,
    output: &OutputSettings,
) -> Result<GenerationReport> {
    info!(
        "Generating {} quote(s) with a {} s pause",
        form.quotes.len(),
        form.pause_seconds
    );

    let track = quotes_to_audio(
        engine,
        &form.quotes,
        &form.presenter_voice,
        language,
        form.pause_seconds,
    )?;
    write_track(&output.path, &track, output.encoding)?;

    let report = GenerationReport {
        output: output.path.clone(),
        quotes: form.quotes.len(),
        samples: track.len(),
        sample_rate: track.sample_rate,
        duration_secs: track.duration_secs(),
    };
    info!(
        "Wrote {:.1} s of audio to {:?}",
        report.duration_secs, report.output
    );
    Ok(report)
}
