//! Synthesis driver: one engine call per quote, strictly in order

use super::SpeechEngine;
use crate::{Result, TtsvidError};
use log::{debug, info};
use std::path::Path;

/// Waveforms for a batch of quotes and the rate they were produced at
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesis {
    pub segments: Vec<Vec<f32>>,
    pub sample_rate: u32,
}

/// Synthesize every quote with the same voice and language
///
/// The first failing quote aborts the batch; no partial result is returned.
/// An empty quote list yields an empty segment list.
pub fn synthesize_quotes(
    engine: &mut dyn SpeechEngine,
    quotes: &[String],
    voice: &Path,
    language: &str,
) -> Result<Synthesis> {
    let sample_rate = engine.sample_rate();
    let mut segments = Vec::with_capacity(quotes.len());

    for (index, quote) in quotes.iter().enumerate() {
        info!(
            "Synthesizing quote {}/{} with {}",
            index + 1,
            quotes.len(),
            engine.name()
        );
        debug!("Quote text: {}", quote);

        let segment = engine
            .synthesize(quote, voice, language)
            .map_err(|e| TtsvidError::Synthesis {
                index,
                message: e.to_string(),
            })?;

        debug!("Quote {} produced {} samples", index + 1, segment.len());
        segments.push(segment);
    }

    Ok(Synthesis {
        segments,
        sample_rate,
    })
}
