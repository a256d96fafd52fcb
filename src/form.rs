//! Narration form: raw inputs, validation and preview selection
//!
//! The form has three fields: the presenter voice sample, the quotes (typed
//! in or loaded from a text file) and the pause between quotes. Validation
//! checks every field and reports all problems at once so the user can fix
//! them in a single pass.

use crate::quotes::parse_quotes;
use crate::{Result, TtsvidError};
use log::debug;
use std::fs;
use std::ops::RangeInclusive;
use std::path::PathBuf;

/// Allowed pause between quotes, in whole seconds
pub const PAUSE_RANGE: RangeInclusive<i64> = 0..=5;

/// Number of quotes generated by a preview
pub const DEFAULT_PREVIEW_SIZE: usize = 3;

pub const PRESENTER_VOICE_FIELD: &str = "Presenter Voice";
pub const PAUSE_FIELD: &str = "Pause Between Quotes";

/// Where the quotes come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuotesSource {
    /// Quotes typed directly, one per line
    Text(String),
    /// A text file with one quote per line
    File(PathBuf),
}

/// Unvalidated form contents
#[derive(Debug, Clone)]
pub struct FormInput {
    pub presenter_voice: PathBuf,
    pub quotes: QuotesSource,
    pub pause_seconds: i64,
}

/// Form contents that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormData {
    pub presenter_voice: PathBuf,
    pub quotes: Vec<String>,
    pub pause_seconds: u32,
}

impl FormInput {
    /// Check every field and collect all problems
    ///
    /// Returns [`TtsvidError::Validation`] listing each problem found.
    pub fn validate(&self) -> Result<FormData> {
        let mut problems = Vec::new();

        if !self.presenter_voice.is_file() {
            problems.push(format!(
                "Please specify a valid file for '{}'.",
                PRESENTER_VOICE_FIELD
            ));
        }

        let raw = match &self.quotes {
            QuotesSource::Text(text) => text.clone(),
            QuotesSource::File(path) => match fs::read_to_string(path) {
                Ok(text) => text,
                Err(e) => {
                    problems.push(format!(
                        "Could not read quotes file '{}': {}",
                        path.display(),
                        e
                    ));
                    String::new()
                }
            },
        };
        let quotes = parse_quotes(&raw);
        if quotes.is_empty() {
            problems.push(
                "Please specify at least one quote, either within the text entry or by specifying a file."
                    .to_string(),
            );
        }

        if !PAUSE_RANGE.contains(&self.pause_seconds) {
            problems.push(format!(
                "Please specify a value between {} and {} for '{}'.",
                PAUSE_RANGE.start(),
                PAUSE_RANGE.end(),
                PAUSE_FIELD
            ));
        }

        if !problems.is_empty() {
            debug!("Form rejected with {} problem(s)", problems.len());
            return Err(TtsvidError::Validation(problems));
        }

        Ok(FormData {
            presenter_voice: self.presenter_voice.clone(),
            quotes,
            pause_seconds: self.pause_seconds as u32,
        })
    }
}

impl FormData {
    /// The same form restricted to its first `count` quotes
    ///
    /// A preview of zero quotes would leave nothing to narrate and is
    /// rejected like any other invalid field.
    pub fn preview(&self, count: usize) -> Result<FormData> {
        if count == 0 {
            return Err(TtsvidError::Validation(vec![
                "Please specify a preview of at least 1 quote.".to_string(),
            ]));
        }

        Ok(FormData {
            presenter_voice: self.presenter_voice.clone(),
            quotes: self.quotes.iter().take(count).cloned().collect(),
            pause_seconds: self.pause_seconds,
        })
    }
}
