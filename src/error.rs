//! Error types for TTSVid

use std::io;
use thiserror::Error;

/// Main error type for TTSVid
#[derive(Error, Debug)]
pub enum TtsvidError {
    /// Every problem found in the form, in the order they were checked
    #[error("{}", .0.join("\n"))]
    Validation(Vec<String>),

    #[error("Speech engine error: {0}")]
    Speech(String),

    #[error("Synthesis failed for quote {}: {message}", .index + 1)]
    Synthesis { index: usize, message: String },

    #[error("Cannot stitch an empty list of segments")]
    EmptyInput,

    #[error("Sample rate mismatch: expected {expected} Hz, got {found} Hz")]
    SampleRateMismatch { expected: u32, found: u32 },

    #[error("Audio error: {0}")]
    Audio(String),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("INI parse error: {0}")]
    IniParse(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for TTSVid operations
pub type Result<T> = std::result::Result<T, TtsvidError>;

impl From<String> for TtsvidError {
    fn from(s: String) -> Self {
        TtsvidError::Other(s)
    }
}

impl From<&str> for TtsvidError {
    fn from(s: &str) -> Self {
        TtsvidError::Other(s.to_string())
    }
}
