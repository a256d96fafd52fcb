//! Speech engine abstraction
//!
//! An engine turns one quote into one waveform, using a reference recording
//! to clone the speaker's voice. Engines are expensive to start (the XTTS
//! model is loaded into memory once), so callers create one explicitly with
//! [`create_engine`] and reuse it for every quote in a batch.

use crate::platform::cuda_available;
use crate::{Result, TtsvidError};
use log::info;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// How long the XTTS model may take to load (first run downloads it)
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(600);

/// Text-to-speech engine trait
///
/// Implementations return mono f32 samples at [`SpeechEngine::sample_rate`].
pub trait SpeechEngine {
    /// Human readable engine name for logs and messages
    fn name(&self) -> &str;

    /// Sample rate of every waveform this engine returns
    fn sample_rate(&self) -> u32;

    /// Synthesize `text` in the voice of the `voice` recording
    fn synthesize(&mut self, text: &str, voice: &Path, language: &str) -> Result<Vec<f32>>;
}

/// Which engine to start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Backend {
    /// XTTS when it can be started, espeak-ng otherwise
    #[default]
    Auto,
    /// Coqui XTTS v2 with voice cloning
    Xtts,
    /// espeak-ng, no voice cloning
    Espeak,
}

impl FromStr for Backend {
    type Err = TtsvidError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Backend::Auto),
            "xtts" => Ok(Backend::Xtts),
            "espeak" | "espeak-ng" => Ok(Backend::Espeak),
            other => Err(TtsvidError::Config(format!(
                "Unknown speech backend: {}",
                other
            ))),
        }
    }
}

/// Compute device for the XTTS model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Device {
    /// CUDA when a GPU driver is present, CPU otherwise
    #[default]
    Auto,
    Cuda,
    Cpu,
}

impl Device {
    /// Resolve `Auto` against the hardware actually present
    pub fn resolve(self) -> Device {
        match self {
            Device::Auto if cuda_available() => Device::Cuda,
            Device::Auto => Device::Cpu,
            other => other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Device::Auto => "auto",
            Device::Cuda => "cuda",
            Device::Cpu => "cpu",
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Device {
    type Err = TtsvidError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Device::Auto),
            "cuda" | "gpu" => Ok(Device::Cuda),
            "cpu" => Ok(Device::Cpu),
            other => Err(TtsvidError::Config(format!("Unknown device: {}", other))),
        }
    }
}

/// Everything needed to start an engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub backend: Backend,
    /// Python interpreter hosting the XTTS worker
    pub python: String,
    /// XTTS model name
    pub model: String,
    pub device: Device,
    /// Language code used for every quote
    pub language: String,
    /// Give up on an engine that is not ready after this long
    pub load_timeout: Duration,
}

/// Start the configured speech engine
///
/// `Backend::Auto` tries XTTS first, since only it can clone the presenter
/// voice, and falls back to espeak-ng.
pub fn create_engine(settings: &EngineSettings) -> Result<Box<dyn SpeechEngine>> {
    use super::backends::espeak::EspeakEngine;
    use super::backends::xtts::XttsEngine;

    match settings.backend {
        Backend::Xtts => {
            info!("Starting XTTS engine");
            let engine = XttsEngine::new(settings)?;
            info!("XTTS engine running on {}", engine.device());
            Ok(Box::new(engine))
        }
        Backend::Espeak => {
            info!("Starting espeak-ng engine");
            Ok(Box::new(EspeakEngine::new()?))
        }
        Backend::Auto => {
            info!("Trying XTTS engine...");
            let xtts_error = match XttsEngine::new(settings) {
                Ok(engine) => {
                    info!("✓ Successfully started XTTS engine on {}", engine.device());
                    return Ok(Box::new(engine));
                }
                Err(e) => {
                    info!("✗ XTTS engine unavailable: {}", e);
                    e
                }
            };

            info!("Trying espeak-ng engine...");
            match EspeakEngine::new() {
                Ok(engine) => {
                    info!("✓ Successfully started espeak-ng engine");
                    Ok(Box::new(engine))
                }
                Err(e) => Err(TtsvidError::Speech(format!(
                    "No speech engine available. Tried:\n\
                     1. XTTS (install: pip install TTS): {}\n\
                     2. espeak-ng (install: sudo apt install espeak-ng): {}",
                    xtts_error, e
                ))),
            }
        }
    }
}
