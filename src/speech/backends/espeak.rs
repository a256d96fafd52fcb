//! espeak-ng fallback engine
//!
//! Formant synthesis, always available on minimal Linux installs but unable
//! to clone a voice: the presenter recording is ignored. Each quote is fed
//! on stdin and rendered to a WAV file in a private scratch directory.
//!
//! Dependencies:
//! - espeak-ng (install with: sudo apt install espeak-ng)

use super::check_sample_rate;
use crate::audio::read_mono;
use crate::speech::SpeechEngine;
use crate::{Result, TtsvidError};
use log::{debug, error, warn};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use tempfile::TempDir;

/// Output rate of the standard espeak-ng voices
pub const ESPEAK_SAMPLE_RATE: u32 = 22_050;

/// espeak-ng engine
pub struct EspeakEngine {
    /// Path to espeak-ng
    espeak_path: String,

    /// Scratch directory for rendered segments
    scratch: TempDir,

    /// Segments rendered so far, used to name scratch files
    rendered: usize,

    /// Whether the "voice sample ignored" warning was already logged
    voice_warned: bool,
}

impl EspeakEngine {
    /// Create a new espeak-ng engine
    ///
    /// Verifies espeak-ng is installed
    pub fn new() -> Result<Self> {
        debug!("Creating espeak-ng engine");

        let espeak_path = Self::find_espeak()?;
        debug!("Found espeak-ng at: {}", espeak_path);
        Self::with_program(espeak_path)
    }

    fn with_program(espeak_path: String) -> Result<Self> {
        Ok(Self {
            espeak_path,
            scratch: tempfile::tempdir()?,
            rendered: 0,
            voice_warned: false,
        })
    }

    /// Find espeak-ng executable
    fn find_espeak() -> Result<String> {
        let paths = ["espeak-ng", "/usr/bin/espeak-ng", "espeak"];

        for path in paths {
            if let Ok(status) = Command::new(path)
                .arg("--version")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
            {
                if status.success() {
                    return Ok(path.to_string());
                }
            }
        }

        Err(TtsvidError::Speech(
            "espeak-ng not found. Install with: sudo apt install espeak-ng".to_string(),
        ))
    }

    /// Arguments for rendering stdin text to `out` in `language`
    fn render_args(language: &str, out: &Path) -> Vec<String> {
        vec![
            "-v".to_string(),
            language.to_string(),
            "-w".to_string(),
            out.display().to_string(),
            "--stdin".to_string(),
        ]
    }

    fn render(&self, text: &str, language: &str, out: &Path) -> Result<()> {
        let mut child = Command::new(&self.espeak_path)
            .args(Self::render_args(language, out))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                error!("Failed to spawn espeak-ng: {}", e);
                TtsvidError::Speech(format!("Failed to start espeak-ng: {}", e))
            })?;

        // Reap the child and read its diagnostics even when the write fails
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(text.as_bytes()),
            None => Ok(()),
        };

        let output = child.wait_with_output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TtsvidError::Speech(format!(
                "espeak-ng exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        written?;
        Ok(())
    }
}

impl SpeechEngine for EspeakEngine {
    fn name(&self) -> &str {
        "espeak-ng"
    }

    fn sample_rate(&self) -> u32 {
        ESPEAK_SAMPLE_RATE
    }

    fn synthesize(&mut self, text: &str, voice: &Path, language: &str) -> Result<Vec<f32>> {
        if !self.voice_warned {
            warn!(
                "espeak-ng cannot clone voices, ignoring presenter sample {:?}",
                voice
            );
            self.voice_warned = true;
        }

        self.rendered += 1;
        let out = self
            .scratch
            .path()
            .join(format!("segment-{}.wav", self.rendered));
        debug!("Rendering with espeak-ng to {:?}", out);

        self.render(text, language, &out)?;
        let (samples, rate) = read_mono(&out)?;
        if let Err(e) = fs::remove_file(&out) {
            debug!("Failed to remove {:?}: {}", out, e);
        }

        check_sample_rate(ESPEAK_SAMPLE_RATE, rate)?;
        Ok(samples)
    }
}
