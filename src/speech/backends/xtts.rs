//! Coqui XTTS v2 backend
//!
//! Loading XTTS takes tens of seconds, so the model lives in one persistent
//! Python worker for the lifetime of the engine. The worker reads one JSON
//! request per line on stdin and answers with marker-prefixed JSON lines on
//! stdout. Anything else the library prints on stdout is skipped.
//!
//! Requests:
//! - `{"op":"synthesize","text":..,"speaker_wav":..,"language":..,"out_path":..}`
//! - `{"op":"quit"}`
//!
//! Events:
//! - `ready` with the device in use and the model's output sample rate
//! - `done` once `out_path` holds the rendered WAV
//! - `failed` with an error message
//!
//! Loading must never wait on the user. The worker detaches its stdin and
//! refuses `input()` while the model loads (the Coqui licence prompt asks
//! for one on first use), and the engine gives up on a worker that is not
//! ready within [`EngineSettings::load_timeout`]. Worker stderr goes to the
//! debug log.
//!
//! Dependencies:
//! - Python 3 with `TTS` and `torch` (install with: pip install TTS)

use super::check_sample_rate;
use crate::audio::read_mono;
use crate::speech::{EngineSettings, SpeechEngine};
use crate::{Result, TtsvidError};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

/// Prefix marking protocol lines in the worker's stdout
const PROTOCOL_PREFIX: &str = "@@ttsvid ";

/// Worker program, run with `python -c <script> <model> <device>`
const WORKER_SCRIPT: &str = r#"
import builtins
import json
import os
import sys

PREFIX = "@@ttsvid "

def emit(event, **fields):
    fields["event"] = event
    sys.stdout.write(PREFIX + json.dumps(fields) + "\n")
    sys.stdout.flush()

def refuse_input(prompt=""):
    raise RuntimeError(
        "model asked for interactive input (%s); set COQUI_TOS_AGREED=1 "
        "after accepting the Coqui licence" % str(prompt).strip()
    )

def main():
    model_name, device = sys.argv[1], sys.argv[2]

    # requests keep the real stdin, library code only ever sees /dev/null
    requests = os.fdopen(os.dup(0), "r")
    devnull = os.open(os.devnull, os.O_RDONLY)
    os.dup2(devnull, 0)
    os.close(devnull)

    prompt = builtins.input
    builtins.input = refuse_input
    try:
        import torch
        from TTS.api import TTS
        if device == "cuda" and not torch.cuda.is_available():
            device = "cpu"
        tts = TTS(model_name).to(device)
        sample_rate = int(tts.synthesizer.output_sample_rate)
    except BaseException as e:
        emit("failed", error="could not load model: %s" % e)
        return
    finally:
        builtins.input = prompt

    emit("ready", device=device, sample_rate=sample_rate)

    for line in requests:
        line = line.strip()
        if not line:
            continue
        request = json.loads(line)
        if request.get("op") == "quit":
            break
        try:
            tts.tts_to_file(
                text=request["text"],
                speaker_wav=request["speaker_wav"],
                language=request["language"],
                file_path=request["out_path"],
            )
            emit("done")
        except Exception as e:
            emit("failed", error=str(e))

main()
"#;

/// Request sent to the worker
#[derive(Debug, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum WorkerRequest<'a> {
    Synthesize {
        text: &'a str,
        speaker_wav: &'a Path,
        language: &'a str,
        out_path: &'a Path,
    },
    Quit,
}

/// Event reported by the worker
#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
enum WorkerEvent {
    Ready { device: String, sample_rate: u32 },
    Done,
    Failed { error: String },
}

/// Parse a worker stdout line; `None` for lines that are not protocol events
fn parse_event(line: &str) -> Option<Result<WorkerEvent>> {
    line.trim_end()
        .strip_prefix(PROTOCOL_PREFIX)
        .map(|payload| serde_json::from_str(payload).map_err(TtsvidError::from))
}

/// XTTS engine backed by a persistent Python worker
pub struct XttsEngine {
    /// Running worker process
    process: Child,

    /// Events parsed from the worker's stdout by a reader thread
    events: Receiver<Result<WorkerEvent>>,

    /// Device the model was loaded onto
    device: String,

    /// Output rate reported by the model
    sample_rate: u32,

    /// Scratch directory for rendered segments
    scratch: TempDir,

    /// Segments rendered so far, used to name scratch files
    rendered: usize,
}

impl XttsEngine {
    /// Start the worker and wait until the model is loaded
    pub fn new(settings: &EngineSettings) -> Result<Self> {
        let device = settings.device.resolve();
        info!(
            "Starting XTTS worker ({} with model {} on {})",
            settings.python, settings.model, device
        );

        let mut process = Command::new(&settings.python)
            .arg("-c")
            .arg(WORKER_SCRIPT)
            .arg(&settings.model)
            .arg(device.as_str())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                error!("Failed to spawn XTTS worker: {}", e);
                TtsvidError::Speech(format!(
                    "Failed to start {}: {}",
                    settings.python, e
                ))
            })?;
        debug!("XTTS worker started with PID: {:?}", process.id());

        if let Some(stderr) = process.stderr.take() {
            forward_stderr(stderr);
        }
        let Some(stdout) = process.stdout.take() else {
            let _ = process.kill();
            let _ = process.wait();
            return Err(TtsvidError::Speech(
                "XTTS worker stdout not available".to_string(),
            ));
        };

        let mut engine = Self {
            process,
            events: spawn_event_reader(stdout),
            device: device.to_string(),
            sample_rate: 0,
            scratch: tempfile::tempdir()?,
            rendered: 0,
        };

        let loaded = match engine.read_event(Some(settings.load_timeout)) {
            Ok(event) => event,
            Err(e) => {
                // A stuck worker would block the wait in Drop
                let _ = engine.process.kill();
                return Err(e);
            }
        };

        match loaded {
            WorkerEvent::Ready {
                device,
                sample_rate,
            } => {
                info!("XTTS model loaded on {} ({} Hz)", device, sample_rate);
                engine.device = device;
                engine.sample_rate = sample_rate;
                Ok(engine)
            }
            WorkerEvent::Failed { error } => Err(TtsvidError::Speech(error)),
            WorkerEvent::Done => Err(TtsvidError::Speech(
                "XTTS worker reported completion before loading".to_string(),
            )),
        }
    }

    /// Device the model is running on
    pub fn device(&self) -> &str {
        &self.device
    }

    /// Send a request line to the worker
    fn send_request(&mut self, request: &WorkerRequest<'_>) -> Result<()> {
        let line = serde_json::to_string(request)?;
        let stdin = self
            .process
            .stdin
            .as_mut()
            .ok_or_else(|| TtsvidError::Speech("XTTS worker stdin not available".to_string()))?;

        writeln!(stdin, "{}", line).map_err(|e| {
            error!("Failed to write request to XTTS worker: {}", e);
            TtsvidError::Speech(format!("Failed to send request: {}", e))
        })?;
        stdin.flush().map_err(|e| {
            error!("Failed to flush XTTS worker stdin: {}", e);
            TtsvidError::Speech(format!("Failed to flush request: {}", e))
        })
    }

    /// Wait for the worker's next event, at most `timeout` when given
    fn read_event(&mut self, timeout: Option<Duration>) -> Result<WorkerEvent> {
        let exited = || TtsvidError::Speech("XTTS worker exited unexpectedly".to_string());
        match timeout {
            Some(limit) => match self.events.recv_timeout(limit) {
                Ok(event) => event,
                Err(RecvTimeoutError::Timeout) => Err(TtsvidError::Speech(format!(
                    "XTTS worker was not ready after {} s",
                    limit.as_secs()
                ))),
                Err(RecvTimeoutError::Disconnected) => Err(exited()),
            },
            None => self.events.recv().map_err(|_| exited())?,
        }
    }
}

/// Parse protocol events from the worker's stdout until it closes
fn spawn_event_reader<R: Read + Send + 'static>(stdout: R) -> Receiver<Result<WorkerEvent>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in BufReader::new(stdout).lines() {
            let Ok(line) = line else { break };
            match parse_event(&line) {
                Some(event) => {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
                None => debug!("xtts: {}", line),
            }
        }
    });
    rx
}

/// Copy the worker's stderr into the debug log
fn forward_stderr<R: Read + Send + 'static>(stderr: R) {
    thread::spawn(move || {
        for line in BufReader::new(stderr).lines() {
            let Ok(line) = line else { break };
            debug!("xtts stderr: {}", line);
        }
    });
}

impl SpeechEngine for XttsEngine {
    fn name(&self) -> &str {
        "XTTS"
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn synthesize(&mut self, text: &str, voice: &Path, language: &str) -> Result<Vec<f32>> {
        self.rendered += 1;
        let out = self
            .scratch
            .path()
            .join(format!("segment-{}.wav", self.rendered));

        self.send_request(&WorkerRequest::Synthesize {
            text,
            speaker_wav: voice,
            language,
            out_path: &out,
        })?;

        match self.read_event(None)? {
            WorkerEvent::Done => {}
            WorkerEvent::Failed { error } => return Err(TtsvidError::Speech(error)),
            WorkerEvent::Ready { .. } => {
                return Err(TtsvidError::Speech(
                    "XTTS worker restarted mid-batch".to_string(),
                ))
            }
        }

        let (samples, rate) = read_mono(&out)?;
        if let Err(e) = fs::remove_file(&out) {
            debug!("Failed to remove {:?}: {}", out, e);
        }

        check_sample_rate(self.sample_rate, rate)?;
        Ok(samples)
    }
}

impl Drop for XttsEngine {
    fn drop(&mut self) {
        debug!("Shutting down XTTS worker");

        if let Err(e) = self.send_request(&WorkerRequest::Quit) {
            debug!("Failed to send quit request: {}", e);
        }
        // Closing stdin ends the worker's read loop even if quit was lost
        drop(self.process.stdin.take());

        match self.process.wait() {
            Ok(status) => debug!("XTTS worker exited with {}", status),
            Err(e) => {
                warn!("Failed to wait for XTTS worker: {}", e);
                let _ = self.process.kill();
            }
        }
    }
}
