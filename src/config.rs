//! Configuration management

use crate::audio::WavEncoding;
use crate::form::DEFAULT_PREVIEW_SIZE;
use crate::speech::engine::DEFAULT_LOAD_TIMEOUT;
use crate::speech::{Backend, Device, EngineSettings};
use crate::{Result, TtsvidError};
use ini::Ini;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "tts_models/multilingual/multi-dataset/xtts_v2";
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_OUTPUT: &str = "output.wav";

/// Application configuration
///
/// Holds the engine selection, output format and generation defaults.
/// Command line flags override anything read from here.
pub struct Config {
    /// INI configuration storage
    ini: Ini,

    /// Config file path (~/.ttsvid.cfg)
    path: PathBuf,
}

impl Config {
    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, writing a default file if none exists
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", path);

        let ini = if path.exists() {
            Ini::load_from_file(path)
                .map_err(|e| TtsvidError::IniParse(format!("Failed to load config: {}", e)))?
        } else {
            info!("Config file not found, creating default at {:?}", path);
            let default = Self::default_config();
            default
                .write_to_file(path)
                .map_err(|e| TtsvidError::IniParse(format!("Failed to write config: {}", e)))?;
            default
        };

        Ok(Self {
            ini,
            path: path.to_path_buf(),
        })
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        debug!("Saving config to {:?}", self.path);
        self.ini
            .write_to_file(&self.path)
            .map_err(|e| TtsvidError::Config(format!("Failed to save config: {}", e)))
    }

    /// Get config file path (~/.ttsvid.cfg)
    fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".ttsvid.cfg")
    }

    /// Expose the config file path for display
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create default configuration
    fn default_config() -> Ini {
        let mut ini = Ini::new();

        ini.with_section(Some("engine"))
            .set("backend", "auto")
            .set("python", "python3")
            .set("model", DEFAULT_MODEL)
            .set("device", "auto")
            .set("language", DEFAULT_LANGUAGE)
            .set("load_timeout", DEFAULT_LOAD_TIMEOUT.as_secs().to_string());

        ini.with_section(Some("output"))
            .set("path", DEFAULT_OUTPUT)
            .set("encoding", "float32");

        ini.with_section(Some("generation"))
            .set("pause_seconds", "1")
            .set("preview_size", DEFAULT_PREVIEW_SIZE.to_string());

        ini
    }

    /// Get a boolean value from config
    pub fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Get a string value from config
    pub fn get_string(&self, section: &str, key: &str, default: &str) -> String {
        self.ini
            .get_from(Some(section), key)
            .unwrap_or(default)
            .to_string()
    }

    /// Get an integer value from config
    pub fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Set a value in config
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        self.ini.with_section(Some(section)).set(key, value);
    }

    /// Which speech engine to start
    pub fn backend(&self) -> Result<Backend> {
        self.get_string("engine", "backend", "auto").parse()
    }

    /// Python interpreter that hosts the XTTS worker
    pub fn python(&self) -> String {
        self.get_string("engine", "python", "python3")
    }

    /// XTTS model name
    pub fn model(&self) -> String {
        self.get_string("engine", "model", DEFAULT_MODEL)
    }

    /// Compute device for the XTTS model
    pub fn device(&self) -> Result<Device> {
        self.get_string("engine", "device", "auto").parse()
    }

    /// Language code passed to the engine for every quote
    pub fn language(&self) -> String {
        self.get_string("engine", "language", DEFAULT_LANGUAGE)
    }

    /// Longest wait for the engine to finish loading
    pub fn load_timeout(&self) -> Duration {
        let default = DEFAULT_LOAD_TIMEOUT.as_secs() as i64;
        self.get_int("engine", "load_timeout", default)
            .try_into()
            .ok()
            .filter(|&secs: &u64| secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_LOAD_TIMEOUT)
    }

    /// Where the narration is written
    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(self.get_string("output", "path", DEFAULT_OUTPUT))
    }

    /// Sample encoding of the written WAV file
    pub fn encoding(&self) -> Result<WavEncoding> {
        self.get_string("output", "encoding", "float32").parse()
    }

    /// Default pause between quotes in seconds
    pub fn pause_seconds(&self) -> i64 {
        self.get_int("generation", "pause_seconds", 1)
    }

    /// Number of quotes generated by a preview, never zero
    pub fn preview_size(&self) -> usize {
        self.get_int("generation", "preview_size", DEFAULT_PREVIEW_SIZE as i64)
            .try_into()
            .ok()
            .filter(|&size| size > 0)
            .unwrap_or(DEFAULT_PREVIEW_SIZE)
    }

    /// Engine settings as configured, before command line overrides
    pub fn engine_settings(&self) -> Result<EngineSettings> {
        Ok(EngineSettings {
            backend: self.backend()?,
            python: self.python(),
            model: self.model(),
            device: self.device()?,
            language: self.language(),
            load_timeout: self.load_timeout(),
        })
    }
}
