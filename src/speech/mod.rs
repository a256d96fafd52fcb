//! Speech synthesis system

pub mod backends;
pub mod driver;
pub mod engine;

pub use driver::{synthesize_quotes, Synthesis};
pub use engine::{create_engine, Backend, Device, EngineSettings, SpeechEngine};
