//! TTSVid - quote narration
//!
//! Turns a list of text quotes into one narrated audio track. Each quote is
//! synthesized independently with a cloned presenter voice and the clips are
//! joined with fixed silent pauses.

pub mod audio;
pub mod config;
pub mod error;
pub mod form;
pub mod narrate;
pub mod platform;
pub mod quotes;
pub mod speech;

pub use error::{Result, TtsvidError};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "ttsvid";
