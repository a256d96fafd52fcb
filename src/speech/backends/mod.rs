//! Speech engine backends

// Coqui XTTS v2 in a persistent Python worker
pub mod xtts;

// espeak-ng command line fallback
pub mod espeak;

use crate::{Result, TtsvidError};

/// Reject audio produced at a rate other than the one the engine declared
pub(crate) fn check_sample_rate(expected: u32, found: u32) -> Result<()> {
    if expected != found {
        return Err(TtsvidError::SampleRateMismatch { expected, found });
    }
    Ok(())
}
