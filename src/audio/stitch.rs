//! Joins independently synthesized segments into one buffer
//!
//! Layout of the output for segments `s0..sn` and a pause of `p` samples:
//!
//! ```text
//! s0 | p zeros | s1 | p zeros | ... | sn
//! ```
//!
//! No pause precedes the first segment or follows the last one. Samples are
//! copied verbatim; nothing is clipped, normalized or resampled.

use crate::{Result, TtsvidError};
use log::{debug, warn};

/// Concatenate `segments` with `pause` silent samples between neighbours
///
/// The silence value is `T::default()` (0.0 for floats). Fails with
/// [`TtsvidError::EmptyInput`] when there is nothing to stitch.
///
/// A zero-length segment still counts as a segment, so it is framed by full
/// pauses on both sides and the output length is always
/// `sum(len) + (n - 1) * pause`.
pub fn stitch<T: Copy + Default>(segments: &[Vec<T>], pause: usize) -> Result<Vec<T>> {
    if segments.is_empty() {
        return Err(TtsvidError::EmptyInput);
    }

    let total_samples: usize = segments.iter().map(Vec::len).sum();
    let capacity = total_samples + (segments.len() - 1) * pause;
    debug!(
        "Stitching {} segments ({} samples, pause {}) into {} samples",
        segments.len(),
        total_samples,
        pause,
        capacity
    );

    let mut combined = Vec::with_capacity(capacity);
    for (index, segment) in segments.iter().enumerate() {
        if segment.is_empty() {
            warn!("Segment {} is empty, keeping its pauses", index);
        }
        if index > 0 {
            combined.resize(combined.len() + pause, T::default());
        }
        combined.extend_from_slice(segment);
    }

    debug_assert_eq!(combined.len(), capacity);
    Ok(combined)
}

/// Start offset of each segment inside the buffer [`stitch`] would build
pub fn segment_offsets(lengths: &[usize], pause: usize) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(lengths.len());
    let mut offset = 0;
    for len in lengths {
        offsets.push(offset);
        offset += len + pause;
    }
    offsets
}
