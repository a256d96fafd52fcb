//! Audio buffers: pause arithmetic, stitching and WAV I/O

pub mod stitch;
pub mod wav;

pub use stitch::{segment_offsets, stitch};
pub use wav::{read_mono, write_track, WavEncoding};

/// Sample rate produced by the XTTS v2 model
pub const XTTS_SAMPLE_RATE: u32 = 24_000;

/// Number of silent samples for a pause of `seconds` at `sample_rate`
pub fn pause_samples(seconds: u32, sample_rate: u32) -> usize {
    seconds as usize * sample_rate as usize
}

/// The final narration: every segment in order plus the rate to play it at
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedTrack {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl CombinedTrack {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Playback length in seconds
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
