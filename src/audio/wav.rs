//! WAV reading (engine output) and writing (the combined track)

use super::CombinedTrack;
use crate::{Result, TtsvidError};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::debug;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// Sample encoding of the written WAV file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum WavEncoding {
    /// 32-bit IEEE float, samples written as-is
    #[default]
    Float32,
    /// Signed 16-bit PCM, samples clamped to [-1, 1]
    Pcm16,
}

impl WavEncoding {
    fn spec(self, sample_rate: u32) -> WavSpec {
        match self {
            WavEncoding::Float32 => WavSpec {
                channels: 1,
                sample_rate,
                bits_per_sample: 32,
                sample_format: SampleFormat::Float,
            },
            WavEncoding::Pcm16 => WavSpec {
                channels: 1,
                sample_rate,
                bits_per_sample: 16,
                sample_format: SampleFormat::Int,
            },
        }
    }
}

impl FromStr for WavEncoding {
    type Err = TtsvidError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "float32" | "float" | "f32" => Ok(WavEncoding::Float32),
            "pcm16" | "pcm" | "s16" => Ok(WavEncoding::Pcm16),
            other => Err(TtsvidError::Config(format!(
                "Unknown WAV encoding: {}",
                other
            ))),
        }
    }
}

/// Write a mono WAV file for `track`
pub fn write_track(path: &Path, track: &CombinedTrack, encoding: WavEncoding) -> Result<()> {
    debug!(
        "Writing {} samples at {} Hz to {:?} ({:?})",
        track.samples.len(),
        track.sample_rate,
        path,
        encoding
    );

    let mut writer = WavWriter::create(path, encoding.spec(track.sample_rate))?;
    match encoding {
        WavEncoding::Float32 => {
            for &sample in &track.samples {
                writer.write_sample(sample)?;
            }
        }
        WavEncoding::Pcm16 => {
            for &sample in &track.samples {
                writer.write_sample(to_i16(sample))?;
            }
        }
    }
    writer.finalize()?;
    Ok(())
}

fn to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}

/// Read a WAV file as mono f32 samples, returning them with the file's rate
///
/// Multichannel audio is downmixed by averaging each frame.
pub fn read_mono(path: &Path) -> Result<(Vec<f32>, u32)> {
    let reader = WavReader::open(path).map_err(|e| {
        TtsvidError::Audio(format!("Failed to open WAV file {}: {}", path.display(), e))
    })?;
    decode_mono(reader)
}

fn decode_mono<R: Read>(reader: WavReader<R>) -> Result<(Vec<f32>, u32)> {
    let spec = reader.spec();
    let samples: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, _) => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<_, _>>()?,
        (SampleFormat::Int, 16) => reader
            .into_samples::<i16>()
            .map(|s| s.map(|v| v as f32 / i16::MAX as f32))
            .collect::<std::result::Result<_, _>>()?,
        (SampleFormat::Int, 24) => reader
            .into_samples::<i32>()
            .map(|s| s.map(|v| v as f32 / 8_388_607.0))
            .collect::<std::result::Result<_, _>>()?,
        (SampleFormat::Int, 32) => reader
            .into_samples::<i32>()
            .map(|s| s.map(|v| v as f32 / i32::MAX as f32))
            .collect::<std::result::Result<_, _>>()?,
        (SampleFormat::Int, bits) => {
            return Err(TtsvidError::Audio(format!(
                "Unsupported bit depth: {}",
                bits
            )))
        }
    };

    let mono = if spec.channels > 1 {
        samples
            .chunks(spec.channels as usize)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect()
    } else {
        samples
    };

    Ok((mono, spec.sample_rate))
}
