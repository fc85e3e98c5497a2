//! WAV file decoding for the streaming client mode.
//!
//! Supports arbitrary sample rates and channels, downmixing to mono and
//! resampling to the server's configured rate.

use crate::error::{Result, ScribedError};
use std::io::Read;

/// Decoded WAV audio normalized to mono 16-bit PCM at the target rate.
pub struct WavAudio {
    samples: Vec<i16>,
}

impl WavAudio {
    /// Decodes WAV data from any reader, normalizing to mono at
    /// `target_rate`.
    pub fn from_reader(reader: impl Read, target_rate: u32) -> Result<Self> {
        let mut wav_reader = hound::WavReader::new(reader).map_err(|e| ScribedError::AudioDecode {
            message: format!("Failed to parse WAV file: {}", e),
        })?;

        let spec = wav_reader.spec();
        let source_rate = spec.sample_rate;
        let source_channels = spec.channels;

        let raw_samples: Vec<i16> = wav_reader
            .samples::<i16>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| ScribedError::AudioDecode {
                message: format!("Failed to read WAV samples: {}", e),
            })?;

        // Downmix stereo to mono
        let mono_samples = if source_channels == 2 {
            raw_samples
                .chunks_exact(2)
                .map(|pair| {
                    let left = pair[0] as i32;
                    let right = pair[1] as i32;
                    ((left + right) / 2) as i16
                })
                .collect()
        } else if source_channels == 1 {
            raw_samples
        } else {
            return Err(ScribedError::AudioDecode {
                message: format!("Unsupported channel count: {}", source_channels),
            });
        };

        let samples = if source_rate != target_rate {
            resample(&mono_samples, source_rate, target_rate)
        } else {
            mono_samples
        };

        Ok(Self { samples })
    }

    /// Opens and decodes a WAV file from disk.
    pub fn from_path(path: &std::path::Path, target_rate: u32) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file), target_rate)
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Iterates the audio as little-endian PCM byte chunks of at most
    /// `samples_per_chunk` samples, the shape the transport expects.
    pub fn pcm_chunks(&self, samples_per_chunk: usize) -> impl Iterator<Item = Vec<u8>> + '_ {
        self.samples.chunks(samples_per_chunk).map(|chunk| {
            chunk
                .iter()
                .flat_map(|s| s.to_le_bytes())
                .collect::<Vec<u8>>()
        })
    }
}

/// Simple linear interpolation resampling.
fn resample(samples: &[i16], from_rate: u32, to_rate: u32) -> Vec<i16> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / ratio).ceil() as usize;

    (0..output_len)
        .map(|i| {
            let src_pos = i as f64 * ratio;
            let idx = src_pos as usize;
            let frac = src_pos - idx as f64;

            if idx + 1 < samples.len() {
                let a = samples[idx] as f64;
                let b = samples[idx + 1] as f64;
                (a + (b - a) * frac) as i16
            } else {
                samples[samples.len() - 1]
            }
        })
        .collect()
}
