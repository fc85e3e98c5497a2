//! Frame slicer: turns arbitrarily-sized transport chunks into fixed-length
//! classification frames.
//!
//! The transport may segment the stream at any byte boundary; a byte-level
//! carry buffer keeps frame boundaries stable regardless of how chunks
//! arrive. Leftover bytes too short for a full frame (including a dangling
//! half-sample) are held until the next chunk.

use crate::session::frame::AudioFrame;

/// Stateful splitter producing exact-length frames of little-endian 16-bit
/// PCM samples.
pub struct FrameSlicer {
    frame_len_samples: usize,
    carry: Vec<u8>,
}

impl FrameSlicer {
    /// Creates a slicer emitting frames of `frame_len_samples` samples.
    pub fn new(frame_len_samples: usize) -> Self {
        debug_assert!(frame_len_samples > 0);
        Self {
            frame_len_samples,
            carry: Vec::new(),
        }
    }

    /// Frame length in samples.
    pub fn frame_len_samples(&self) -> usize {
        self.frame_len_samples
    }

    /// Frame length in bytes (16-bit samples).
    pub fn frame_len_bytes(&self) -> usize {
        self.frame_len_samples * 2
    }

    /// Bytes currently held over for the next chunk.
    pub fn carry_len(&self) -> usize {
        self.carry.len()
    }

    /// Feeds one transport chunk and returns every complete frame it yields.
    ///
    /// Empty input yields no frames and leaves the carry unchanged.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<AudioFrame> {
        if chunk.is_empty() {
            return Vec::new();
        }

        self.carry.extend_from_slice(chunk);

        let frame_bytes = self.frame_len_bytes();
        let whole = self.carry.len() / frame_bytes;
        if whole == 0 {
            return Vec::new();
        }

        let consumed = whole * frame_bytes;
        let mut frames = Vec::with_capacity(whole);
        for raw in self.carry[..consumed].chunks_exact(frame_bytes) {
            frames.push(AudioFrame::new(decode_le_samples(raw)));
        }
        self.carry.drain(..consumed);
        frames
    }
}

/// Decodes little-endian 16-bit PCM bytes into samples.
///
/// The input length must be even; the slicer only passes whole frames.
fn decode_le_samples(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}
