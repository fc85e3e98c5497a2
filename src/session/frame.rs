//! Data types that flow through the session pipeline.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

use crate::session::clock::epoch_secs;

/// One fixed-length frame of 16-bit PCM audio, the unit of voice-activity
/// classification. Immutable once sliced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFrame {
    samples: Vec<i16>,
}

impl AudioFrame {
    pub fn new(samples: Vec<i16>) -> Self {
        Self { samples }
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
}

/// A maximal contiguous run of speech frames, plus the wall-clock moment the
/// run began. Owned by exactly one session; consumed by a flush.
#[derive(Debug, Clone)]
pub struct SpeechRun {
    samples: Vec<i16>,
    started_at: SystemTime,
}

impl SpeechRun {
    /// Starts a new run at the given wall-clock time.
    pub fn new(started_at: SystemTime) -> Self {
        Self {
            samples: Vec::new(),
            started_at,
        }
    }

    /// Appends one frame's samples to the run.
    pub fn push_frame(&mut self, frame: &AudioFrame) {
        self.samples.extend_from_slice(frame.samples());
    }

    /// Wall-clock time of the first frame in the run.
    pub fn started_at(&self) -> SystemTime {
        self.started_at
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Duration of the buffered audio, derived from sample count.
    pub fn duration_secs(&self, sample_rate: u32) -> f64 {
        self.samples.len() as f64 / sample_rate as f64
    }

    /// Consumes the run, yielding the concatenated buffer for transcription.
    pub fn into_samples(self) -> Vec<i16> {
        self.samples
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }
}

/// Which event triggered a flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushKind {
    /// Speech→non-speech transition mid-stream.
    Transition,
    /// End of stream while still in speech.
    Final,
}

/// A transcribed segment with wall-clock timestamps in Unix epoch seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub start_time: f64,
    pub end_time: f64,
}

impl Segment {
    pub fn new(text: impl Into<String>, start_time: SystemTime, end_time: SystemTime) -> Self {
        Self {
            text: text.into(),
            start_time: epoch_secs(start_time),
            end_time: epoch_secs(end_time),
        }
    }
}
