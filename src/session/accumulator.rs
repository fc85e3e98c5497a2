//! Voice-activity accumulator: the per-session speech segmentation state
//! machine.
//!
//! Classifies each incoming frame through the [`SpeechDetector`] capability
//! and accumulates contiguous speech frames into a pending [`SpeechRun`].
//! Transition table:
//!
//! - `Idle` + speech frame → `InSpeech`; record the run's wall-clock start.
//! - `InSpeech` + speech frame → `InSpeech`; append frame.
//! - `InSpeech` + non-speech frame → flush the run; back to `Idle`.
//! - `Idle` + non-speech frame → no-op.
//! - End of stream while `InSpeech` → final flush; `Finished`.
//! - End of stream while `Idle` → `Finished`, no flush.
//!
//! The accumulator only ever emits flushes; deciding whether a flushed run
//! is worth transcribing belongs to the dispatcher.

use crate::audio::vad::SpeechDetector;
use crate::session::clock::{Clock, SystemClock};
use crate::session::frame::{AudioFrame, SpeechRun};

/// Accumulator states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccumulatorState {
    /// No active speech run.
    Idle,
    /// Accumulating a speech run.
    InSpeech,
    /// Stream ended; no further frames are accepted.
    Finished,
}

/// Per-session speech accumulation state machine.
pub struct SpeechAccumulator<D: SpeechDetector, C: Clock = SystemClock> {
    detector: D,
    clock: C,
    sample_rate: u32,
    current_run: Option<SpeechRun>,
    finished: bool,
}

impl<D: SpeechDetector> SpeechAccumulator<D> {
    /// Creates an accumulator with the system clock.
    pub fn new(detector: D, sample_rate: u32) -> Self {
        Self::with_clock(detector, sample_rate, SystemClock)
    }
}

impl<D: SpeechDetector, C: Clock> SpeechAccumulator<D, C> {
    /// Creates an accumulator with the given clock.
    pub fn with_clock(detector: D, sample_rate: u32, clock: C) -> Self {
        Self {
            detector,
            clock,
            sample_rate,
            current_run: None,
            finished: false,
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> AccumulatorState {
        if self.finished {
            AccumulatorState::Finished
        } else if self.current_run.is_some() {
            AccumulatorState::InSpeech
        } else {
            AccumulatorState::Idle
        }
    }

    /// Processes one frame. Each frame is classified exactly once.
    ///
    /// Returns the completed run on a speech→non-speech transition; `None`
    /// otherwise. Frames arriving after [`finish`](Self::finish) are
    /// dropped.
    pub fn process(&mut self, frame: &AudioFrame) -> Option<SpeechRun> {
        if self.finished {
            return None;
        }

        let is_speech = self.detector.is_speech(frame.samples(), self.sample_rate);

        if is_speech {
            let run = self
                .current_run
                .get_or_insert_with(|| SpeechRun::new(self.clock.now()));
            run.push_frame(frame);
            None
        } else {
            // Idle + non-speech stays None; InSpeech + non-speech flushes.
            self.current_run.take()
        }
    }

    /// Signals end of stream.
    ///
    /// Returns the pending run when the stream ended mid-speech; the caller
    /// dispatches it as a final flush.
    pub fn finish(&mut self) -> Option<SpeechRun> {
        self.finished = true;
        self.current_run.take()
    }

    /// Duration of the pending run in seconds, 0.0 when idle.
    pub fn pending_secs(&self) -> f64 {
        self.current_run
            .as_ref()
            .map(|run| run.duration_secs(self.sample_rate))
            .unwrap_or(0.0)
    }
}
