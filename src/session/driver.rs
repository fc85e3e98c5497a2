//! Per-session pipeline driver.
//!
//! One driver runs per active stream, pulling audio chunks from the
//! transport and pushing transcribed segments back, strictly sequentially:
//! slice → classify → accumulate → dispatch. Session state is never touched
//! by more than one task. The only suspension points are waiting for the
//! next chunk and waiting for the inference gate.

use crate::audio::slicer::FrameSlicer;
use crate::audio::vad::SpeechDetector;
use crate::session::accumulator::SpeechAccumulator;
use crate::session::clock::{Clock, SystemClock};
use crate::session::dispatcher::ChunkDispatcher;
use crate::session::frame::{FlushKind, Segment, SpeechRun};
use crate::stt::gate::InferenceHandle;
use tokio::sync::mpsc;

/// Pipeline parameters for one session.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    pub sample_rate: u32,
    pub frame_len_samples: usize,
    pub min_speech_secs: f64,
}

impl SessionConfig {
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self {
            sample_rate: config.audio.sample_rate,
            frame_len_samples: config.frame_len_samples(),
            min_speech_secs: config.segmentation.min_speech_secs,
        }
    }
}

/// Input items for a session.
#[derive(Debug, Clone)]
pub enum SessionInput {
    /// One transport chunk of raw little-endian 16-bit PCM bytes.
    Audio(Vec<u8>),
    /// Graceful end of input; triggers final-flush handling.
    End,
}

/// Output items from a session.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// One transcribed segment.
    Segment(Segment),
    /// Transcription of one buffer failed; the session continues.
    BufferError { message: String },
}

/// The per-session pipeline: frame slicing, speech accumulation, dispatch.
pub struct SessionPipeline<D: SpeechDetector, C: Clock = SystemClock> {
    slicer: FrameSlicer,
    accumulator: SpeechAccumulator<D, C>,
    dispatcher: ChunkDispatcher<C>,
    engine: InferenceHandle,
}

impl<D: SpeechDetector> SessionPipeline<D> {
    /// Creates a session pipeline with the system clock.
    pub fn new(config: SessionConfig, detector: D, engine: InferenceHandle) -> Self {
        Self::with_clock(config, detector, engine, SystemClock)
    }
}

impl<D: SpeechDetector, C: Clock + Clone> SessionPipeline<D, C> {
    /// Creates a session pipeline with the given clock.
    pub fn with_clock(
        config: SessionConfig,
        detector: D,
        engine: InferenceHandle,
        clock: C,
    ) -> Self {
        Self {
            slicer: FrameSlicer::new(config.frame_len_samples),
            accumulator: SpeechAccumulator::with_clock(
                detector,
                config.sample_rate,
                clock.clone(),
            ),
            dispatcher: ChunkDispatcher::with_clock(
                config.sample_rate,
                config.min_speech_secs,
                clock,
            ),
            engine,
        }
    }

    /// Number of buffers this session has dispatched to the engine.
    pub fn chunk_count(&self) -> u64 {
        self.dispatcher.chunk_count()
    }

    /// Runs the session until the input ends or the output side goes away.
    ///
    /// Input channel closing without a [`SessionInput::End`] marker means
    /// the peer disconnected: any pending speech run is discarded without
    /// an engine call. A graceful `End` flushes the pending run as final.
    pub async fn run(
        mut self,
        mut input: mpsc::Receiver<SessionInput>,
        output: mpsc::Sender<SessionEvent>,
    ) {
        while let Some(item) = input.recv().await {
            match item {
                SessionInput::Audio(chunk) => {
                    if !self.handle_chunk(&chunk, &output).await {
                        return;
                    }
                }
                SessionInput::End => {
                    // Stop pulling further chunks once input ended
                    if let Some(run) = self.accumulator.finish() {
                        self.flush(run, FlushKind::Final, &output).await;
                    }
                    return;
                }
            }
        }

        // Disconnect: discard the partial run without submitting it
        if let Some(run) = self.accumulator.finish() {
            tracing::debug!(
                pending_samples = run.sample_count(),
                "peer disconnected; dropping partial speech run"
            );
        }
    }

    /// Feeds one transport chunk through the pipeline.
    ///
    /// Returns false when the output side is gone and the session should
    /// stop.
    async fn handle_chunk(&mut self, chunk: &[u8], output: &mpsc::Sender<SessionEvent>) -> bool {
        for frame in self.slicer.push(chunk) {
            if let Some(run) = self.accumulator.process(&frame)
                && !self.flush(run, FlushKind::Transition, output).await
            {
                return false;
            }
        }
        true
    }

    /// Dispatches a flushed run and forwards the outcome.
    ///
    /// Engine failures are reported as a per-buffer event; the session's
    /// state machine is unaffected and keeps accumulating.
    async fn flush(
        &mut self,
        run: SpeechRun,
        kind: FlushKind,
        output: &mpsc::Sender<SessionEvent>,
    ) -> bool {
        match self.dispatcher.dispatch(run, kind, &self.engine).await {
            Ok(segments) => {
                for segment in segments {
                    tracing::info!(
                        start = segment.start_time,
                        end = segment.end_time,
                        text = %segment.text,
                        "transcription"
                    );
                    if output.send(SessionEvent::Segment(segment)).await.is_err() {
                        return false;
                    }
                }
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "buffer transcription failed");
                output
                    .send(SessionEvent::BufferError {
                        message: e.to_string(),
                    })
                    .await
                    .is_ok()
            }
        }
    }
}
