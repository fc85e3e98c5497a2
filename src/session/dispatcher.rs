//! Chunk dispatcher: decides whether a flushed speech run is worth
//! transcribing and stamps the resulting segments with wall-clock times.
//!
//! Runs shorter than the configured minimum are discarded without an engine
//! call. Dispatched buffers get their segments timestamped by one of two
//! strategies depending on the flush kind:
//!
//! - transition flush: `end_time` is the wall clock when segment mapping
//!   happens, i.e. after inference returned. Every segment from one buffer
//!   shares that end time.
//! - final flush: `end_time` is `started_at` plus the buffer duration,
//!   derived from sample count instead of the wall clock.
//!
//! The two paths are intentionally not unified; downstream consumers depend
//! on the observable difference.

use crate::session::clock::{Clock, SystemClock};
use crate::session::frame::{FlushKind, Segment, SpeechRun};
use crate::stt::gate::InferenceHandle;
use std::time::{Duration, SystemTime};

use crate::error::Result;

/// Per-session dispatch policy and chunk accounting.
pub struct ChunkDispatcher<C: Clock = SystemClock> {
    sample_rate: u32,
    min_speech_secs: f64,
    chunk_counter: u64,
    clock: C,
}

impl ChunkDispatcher {
    /// Creates a dispatcher with the system clock.
    pub fn new(sample_rate: u32, min_speech_secs: f64) -> Self {
        Self::with_clock(sample_rate, min_speech_secs, SystemClock)
    }
}

impl<C: Clock> ChunkDispatcher<C> {
    /// Creates a dispatcher with the given clock.
    pub fn with_clock(sample_rate: u32, min_speech_secs: f64, clock: C) -> Self {
        Self {
            sample_rate,
            min_speech_secs,
            chunk_counter: 0,
            clock,
        }
    }

    /// Number of buffers dispatched to the engine so far.
    pub fn chunk_count(&self) -> u64 {
        self.chunk_counter
    }

    /// Dispatches one flushed run.
    ///
    /// Returns the timestamped segments, or an empty vector when the run is
    /// below the duration floor (no engine call happens in that case). An
    /// engine failure is returned as an error scoped to this buffer; the
    /// dispatcher remains usable.
    pub async fn dispatch(
        &mut self,
        run: SpeechRun,
        kind: FlushKind,
        engine: &InferenceHandle,
    ) -> Result<Vec<Segment>> {
        let duration_secs = run.duration_secs(self.sample_rate);
        if duration_secs < self.min_speech_secs {
            tracing::debug!(
                duration_secs,
                min = self.min_speech_secs,
                "discarding speech run below duration floor"
            );
            return Ok(Vec::new());
        }

        self.chunk_counter += 1;
        tracing::info!(
            chunk = self.chunk_counter,
            duration_secs,
            ?kind,
            "processing buffered audio chunk"
        );

        let started_at = run.started_at();
        let spans = engine.submit(run.into_samples()).await?;

        let end_time = match kind {
            FlushKind::Transition => self.wall_clock_end(),
            FlushKind::Final => computed_end(started_at, duration_secs),
        };

        Ok(spans
            .into_iter()
            .map(|span| Segment::new(span.text, started_at, end_time))
            .collect())
    }

    /// End-time strategy for transition flushes: the wall clock at segment
    /// mapping time, after inference completed.
    fn wall_clock_end(&self) -> SystemTime {
        self.clock.now()
    }
}

/// End-time strategy for final flushes: start of the run plus the buffer's
/// own duration.
fn computed_end(started_at: SystemTime, duration_secs: f64) -> SystemTime {
    started_at + Duration::from_secs_f64(duration_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::clock::epoch_secs;
    use crate::session::clock::testing::MockClock;
    use crate::session::frame::AudioFrame;
    use crate::stt::gate;
    use crate::stt::transcriber::{MockTranscriber, SegmentSpan};
    use std::sync::Arc;

    const RATE: u32 = 16000;

    fn run_of_secs(secs: f64, clock: &MockClock) -> SpeechRun {
        let mut run = SpeechRun::new(clock.now());
        run.push_frame(&AudioFrame::new(vec![0i16; (secs * RATE as f64) as usize]));
        run
    }

    #[tokio::test]
    async fn test_below_threshold_discards_without_engine_call() {
        let clock = MockClock::new();
        let transcriber = Arc::new(MockTranscriber::new("mock"));
        let engine = gate::spawn(transcriber.clone());
        let mut dispatcher = ChunkDispatcher::with_clock(RATE, 1.0, clock.clone());

        let segments = dispatcher
            .dispatch(run_of_secs(0.5, &clock), FlushKind::Transition, &engine)
            .await
            .expect("dispatch");

        assert!(segments.is_empty());
        assert_eq!(transcriber.call_count(), 0);
        assert_eq!(dispatcher.chunk_count(), 0);
    }

    #[tokio::test]
    async fn test_at_threshold_dispatches_once() {
        let clock = MockClock::new();
        let transcriber = Arc::new(MockTranscriber::new("mock").with_text("hello"));
        let engine = gate::spawn(transcriber.clone());
        let mut dispatcher = ChunkDispatcher::with_clock(RATE, 1.0, clock.clone());

        let segments = dispatcher
            .dispatch(run_of_secs(1.0, &clock), FlushKind::Transition, &engine)
            .await
            .expect("dispatch");

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "hello");
        assert_eq!(transcriber.call_count(), 1);
        assert_eq!(dispatcher.chunk_count(), 1);
    }

    #[tokio::test]
    async fn test_transition_flush_uses_wall_clock_end() {
        let clock = MockClock::new();
        let started = clock.now();
        let run = run_of_secs(2.0, &clock);

        let engine = gate::spawn(MockTranscriber::new("mock"));
        let mut dispatcher = ChunkDispatcher::with_clock(RATE, 1.0, clock.clone());

        // Inference "takes" 5 seconds of wall time
        clock.advance(std::time::Duration::from_secs(5));

        let segments = dispatcher
            .dispatch(run, FlushKind::Transition, &engine)
            .await
            .expect("dispatch");

        assert_eq!(segments[0].start_time, epoch_secs(started));
        // End is when mapping happened, not started_at + 2s
        assert_eq!(
            segments[0].end_time,
            epoch_secs(started + std::time::Duration::from_secs(5))
        );
    }

    #[tokio::test]
    async fn test_final_flush_uses_duration_derived_end() {
        let clock = MockClock::new();
        let started = clock.now();
        let run = run_of_secs(2.0, &clock);

        let engine = gate::spawn(MockTranscriber::new("mock"));
        let mut dispatcher = ChunkDispatcher::with_clock(RATE, 1.0, clock.clone());

        // Wall time moving on must not leak into a final flush's end time
        clock.advance(std::time::Duration::from_secs(60));

        let segments = dispatcher
            .dispatch(run, FlushKind::Final, &engine)
            .await
            .expect("dispatch");

        assert_eq!(segments[0].start_time, epoch_secs(started));
        assert_eq!(
            segments[0].end_time,
            epoch_secs(started) + 2.0,
            "final flush end must be start + buffer duration"
        );
    }

    #[tokio::test]
    async fn test_all_segments_share_timestamps() {
        let clock = MockClock::new();
        let run = run_of_secs(3.0, &clock);

        let engine = gate::spawn(MockTranscriber::new("mock").with_spans(vec![
            SegmentSpan::new("first", 0.0, 1.1),
            SegmentSpan::new("second", 1.1, 2.4),
            SegmentSpan::new("third", 2.4, 3.0),
        ]));
        let mut dispatcher = ChunkDispatcher::with_clock(RATE, 1.0, clock.clone());

        let segments = dispatcher
            .dispatch(run, FlushKind::Transition, &engine)
            .await
            .expect("dispatch");

        assert_eq!(segments.len(), 3);
        // Engine-relative offsets are not reflected in the emitted times;
        // every segment of a buffer carries the run's start and one shared end
        assert!(segments.iter().all(|s| s.start_time == segments[0].start_time));
        assert!(segments.iter().all(|s| s.end_time == segments[0].end_time));
    }

    #[tokio::test]
    async fn test_engine_failure_scoped_to_buffer() {
        let clock = MockClock::new();
        let engine = gate::spawn(MockTranscriber::new("mock").with_failure());
        let mut dispatcher = ChunkDispatcher::with_clock(RATE, 1.0, clock.clone());

        let result = dispatcher
            .dispatch(run_of_secs(1.5, &clock), FlushKind::Transition, &engine)
            .await;

        assert!(result.is_err());
        // The buffer passed the threshold, so it still counts as dispatched
        assert_eq!(dispatcher.chunk_count(), 1);
    }

    #[tokio::test]
    async fn test_counter_increments_per_dispatched_buffer() {
        let clock = MockClock::new();
        let engine = gate::spawn(MockTranscriber::new("mock"));
        let mut dispatcher = ChunkDispatcher::with_clock(RATE, 1.0, clock.clone());

        for _ in 0..3 {
            dispatcher
                .dispatch(run_of_secs(1.0, &clock), FlushKind::Transition, &engine)
                .await
                .expect("dispatch");
        }
        // Below-threshold runs do not move the counter
        dispatcher
            .dispatch(run_of_secs(0.2, &clock), FlushKind::Transition, &engine)
            .await
            .expect("dispatch");

        assert_eq!(dispatcher.chunk_count(), 3);
    }

    #[tokio::test]
    async fn test_zero_span_buffer_yields_no_segments() {
        let clock = MockClock::new();
        let engine = gate::spawn(MockTranscriber::new("mock").with_spans(Vec::new()));
        let mut dispatcher = ChunkDispatcher::with_clock(RATE, 1.0, clock.clone());

        let segments = dispatcher
            .dispatch(run_of_secs(1.0, &clock), FlushKind::Transition, &engine)
            .await
            .expect("dispatch");

        assert!(segments.is_empty());
        assert_eq!(dispatcher.chunk_count(), 1);
    }
}
