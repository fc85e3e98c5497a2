use crate::defaults;
use crate::error::{Result, ScribedError};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// One segment as the engine reports it: text plus offsets in seconds
/// relative to the start of the submitted buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentSpan {
    pub text: String,
    pub start_secs: f64,
    pub end_secs: f64,
}

impl SegmentSpan {
    pub fn new(text: impl Into<String>, start_secs: f64, end_secs: f64) -> Self {
        Self {
            text: text.into(),
            start_secs,
            end_secs,
        }
    }
}

/// Trait for speech-to-text transcription.
///
/// This trait allows swapping implementations (real Whisper vs mock).
pub trait Transcriber: Send + Sync {
    /// Transcribe a buffer of audio samples.
    ///
    /// # Arguments
    /// * `audio` - Audio samples as 16-bit PCM at 16kHz mono
    ///
    /// # Returns
    /// The segments the engine produced, in order, or an error. An empty
    /// vector is a valid result (e.g., a buffer of noise).
    fn transcribe(&self, audio: &[i16]) -> Result<Vec<SegmentSpan>>;

    /// Get the name of the loaded model
    fn model_name(&self) -> &str;

    /// Check if the transcriber is ready
    fn is_ready(&self) -> bool;
}

/// Implement Transcriber for Arc<T> to allow sharing across sessions.
impl<T: Transcriber + ?Sized> Transcriber for Arc<T> {
    fn transcribe(&self, audio: &[i16]) -> Result<Vec<SegmentSpan>> {
        (**self).transcribe(audio)
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }
}

/// Configuration for transcriber initialization
#[derive(Debug, Clone)]
pub struct TranscriberConfig {
    pub model_path: PathBuf,
    pub language: String,
    pub threads: Option<usize>,
}

impl Default for TranscriberConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(""),
            language: defaults::DEFAULT_LANGUAGE.to_string(),
            threads: None,
        }
    }
}

/// Mock transcriber for testing
#[derive(Debug)]
pub struct MockTranscriber {
    model_name: String,
    spans: Vec<SegmentSpan>,
    should_fail: bool,
    calls: AtomicUsize,
}

impl MockTranscriber {
    /// Create a new mock transcriber returning one fixed span.
    pub fn new(model_name: &str) -> Self {
        Self {
            model_name: model_name.to_string(),
            spans: vec![SegmentSpan::new("mock transcription", 0.0, 1.0)],
            should_fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Configure the mock to return specific spans per call
    pub fn with_spans(mut self, spans: Vec<SegmentSpan>) -> Self {
        self.spans = spans;
        self
    }

    /// Configure the mock to return a single span with the given text
    pub fn with_text(self, text: &str) -> Self {
        let span = SegmentSpan::new(text, 0.0, 1.0);
        self.with_spans(vec![span])
    }

    /// Configure the mock to fail on transcribe
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Number of transcribe calls made so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Transcriber for MockTranscriber {
    fn transcribe(&self, _audio: &[i16]) -> Result<Vec<SegmentSpan>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            Err(ScribedError::TranscriptionInferenceFailed {
                message: "mock transcription failure".to_string(),
            })
        } else {
            Ok(self.spans.clone())
        }
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn is_ready(&self) -> bool {
        !self.should_fail
    }
}
