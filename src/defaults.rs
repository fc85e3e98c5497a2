//! Default configuration constants for scribed.
//!
//! This module provides shared constants used across different configuration
//! types to ensure consistency and eliminate duplication.

/// Default audio sample rate in Hz.
///
/// 16kHz is the standard for speech recognition and provides a good balance
/// between quality and computational efficiency for voice applications.
pub const SAMPLE_RATE: u32 = 16000;

/// Default frame duration in milliseconds.
///
/// Voice-activity classification operates on fixed 30ms frames. At 16kHz
/// that is 480 samples (960 bytes of 16-bit PCM) per frame.
pub const FRAME_DURATION_MS: u32 = 30;

/// Minimum duration of buffered speech worth transcribing, in seconds.
///
/// Speech runs shorter than this are discarded without an engine call.
/// Filters out noise bursts and breath sounds; callers must be aware that
/// genuinely short utterances below this floor are dropped.
pub const MIN_SPEECH_SECS: f64 = 1.0;

/// Default listen address for the transcription server.
pub const LISTEN_ADDR: &str = "127.0.0.1:50051";

/// Status code returned by the health endpoint.
///
/// Fixed value independent of pipeline state; wire-compatible with the
/// deployed health checkers.
pub const HEALTH_STATUS_CODE: u32 = 12;

/// Duration of the silent warm-up buffer submitted at startup, in seconds.
///
/// The first inference on a freshly loaded model pays one-time backend
/// initialization costs; warming with silence keeps that latency out of the
/// first real request.
pub const WARMUP_SECS: u32 = 1;

/// Default Whisper model path.
///
/// "base" (multilingual) supports auto-detection of any language.
pub const DEFAULT_MODEL_PATH: &str = "models/ggml-base.bin";

/// Default language code for transcription.
///
/// "auto" lets Whisper detect the spoken language automatically.
/// Set to a specific code (e.g., "en", "de") to force a language.
pub const DEFAULT_LANGUAGE: &str = "auto";

/// Language value that triggers automatic language detection.
pub const AUTO_LANGUAGE: &str = "auto";

/// Capacity of the per-session audio chunk channel.
///
/// Bounds how far the transport can run ahead of classification before
/// back-pressure applies.
pub const CHUNK_CHANNEL_CAPACITY: usize = 32;

/// Capacity of the inference gate's request queue.
///
/// Requests queue FIFO behind the single engine worker; this bounds how
/// many sessions can be waiting before `submit` itself applies
/// back-pressure.
pub const INFERENCE_QUEUE_CAPACITY: usize = 16;

/// Number of samples in one frame at the given rate and frame duration.
pub const fn frame_len_samples(sample_rate: u32, frame_duration_ms: u32) -> usize {
    (sample_rate * frame_duration_ms / 1000) as usize
}
