//! Speech-to-text: the engine capability trait, the Whisper backend, and
//! the inference gate serializing access to the shared engine instance.

pub mod gate;
pub mod transcriber;
pub mod whisper;

pub use gate::InferenceHandle;
pub use transcriber::{MockTranscriber, SegmentSpan, Transcriber, TranscriberConfig};
pub use whisper::WhisperTranscriber;
