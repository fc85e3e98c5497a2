//! Audio input handling: frame slicing, speech classification, WAV decoding.

pub mod slicer;
pub mod vad;
pub mod wav;

pub use slicer::FrameSlicer;
pub use vad::{EnergyVad, ScriptedDetector, SpeechDetector, VadMode};
pub use wav::WavAudio;
