//! Frame-level speech classification capability.
//!
//! The session pipeline consumes the classifier through the
//! [`SpeechDetector`] trait so the detector implementation can be swapped
//! (energy-based, model-based, scripted for tests). [`EnergyVad`] is the
//! built-in RMS-threshold implementation.

use serde::{Deserialize, Serialize};

/// Trait for per-frame speech/non-speech classification.
///
/// `frame` is exactly one classification frame of 16-bit PCM samples.
/// Detectors may keep internal state across frames, hence `&mut self`.
pub trait SpeechDetector: Send {
    /// Classifies one frame: true if it contains speech.
    fn is_speech(&mut self, frame: &[i16], sample_rate: u32) -> bool;
}

/// Detector operating point, from most permissive to most aggressive
/// filtering of non-speech.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VadMode {
    Quality,
    LowBitrate,
    Aggressive,
    /// Most aggressive filtering; fewest false positives.
    #[default]
    VeryAggressive,
}

impl VadMode {
    /// RMS threshold for this mode (0.0 to 1.0 of full scale).
    ///
    /// 0.02 is tuned for typical microphone input levels; more aggressive
    /// modes demand proportionally more energy before calling a frame
    /// speech.
    fn rms_threshold(self) -> f32 {
        match self {
            VadMode::Quality => 0.010,
            VadMode::LowBitrate => 0.015,
            VadMode::Aggressive => 0.020,
            VadMode::VeryAggressive => 0.030,
        }
    }
}

/// Energy-based voice activity detector.
///
/// Classifies a frame as speech when its normalized RMS exceeds the mode's
/// threshold. Stateless across frames.
#[derive(Debug, Clone, Copy)]
pub struct EnergyVad {
    threshold: f32,
}

impl EnergyVad {
    pub fn new(mode: VadMode) -> Self {
        Self {
            threshold: mode.rms_threshold(),
        }
    }

    /// Current speech threshold.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }
}

impl SpeechDetector for EnergyVad {
    fn is_speech(&mut self, frame: &[i16], _sample_rate: u32) -> bool {
        calculate_rms(frame) > self.threshold
    }
}

/// Detector that replays a pre-scripted classification sequence.
///
/// Returns scripted values in order, then `fallback` once the script is
/// exhausted. Lets pipeline tests drive exact speech/silence patterns
/// without synthesizing audio energy.
#[derive(Debug, Clone)]
pub struct ScriptedDetector {
    script: std::collections::VecDeque<bool>,
    fallback: bool,
}

impl ScriptedDetector {
    pub fn new(script: impl IntoIterator<Item = bool>) -> Self {
        Self {
            script: script.into_iter().collect(),
            fallback: false,
        }
    }

    /// Value returned after the script runs out (default: false).
    pub fn with_fallback(mut self, fallback: bool) -> Self {
        self.fallback = fallback;
        self
    }

    /// Detector that classifies every frame the same way.
    pub fn constant(value: bool) -> Self {
        Self::new([]).with_fallback(value)
    }
}

impl SpeechDetector for ScriptedDetector {
    fn is_speech(&mut self, _frame: &[i16], _sample_rate: u32) -> bool {
        self.script.pop_front().unwrap_or(self.fallback)
    }
}

/// Calculates the Root Mean Square (RMS) of audio samples.
///
/// Returns a normalized value (0.0 to 1.0), where 0.0 is silence, ~0.707 a
/// full-scale sine wave, and 1.0 maximum amplitude.
pub fn calculate_rms(samples: &[i16]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_squares: f64 = samples
        .iter()
        .map(|&sample| {
            let normalized = sample as f64 / i16::MAX as f64;
            normalized * normalized
        })
        .sum();

    let mean_square = sum_squares / samples.len() as f64;
    mean_square.sqrt() as f32
}
