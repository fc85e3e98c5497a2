//! Per-stream transcription pipeline.
//!
//! One session runs per connected stream:
//! ```text
//! ┌───────────┐    ┌────────────┐    ┌─────────────┐    ┌────────────┐
//! │ Transport │───▶│   Frame    │───▶│   Speech    │───▶│   Chunk    │───▶ segments
//! │  chunks   │    │   Slicer   │    │ Accumulator │    │ Dispatcher │
//! └───────────┘    └────────────┘    └─────────────┘    └────────────┘
//!                                          │                  │
//!                                     SpeechDetector    InferenceHandle
//!                                      (per session)    (shared engine)
//! ```
//! Everything up to the dispatcher is session-local and runs strictly
//! sequentially; only the inference gate is shared across sessions.

pub mod accumulator;
pub mod clock;
pub mod dispatcher;
pub mod driver;
pub mod frame;

pub use accumulator::{AccumulatorState, SpeechAccumulator};
pub use clock::{Clock, SystemClock};
pub use dispatcher::ChunkDispatcher;
pub use driver::{SessionConfig, SessionEvent, SessionInput, SessionPipeline};
pub use frame::{AudioFrame, FlushKind, Segment, SpeechRun};
