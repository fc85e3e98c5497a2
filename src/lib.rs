//! scribed - streaming voice transcription server
//!
//! Ingests live PCM audio streams, segments them by voice activity at frame
//! granularity, and emits timestamped transcript segments while audio keeps
//! arriving.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod audio;
pub mod cli;
pub mod client;
pub mod config;
pub mod defaults;
pub mod error;
pub mod server;
pub mod session;
pub mod stt;

// Capability traits (the seams external collaborators plug into)
pub use audio::vad::SpeechDetector;
pub use stt::transcriber::Transcriber;

// Session pipeline
pub use session::driver::{SessionConfig, SessionEvent, SessionInput, SessionPipeline};

// Error handling
pub use error::{Result, ScribedError};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.2.0+abc1234"` when git hash is available, `"0.2.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
