//! Command-line interface for scribed
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Streaming voice transcription server
#[derive(Parser, Debug)]
#[command(
    name = "scribed",
    version,
    about = "Streaming voice-activity-segmented transcription server"
)]
pub struct Cli {
    /// Subcommand to execute (default: serve)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Verbose output (-v: debug, -vv: trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Listen address override (e.g., 0.0.0.0:50051)
    #[arg(long, value_name = "ADDR")]
    pub listen: Option<String>,

    /// Whisper model file override (e.g., models/ggml-large-v2.bin)
    #[arg(long, value_name = "PATH")]
    pub model: Option<PathBuf>,

    /// Language code for transcription (default: auto-detect). Examples: auto, en, de, es
    #[arg(long, value_name = "LANG")]
    pub language: Option<String>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the transcription server (the default)
    Serve,

    /// Stream a WAV file to a running server and print segments
    Stream {
        /// WAV file to stream
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Server address (default: the configured listen address)
        #[arg(long, value_name = "ADDR")]
        addr: Option<String>,

        /// Pace chunks at playback speed instead of as fast as possible
        #[arg(long)]
        realtime: bool,
    },

    /// Probe a running server's health endpoint
    Health {
        /// Server address (default: the configured listen address)
        #[arg(long, value_name = "ADDR")]
        addr: Option<String>,
    },
}
